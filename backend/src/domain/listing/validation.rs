//! Validation rules shared by every listing write path.
//!
//! Creation and partial updates both funnel through [`validate_draft`], so a
//! patched listing satisfies exactly the same rules as a new one.

use std::fmt;

use url::Url;

use super::{ListingDetails, ListingDraft, RequiredDocument, VisaType};
use crate::domain::Error;

/// Minimum country name length in characters.
pub const COUNTRY_NAME_MIN: usize = 2;
/// Maximum country name length in characters.
pub const COUNTRY_NAME_MAX: usize = 50;
/// Minimum description length in characters.
pub const DESCRIPTION_MIN: usize = 20;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 5_000;
/// Maximum length of the short free-text fields.
pub const SHORT_TEXT_MAX: usize = 100;
/// Maximum length of an image URL.
pub const IMAGE_URL_MAX: usize = 2_048;

/// Listing fields named in validation failures, using their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingField {
    CountryName,
    CountryImage,
    VisaType,
    ProcessingTime,
    RequiredDocuments,
    Description,
    AgeRestriction,
    Fee,
    Validity,
    ApplicationMethod,
}

impl ListingField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CountryName => "countryName",
            Self::CountryImage => "countryImage",
            Self::VisaType => "visaType",
            Self::ProcessingTime => "processingTime",
            Self::RequiredDocuments => "requiredDocuments",
            Self::Description => "description",
            Self::AgeRestriction => "ageRestriction",
            Self::Fee => "fee",
            Self::Validity => "validity",
            Self::ApplicationMethod => "applicationMethod",
        }
    }
}

impl fmt::Display for ListingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for listing content.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListingValidationError {
    #[error("{field} must not be empty")]
    Empty { field: ListingField },
    #[error("{field} must be between {min} and {max} characters")]
    LengthOutOfRange {
        field: ListingField,
        min: usize,
        max: usize,
    },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: ListingField, max: usize },
    #[error("{field} must be a positive number")]
    NotPositive { field: ListingField },
    #[error("{field} is too large")]
    OutOfRange { field: ListingField },
    #[error("{field} must be an absolute http or https URL")]
    InvalidUrl { field: ListingField },
    #[error("{field} value '{value}' is not one of: {allowed}")]
    UnknownChoice {
        field: ListingField,
        value: String,
        allowed: String,
    },
    #[error("requiredDocuments must list at least one document")]
    NoDocuments,
}

impl ListingValidationError {
    /// Field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> ListingField {
        match self {
            Self::Empty { field }
            | Self::LengthOutOfRange { field, .. }
            | Self::TooLong { field, .. }
            | Self::NotPositive { field }
            | Self::OutOfRange { field }
            | Self::InvalidUrl { field }
            | Self::UnknownChoice { field, .. } => *field,
            Self::NoDocuments => ListingField::RequiredDocuments,
        }
    }

    /// Stable machine-readable failure code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "empty",
            Self::LengthOutOfRange { .. } => "length_out_of_range",
            Self::TooLong { .. } => "too_long",
            Self::NotPositive { .. } => "not_positive",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InvalidUrl { .. } => "invalid_url",
            Self::UnknownChoice { .. } => "unknown_choice",
            Self::NoDocuments => "no_documents",
        }
    }
}

impl From<ListingValidationError> for Error {
    fn from(value: ListingValidationError) -> Self {
        Self::invalid_field(value.field().as_str(), value.code(), value.to_string())
    }
}

fn required_text(
    value: &str,
    field: ListingField,
    max: usize,
) -> Result<String, ListingValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ListingValidationError::Empty { field });
    }
    if trimmed.chars().count() > max {
        return Err(ListingValidationError::TooLong { field, max });
    }
    Ok(trimmed.to_owned())
}

fn country_name(value: &str) -> Result<String, ListingValidationError> {
    let field = ListingField::CountryName;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ListingValidationError::Empty { field });
    }
    let length = trimmed.chars().count();
    if !(COUNTRY_NAME_MIN..=COUNTRY_NAME_MAX).contains(&length) {
        return Err(ListingValidationError::LengthOutOfRange {
            field,
            min: COUNTRY_NAME_MIN,
            max: COUNTRY_NAME_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

fn description(value: &str) -> Result<String, ListingValidationError> {
    let field = ListingField::Description;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ListingValidationError::Empty { field });
    }
    let length = trimmed.chars().count();
    if !(DESCRIPTION_MIN..=DESCRIPTION_MAX).contains(&length) {
        return Err(ListingValidationError::LengthOutOfRange {
            field,
            min: DESCRIPTION_MIN,
            max: DESCRIPTION_MAX,
        });
    }
    Ok(trimmed.to_owned())
}

fn country_image(value: Option<&str>) -> Result<Option<String>, ListingValidationError> {
    let field = ListingField::CountryImage;
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    if raw.chars().count() > IMAGE_URL_MAX {
        return Err(ListingValidationError::TooLong {
            field,
            max: IMAGE_URL_MAX,
        });
    }
    let url = Url::parse(raw).map_err(|_| ListingValidationError::InvalidUrl { field })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ListingValidationError::InvalidUrl { field });
    }
    Ok(Some(raw.to_owned()))
}

fn visa_type(value: &str) -> Result<VisaType, ListingValidationError> {
    let field = ListingField::VisaType;
    if value.trim().is_empty() {
        return Err(ListingValidationError::Empty { field });
    }
    value
        .parse()
        .map_err(|_| ListingValidationError::UnknownChoice {
            field,
            value: value.trim().to_owned(),
            allowed: VisaType::allowed_labels(),
        })
}

fn required_documents(values: &[String]) -> Result<Vec<RequiredDocument>, ListingValidationError> {
    let mut documents = Vec::with_capacity(values.len());
    for value in values {
        let document: RequiredDocument =
            value
                .parse()
                .map_err(|_| ListingValidationError::UnknownChoice {
                    field: ListingField::RequiredDocuments,
                    value: value.trim().to_owned(),
                    allowed: RequiredDocument::allowed_labels(),
                })?;
        if !documents.contains(&document) {
            documents.push(document);
        }
    }
    if documents.is_empty() {
        return Err(ListingValidationError::NoDocuments);
    }
    Ok(documents)
}

fn age_restriction(value: i64) -> Result<u32, ListingValidationError> {
    let field = ListingField::AgeRestriction;
    if value <= 0 {
        return Err(ListingValidationError::NotPositive { field });
    }
    // Stored as a signed 32-bit column.
    i32::try_from(value)
        .ok()
        .and_then(|age| u32::try_from(age).ok())
        .ok_or(ListingValidationError::OutOfRange { field })
}

fn fee(value: f64) -> Result<f64, ListingValidationError> {
    let field = ListingField::Fee;
    if !value.is_finite() {
        return Err(ListingValidationError::OutOfRange { field });
    }
    if value <= 0.0 {
        return Err(ListingValidationError::NotPositive { field });
    }
    Ok(value)
}

/// Validate raw listing input and produce normalised details.
///
/// Text is trimmed, duplicate documents are collapsed preserving first
/// occurrence, and a blank image URL is treated as absent.
///
/// # Errors
/// Returns the first [`ListingValidationError`] in field order.
pub fn validate_draft(draft: &ListingDraft) -> Result<ListingDetails, ListingValidationError> {
    Ok(ListingDetails {
        country_name: country_name(&draft.country_name)?,
        country_image: country_image(draft.country_image.as_deref())?,
        visa_type: visa_type(&draft.visa_type)?,
        processing_time: required_text(
            &draft.processing_time,
            ListingField::ProcessingTime,
            SHORT_TEXT_MAX,
        )?,
        required_documents: required_documents(&draft.required_documents)?,
        description: description(&draft.description)?,
        age_restriction: age_restriction(draft.age_restriction)?,
        fee: fee(draft.fee)?,
        validity: required_text(&draft.validity, ListingField::Validity, SHORT_TEXT_MAX)?,
        application_method: required_text(
            &draft.application_method,
            ListingField::ApplicationMethod,
            SHORT_TEXT_MAX,
        )?,
    })
}

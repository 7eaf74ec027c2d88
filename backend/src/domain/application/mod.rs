//! Visa application records.
//!
//! An application is submitted by a verified applicant against a listing and
//! never changes afterwards. It carries a snapshot of the listing's fee and
//! display fields so it still renders after the listing is edited or removed.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

use super::listing::{VisaListing, VisaType};
use super::{ApplicationId, EmailAddress, Error, ListingId};

/// Minimum applicant name length in characters.
pub const PERSON_NAME_MIN: usize = 2;
/// Maximum applicant name length in characters.
pub const PERSON_NAME_MAX: usize = 50;

/// Application fields named in validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationField {
    FirstName,
    LastName,
}

impl ApplicationField {
    /// Wire name of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "applicantFirstName",
            Self::LastName => "applicantLastName",
        }
    }
}

impl fmt::Display for ApplicationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for application input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationValidationError {
    #[error("{field} must be between {min} and {max} characters")]
    NameLength {
        field: ApplicationField,
        min: usize,
        max: usize,
    },
    #[error("{field} may only contain letters")]
    NameCharacters { field: ApplicationField },
}

impl ApplicationValidationError {
    #[must_use]
    pub const fn field(&self) -> ApplicationField {
        match self {
            Self::NameLength { field, .. } | Self::NameCharacters { field } => *field,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NameLength { .. } => "length_out_of_range",
            Self::NameCharacters { .. } => "invalid_characters",
        }
    }
}

impl From<ApplicationValidationError> for Error {
    fn from(value: ApplicationValidationError) -> Self {
        Self::invalid_field(value.field().as_str(), value.code(), value.to_string())
    }
}

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_regex() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z]+$")
            .unwrap_or_else(|error| panic!("name regex failed to compile: {error}"))
    })
}

/// Applicant first or last name: 2 to 50 ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name for `field`. Surrounding whitespace is ignored.
    ///
    /// # Examples
    /// ```
    /// use visa_backend::domain::{ApplicationField, PersonName};
    ///
    /// assert!(PersonName::new("Ada", ApplicationField::FirstName).is_ok());
    /// assert!(PersonName::new("A", ApplicationField::FirstName).is_err());
    /// assert!(PersonName::new("O'Neil", ApplicationField::LastName).is_err());
    /// ```
    pub fn new(raw: &str, field: ApplicationField) -> Result<Self, ApplicationValidationError> {
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if !(PERSON_NAME_MIN..=PERSON_NAME_MAX).contains(&length) {
            return Err(ApplicationValidationError::NameLength {
                field,
                min: PERSON_NAME_MIN,
                max: PERSON_NAME_MAX,
            });
        }
        if !name_regex().is_match(trimmed) {
            return Err(ApplicationValidationError::NameCharacters { field });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unvalidated application input. The applicant email comes from the
/// verified session, never from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub visa_id: ListingId,
    pub first_name: String,
    pub last_name: String,
}

/// Listing display fields copied into an application when it is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSnapshot {
    pub country_name: String,
    pub country_image: Option<String>,
    pub visa_type: VisaType,
    pub processing_time: String,
    pub validity: String,
    pub application_method: String,
}

impl ListingSnapshot {
    /// Capture the current display fields of `listing`.
    #[must_use]
    pub fn of(listing: &VisaListing) -> Self {
        let details = listing.details();
        Self {
            country_name: details.country_name().to_owned(),
            country_image: details.country_image().map(str::to_owned),
            visa_type: details.visa_type(),
            processing_time: details.processing_time().to_owned(),
            validity: details.validity().to_owned(),
            application_method: details.application_method().to_owned(),
        }
    }
}

/// Stored visa application.
#[derive(Debug, Clone, PartialEq)]
pub struct VisaApplication {
    pub id: ApplicationId,
    /// Listing the application was made against. May dangle once the listing
    /// is deleted.
    pub visa_id: ListingId,
    pub applicant_email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub applied_date: NaiveDate,
    /// Fee at submission time; later listing edits do not change it.
    pub fee: f64,
    pub listing: ListingSnapshot,
    pub created_at: DateTime<Utc>,
}

impl VisaApplication {
    /// Case-insensitive substring match on the snapshot country name.
    /// A blank needle matches everything.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim();
        needle.is_empty()
            || self
                .listing
                .country_name
                .to_lowercase()
                .contains(&needle.to_lowercase())
    }
}

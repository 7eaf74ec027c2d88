//! Visa listing aggregate.
//!
//! A listing is published by an owner and may be updated field by field or
//! removed by that owner. Its identifier, owner and creation time never
//! change after insertion.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use super::{EmailAddress, ListingId};

mod validation;

pub use validation::{
    COUNTRY_NAME_MAX, COUNTRY_NAME_MIN, DESCRIPTION_MAX, DESCRIPTION_MIN, ListingField,
    ListingValidationError, SHORT_TEXT_MAX, validate_draft,
};

/// Error returned when text does not name a known choice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownChoiceError(pub String);

macro_rules! labelled_choice {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$variant_meta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$variant_meta])* $variant ),+
        }

        impl $name {
            /// Every variant in presentation order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Display label, also used on the wire and in storage.
            #[must_use]
            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            fn allowed_labels() -> String {
                Self::ALL
                    .iter()
                    .map(|choice| choice.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoiceError;

            /// Labels match case-insensitively after trimming.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|choice| choice.label().eq_ignore_ascii_case(needle))
                    .ok_or_else(|| UnknownChoiceError(needle.to_owned()))
            }
        }
    };
}

labelled_choice! {
    /// Category of visa a listing offers.
    pub enum VisaType {
        Tourist => "Tourist visa",
        Student => "Student visa",
        Official => "Official visa",
        Work => "Work visa",
        Transit => "Transit visa",
        Business => "Business visa",
    }
}

labelled_choice! {
    /// Document an applicant must provide.
    pub enum RequiredDocument {
        ValidPassport => "Valid passport",
        ApplicationForm => "Visa application form",
        PassportPhotograph => "Recent passport-sized photograph",
        ProofOfFunds => "Proof of funds",
        TravelItinerary => "Travel itinerary",
        AccommodationProof => "Accommodation proof",
    }
}

/// Unvalidated listing content as supplied by a client.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub country_name: String,
    pub country_image: Option<String>,
    pub visa_type: String,
    pub processing_time: String,
    pub required_documents: Vec<String>,
    pub description: String,
    pub age_restriction: i64,
    pub fee: f64,
    pub validity: String,
    pub application_method: String,
}

/// Validated, user-editable listing content.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDetails {
    country_name: String,
    country_image: Option<String>,
    visa_type: VisaType,
    processing_time: String,
    required_documents: Vec<RequiredDocument>,
    description: String,
    age_restriction: u32,
    fee: f64,
    validity: String,
    application_method: String,
}

impl ListingDetails {
    /// Validate a draft.
    ///
    /// # Errors
    /// Returns the first rule the draft violates.
    pub fn new(draft: &ListingDraft) -> Result<Self, ListingValidationError> {
        validate_draft(draft)
    }

    /// Merge `patch` over the current content and re-validate the result.
    ///
    /// Fields absent from the patch keep their current values. An empty
    /// `countryImage` in the patch clears the image.
    ///
    /// # Errors
    /// Returns the first rule the merged content violates.
    pub fn apply(&self, patch: &ListingPatch) -> Result<Self, ListingValidationError> {
        let mut draft = self.to_draft();
        let ListingPatch {
            country_name,
            country_image,
            visa_type,
            processing_time,
            required_documents,
            description,
            age_restriction,
            fee,
            validity,
            application_method,
        } = patch;
        if let Some(value) = country_name {
            draft.country_name.clone_from(value);
        }
        if let Some(value) = country_image {
            draft.country_image = Some(value.clone());
        }
        if let Some(value) = visa_type {
            draft.visa_type.clone_from(value);
        }
        if let Some(value) = processing_time {
            draft.processing_time.clone_from(value);
        }
        if let Some(value) = required_documents {
            draft.required_documents.clone_from(value);
        }
        if let Some(value) = description {
            draft.description.clone_from(value);
        }
        if let Some(value) = age_restriction {
            draft.age_restriction = *value;
        }
        if let Some(value) = fee {
            draft.fee = *value;
        }
        if let Some(value) = validity {
            draft.validity.clone_from(value);
        }
        if let Some(value) = application_method {
            draft.application_method.clone_from(value);
        }
        validate_draft(&draft)
    }

    /// Express the details as a draft, e.g. to merge a patch.
    #[must_use]
    pub fn to_draft(&self) -> ListingDraft {
        ListingDraft {
            country_name: self.country_name.clone(),
            country_image: self.country_image.clone(),
            visa_type: self.visa_type.label().to_owned(),
            processing_time: self.processing_time.clone(),
            required_documents: self
                .required_documents
                .iter()
                .map(|document| document.label().to_owned())
                .collect(),
            description: self.description.clone(),
            age_restriction: i64::from(self.age_restriction),
            fee: self.fee,
            validity: self.validity.clone(),
            application_method: self.application_method.clone(),
        }
    }

    #[must_use]
    pub fn country_name(&self) -> &str {
        &self.country_name
    }

    #[must_use]
    pub fn country_image(&self) -> Option<&str> {
        self.country_image.as_deref()
    }

    #[must_use]
    pub fn visa_type(&self) -> VisaType {
        self.visa_type
    }

    #[must_use]
    pub fn processing_time(&self) -> &str {
        &self.processing_time
    }

    #[must_use]
    pub fn required_documents(&self) -> &[RequiredDocument] {
        &self.required_documents
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn age_restriction(&self) -> u32 {
        self.age_restriction
    }

    #[must_use]
    pub fn fee(&self) -> f64 {
        self.fee
    }

    #[must_use]
    pub fn validity(&self) -> &str {
        &self.validity
    }

    #[must_use]
    pub fn application_method(&self) -> &str {
        &self.application_method
    }
}

/// Partial listing update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPatch {
    pub country_name: Option<String>,
    pub country_image: Option<String>,
    pub visa_type: Option<String>,
    pub processing_time: Option<String>,
    pub required_documents: Option<Vec<String>>,
    pub description: Option<String>,
    pub age_restriction: Option<i64>,
    pub fee: Option<f64>,
    pub validity: Option<String>,
    pub application_method: Option<String>,
}

impl ListingPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Publisher of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOwner {
    email: EmailAddress,
    name: Option<String>,
}

impl ListingOwner {
    /// Create an owner record.
    #[must_use]
    pub fn new(email: EmailAddress, name: Option<String>) -> Self {
        Self { email, name }
    }

    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Stored visa listing.
#[derive(Debug, Clone, PartialEq)]
pub struct VisaListing {
    id: ListingId,
    owner: ListingOwner,
    details: ListingDetails,
    created_at: DateTime<Utc>,
}

impl VisaListing {
    /// Assemble a listing from its parts.
    #[must_use]
    pub fn new(
        id: ListingId,
        owner: ListingOwner,
        details: ListingDetails,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            details,
            created_at,
        }
    }

    /// Replace the editable content, keeping identity and ownership.
    #[must_use]
    pub fn with_details(self, details: ListingDetails) -> Self {
        Self { details, ..self }
    }

    #[must_use]
    pub fn id(&self) -> &ListingId {
        &self.id
    }

    #[must_use]
    pub fn owner(&self) -> &ListingOwner {
        &self.owner
    }

    #[must_use]
    pub fn details(&self) -> &ListingDetails {
        &self.details
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `email` published this listing. Comparison is exact.
    #[must_use]
    pub fn is_owned_by(&self, email: &EmailAddress) -> bool {
        self.owner.email() == email
    }
}

/// Criteria for listing scans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Restrict to one visa type.
    pub visa_type: Option<VisaType>,
}

impl ListingFilter {
    /// Whether `listing` satisfies the filter.
    #[must_use]
    pub fn matches(&self, listing: &VisaListing) -> bool {
        self.visa_type
            .is_none_or(|visa_type| listing.details().visa_type() == visa_type)
    }
}

//! Wire types for the visa listing endpoints.
//!
//! Listings keep the document shape the browser client already consumes:
//! camelCase keys with the identifier under `_id`.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, ListingDraft, ListingField, ListingPatch, VisaListing};

/// A listing as returned by every read endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisaListingDto {
    #[serde(rename = "_id")]
    #[schema(example = "65a0f180aaaaaaaaaa000001")]
    pub id: String,
    pub owner_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[schema(example = "Japan")]
    pub country_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_image: Option<String>,
    #[schema(example = "Tourist visa")]
    pub visa_type: String,
    pub processing_time: String,
    pub required_documents: Vec<String>,
    pub description: String,
    pub age_restriction: u32,
    pub fee: f64,
    pub validity: String,
    pub application_method: String,
    pub created_at: DateTime<Utc>,
}

impl From<&VisaListing> for VisaListingDto {
    fn from(listing: &VisaListing) -> Self {
        let details = listing.details();
        Self {
            id: listing.id().to_string(),
            owner_email: listing.owner().email().to_string(),
            owner_name: listing.owner().name().map(str::to_owned),
            country_name: details.country_name().to_owned(),
            country_image: details.country_image().map(str::to_owned),
            visa_type: details.visa_type().label().to_owned(),
            processing_time: details.processing_time().to_owned(),
            required_documents: details
                .required_documents()
                .iter()
                .map(|doc| doc.label().to_owned())
                .collect(),
            description: details.description().to_owned(),
            age_restriction: details.age_restriction(),
            fee: details.fee(),
            validity: details.validity().to_owned(),
            application_method: details.application_method().to_owned(),
            created_at: listing.created_at(),
        }
    }
}

/// Numeric form field that older clients send as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl NumberOrText {
    fn not_a_number(field: ListingField) -> Error {
        let name = field.as_str();
        Error::invalid_field(name, "not_a_number", format!("{name} must be a number"))
    }

    fn as_f64(&self, field: ListingField) -> Result<f64, Error> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| Self::not_a_number(field)),
        }
    }

    fn as_integer(&self, field: ListingField) -> Result<i64, Error> {
        let value = self.as_f64(field)?;
        if value.fract() != 0.0 {
            let name = field.as_str();
            return Err(Error::invalid_field(
                name,
                "not_integer",
                format!("{name} must be a whole number"),
            ));
        }
        // Saturating cast; the domain rejects anything past its own bound.
        Ok(value as i64)
    }
}

/// Body of `POST /visas`.
///
/// The owner comes from the session. Legacy clients that still send
/// `ownerEmail`, `email`, `userName` or `username` have those keys ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateListingRequest {
    pub country_name: String,
    #[serde(default, alias = "countryImageUrl")]
    pub country_image: Option<String>,
    pub visa_type: String,
    pub processing_time: String,
    pub required_documents: Vec<String>,
    pub description: String,
    pub age_restriction: NumberOrText,
    pub fee: NumberOrText,
    pub validity: String,
    pub application_method: String,
    #[serde(default, rename = "ownerEmail")]
    _owner_email: Option<IgnoredAny>,
    #[serde(default, rename = "email")]
    _email: Option<IgnoredAny>,
    #[serde(default, rename = "userName")]
    _user_name: Option<IgnoredAny>,
    #[serde(default, rename = "username")]
    _username: Option<IgnoredAny>,
}

impl TryFrom<CreateListingRequest> for ListingDraft {
    type Error = Error;

    fn try_from(value: CreateListingRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            age_restriction: value.age_restriction.as_integer(ListingField::AgeRestriction)?,
            fee: value.fee.as_f64(ListingField::Fee)?,
            country_name: value.country_name,
            country_image: value.country_image,
            visa_type: value.visa_type,
            processing_time: value.processing_time,
            required_documents: value.required_documents,
            description: value.description,
            validity: value.validity,
            application_method: value.application_method,
        })
    }
}

/// Body of `PUT /visa/{id}`: any subset of the editable fields.
///
/// Clients that echo the whole document may include `_id`, `ownerEmail`,
/// `ownerName` and `createdAt`; those are ignored. Any other unknown key is
/// rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateListingRequest {
    pub country_name: Option<String>,
    #[serde(alias = "countryImageUrl")]
    pub country_image: Option<String>,
    pub visa_type: Option<String>,
    pub processing_time: Option<String>,
    pub required_documents: Option<Vec<String>>,
    pub description: Option<String>,
    pub age_restriction: Option<NumberOrText>,
    pub fee: Option<NumberOrText>,
    pub validity: Option<String>,
    pub application_method: Option<String>,
    #[serde(default, rename = "_id")]
    _id: Option<IgnoredAny>,
    #[serde(default, rename = "ownerEmail")]
    _owner_email: Option<IgnoredAny>,
    #[serde(default, rename = "ownerName")]
    _owner_name: Option<IgnoredAny>,
    #[serde(default, rename = "createdAt")]
    _created_at: Option<IgnoredAny>,
}

impl TryFrom<UpdateListingRequest> for ListingPatch {
    type Error = Error;

    fn try_from(value: UpdateListingRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            age_restriction: value
                .age_restriction
                .map(|raw| raw.as_integer(ListingField::AgeRestriction))
                .transpose()?,
            fee: value
                .fee
                .map(|raw| raw.as_f64(ListingField::Fee))
                .transpose()?,
            country_name: value.country_name,
            country_image: value.country_image,
            visa_type: value.visa_type,
            processing_time: value.processing_time,
            required_documents: value.required_documents,
            description: value.description,
            validity: value.validity,
            application_method: value.application_method,
        })
    }
}

/// Response of `POST /visas`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingCreatedResponse {
    #[schema(example = "Visa added successfully!")]
    pub message: String,
    #[schema(example = "65a0f180aaaaaaaaaa000001")]
    pub id: String,
}

/// Response of `DELETE /visa/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListingDeletedResponse {
    pub success: bool,
}

/// Query string of `GET /visas`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListingsQuery {
    /// Only return listings of this visa type.
    pub visa_type: Option<String>,
}

/// Query string of `GET /my-added-visas`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OwnerQuery {
    /// Must equal the signed-in user's email when present.
    pub email: Option<String>,
}

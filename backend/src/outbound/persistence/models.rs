//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion to domain types re-validates
//! every row, so a corrupt row surfaces as a query error instead of an
//! invalid aggregate.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::{
    ApplicationField, ApplicationId, EmailAddress, ListingDetails, ListingDraft, ListingId,
    ListingOwner, ListingSnapshot, PersonName, VisaApplication, VisaListing, VisaType,
};

use super::schema::{visa_applications, visa_listings};

/// Row struct for reading from the visa_listings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = visa_listings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ListingRow {
    pub id: String,
    #[expect(dead_code, reason = "ordering column read alongside the row")]
    pub seq: i64,
    pub owner_email: String,
    pub owner_name: Option<String>,
    pub country_name: String,
    pub country_image: Option<String>,
    pub visa_type: String,
    pub processing_time: String,
    pub required_documents: Vec<String>,
    pub description: String,
    pub age_restriction: i32,
    pub fee: f64,
    pub validity: String,
    pub application_method: String,
    pub created_at: DateTime<Utc>,
}

impl ListingRow {
    pub(crate) fn into_domain(self) -> Result<VisaListing, String> {
        let id = ListingId::parse(&self.id).map_err(|err| format!("listing id: {err}"))?;
        let email =
            EmailAddress::new(self.owner_email).map_err(|err| format!("owner email: {err}"))?;
        let details = ListingDetails::new(&ListingDraft {
            country_name: self.country_name,
            country_image: self.country_image,
            visa_type: self.visa_type,
            processing_time: self.processing_time,
            required_documents: self.required_documents,
            description: self.description,
            age_restriction: i64::from(self.age_restriction),
            fee: self.fee,
            validity: self.validity,
            application_method: self.application_method,
        })
        .map_err(|err| format!("listing {id}: {err}"))?;
        Ok(VisaListing::new(
            id,
            ListingOwner::new(email, self.owner_name),
            details,
            self.created_at,
        ))
    }
}

/// Insertable struct for creating listing records. `seq` is assigned by the
/// database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = visa_listings)]
pub(crate) struct NewListingRow<'a> {
    pub id: &'a str,
    pub owner_email: &'a str,
    pub owner_name: Option<&'a str>,
    pub country_name: &'a str,
    pub country_image: Option<&'a str>,
    pub visa_type: &'a str,
    pub processing_time: &'a str,
    pub required_documents: Vec<String>,
    pub description: &'a str,
    pub age_restriction: i32,
    pub fee: f64,
    pub validity: &'a str,
    pub application_method: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewListingRow<'a> {
    pub(crate) fn from_domain(listing: &'a VisaListing) -> Result<Self, String> {
        let details = listing.details();
        let changes = ListingChanges::from_details(details)?;
        Ok(Self {
            id: listing.id().as_str(),
            owner_email: listing.owner().email().as_str(),
            owner_name: listing.owner().name(),
            country_name: changes.country_name,
            country_image: changes.country_image,
            visa_type: changes.visa_type,
            processing_time: changes.processing_time,
            required_documents: changes.required_documents,
            description: changes.description,
            age_restriction: changes.age_restriction,
            fee: changes.fee,
            validity: changes.validity,
            application_method: changes.application_method,
            created_at: listing.created_at(),
        })
    }
}

/// Changeset replacing the editable columns of a listing.
///
/// `treat_none_as_null` lets a cleared image overwrite the stored URL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = visa_listings)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ListingChanges<'a> {
    pub country_name: &'a str,
    pub country_image: Option<&'a str>,
    pub visa_type: &'a str,
    pub processing_time: &'a str,
    pub required_documents: Vec<String>,
    pub description: &'a str,
    pub age_restriction: i32,
    pub fee: f64,
    pub validity: &'a str,
    pub application_method: &'a str,
}

impl<'a> ListingChanges<'a> {
    pub(crate) fn from_details(details: &'a ListingDetails) -> Result<Self, String> {
        let age_restriction = i32::try_from(details.age_restriction())
            .map_err(|_| "age restriction exceeds column range".to_owned())?;
        Ok(Self {
            country_name: details.country_name(),
            country_image: details.country_image(),
            visa_type: details.visa_type().label(),
            processing_time: details.processing_time(),
            required_documents: details
                .required_documents()
                .iter()
                .map(|document| document.label().to_owned())
                .collect(),
            description: details.description(),
            age_restriction,
            fee: details.fee(),
            validity: details.validity(),
            application_method: details.application_method(),
        })
    }
}

/// Row struct for reading from the visa_applications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = visa_applications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ApplicationRow {
    pub id: String,
    #[expect(dead_code, reason = "ordering column read alongside the row")]
    pub seq: i64,
    pub visa_id: String,
    pub applicant_email: String,
    pub first_name: String,
    pub last_name: String,
    pub applied_date: NaiveDate,
    pub fee: f64,
    pub country_name: String,
    pub country_image: Option<String>,
    pub visa_type: String,
    pub processing_time: String,
    pub validity: String,
    pub application_method: String,
    pub created_at: DateTime<Utc>,
}

impl ApplicationRow {
    pub(crate) fn into_domain(self) -> Result<VisaApplication, String> {
        let id = ApplicationId::parse(&self.id).map_err(|err| format!("application id: {err}"))?;
        let visa_type: VisaType = self
            .visa_type
            .parse()
            .map_err(|err| format!("application {id}: {err}"))?;
        Ok(VisaApplication {
            visa_id: ListingId::parse(&self.visa_id)
                .map_err(|err| format!("application {id} visa id: {err}"))?,
            applicant_email: EmailAddress::new(self.applicant_email)
                .map_err(|err| format!("application {id} email: {err}"))?,
            first_name: PersonName::new(&self.first_name, ApplicationField::FirstName)
                .map_err(|err| format!("application {id}: {err}"))?,
            last_name: PersonName::new(&self.last_name, ApplicationField::LastName)
                .map_err(|err| format!("application {id}: {err}"))?,
            applied_date: self.applied_date,
            fee: self.fee,
            listing: ListingSnapshot {
                country_name: self.country_name,
                country_image: self.country_image,
                visa_type,
                processing_time: self.processing_time,
                validity: self.validity,
                application_method: self.application_method,
            },
            created_at: self.created_at,
            id,
        })
    }
}

/// Insertable struct for creating application records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = visa_applications)]
pub(crate) struct NewApplicationRow<'a> {
    pub id: &'a str,
    pub visa_id: &'a str,
    pub applicant_email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub applied_date: NaiveDate,
    pub fee: f64,
    pub country_name: &'a str,
    pub country_image: Option<&'a str>,
    pub visa_type: &'a str,
    pub processing_time: &'a str,
    pub validity: &'a str,
    pub application_method: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a VisaApplication> for NewApplicationRow<'a> {
    fn from(application: &'a VisaApplication) -> Self {
        let snapshot = &application.listing;
        Self {
            id: application.id.as_str(),
            visa_id: application.visa_id.as_str(),
            applicant_email: application.applicant_email.as_str(),
            first_name: application.first_name.as_str(),
            last_name: application.last_name.as_str(),
            applied_date: application.applied_date,
            fee: application.fee,
            country_name: &snapshot.country_name,
            country_image: snapshot.country_image.as_deref(),
            visa_type: snapshot.visa_type.label(),
            processing_time: &snapshot.processing_time,
            validity: &snapshot.validity,
            application_method: &snapshot.application_method,
            created_at: application.created_at,
        }
    }
}

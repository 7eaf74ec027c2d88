//! Driven port for visa listing persistence.
//!
//! Adapters store whole listings and answer the scans the catalog needs.
//! Ownership checks and validation happen in the domain before any method
//! here is called.

use async_trait::async_trait;

use crate::domain::{EmailAddress, ListingDetails, ListingFilter, ListingId, VisaListing};

use super::define_port_error;

define_port_error! {
    /// Errors raised by listing repository adapters.
    pub enum ListingRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "listing repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "listing repository query failed: {message}",
    }
}

/// Port for listing storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Persist a new listing. The identifier is assigned by the caller.
    async fn insert(&self, listing: &VisaListing) -> Result<(), ListingRepositoryError>;

    /// Every listing matching `filter`, oldest first.
    async fn list(&self, filter: ListingFilter)
    -> Result<Vec<VisaListing>, ListingRepositoryError>;

    /// At most `limit` listings, newest first. Listings created in the same
    /// instant are ordered by insertion, latest insert first.
    async fn latest(&self, limit: usize) -> Result<Vec<VisaListing>, ListingRepositoryError>;

    async fn find_by_id(
        &self,
        id: &ListingId,
    ) -> Result<Option<VisaListing>, ListingRepositoryError>;

    /// Listings whose owner email equals `owner` exactly, oldest first.
    async fn list_by_owner(
        &self,
        owner: &EmailAddress,
    ) -> Result<Vec<VisaListing>, ListingRepositoryError>;

    /// Replace the editable content of a listing.
    ///
    /// Returns the stored listing after the write, or `None` when no listing
    /// has this id (for example because a concurrent delete won).
    async fn update_details(
        &self,
        id: &ListingId,
        details: &ListingDetails,
    ) -> Result<Option<VisaListing>, ListingRepositoryError>;

    /// Remove a listing. Returns whether a row was removed.
    async fn delete(&self, id: &ListingId) -> Result<bool, ListingRepositoryError>;
}

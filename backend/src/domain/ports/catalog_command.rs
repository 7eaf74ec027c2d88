//! Driving port for listing mutations.
//!
//! Every method takes the verified identity of the caller. Implementations
//! enforce that only a listing's owner may change or remove it.

use async_trait::async_trait;

use crate::domain::{Error, ListingDraft, ListingId, ListingPatch, VerifiedIdentity, VisaListing};

/// Outcome of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteListingOutcome {
    /// The listing existed and was removed.
    Deleted,
    /// No listing had this id; nothing was changed.
    AlreadyAbsent,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogCommand: Send + Sync {
    /// Validate and publish a listing owned by `owner`.
    ///
    /// # Errors
    /// `invalid_request` when the draft fails validation, or a store error.
    async fn create_listing(
        &self,
        owner: &VerifiedIdentity,
        draft: ListingDraft,
    ) -> Result<VisaListing, Error>;

    /// Merge `patch` into the listing and return the stored result.
    ///
    /// # Errors
    /// `not_found` when the listing does not exist, `forbidden` when `actor`
    /// does not own it and `invalid_request` when the merged content fails
    /// validation.
    async fn update_listing(
        &self,
        actor: &VerifiedIdentity,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<VisaListing, Error>;

    /// Remove a listing. Removing a listing that does not exist succeeds.
    ///
    /// # Errors
    /// `forbidden` when `actor` does not own an existing listing.
    async fn delete_listing(
        &self,
        actor: &VerifiedIdentity,
        id: &ListingId,
    ) -> Result<DeleteListingOutcome, Error>;
}

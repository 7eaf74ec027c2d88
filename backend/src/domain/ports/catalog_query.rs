//! Driving port for listing reads.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, ListingFilter, ListingId, VisaListing};

/// Number of listings shown on the landing page.
pub const LATEST_LISTINGS_LIMIT: usize = 6;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogQuery: Send + Sync {
    /// All listings matching `filter`. Unpaginated.
    async fn list_listings(&self, filter: ListingFilter) -> Result<Vec<VisaListing>, Error>;

    /// At most `limit` listings, newest first.
    async fn latest_listings(&self, limit: usize) -> Result<Vec<VisaListing>, Error>;

    /// One listing.
    ///
    /// # Errors
    /// `not_found` when no listing has this id.
    async fn get_listing(&self, id: &ListingId) -> Result<VisaListing, Error>;

    /// Listings published by `owner`.
    async fn list_owned(&self, owner: &EmailAddress) -> Result<Vec<VisaListing>, Error>;
}

//! Catalog domain services implementing the listing command and query ports.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    CatalogCommand, CatalogQuery, DeleteListingOutcome, ListingRepository, ListingRepositoryError,
};
use crate::domain::{
    EmailAddress, Error, ListingDetails, ListingDraft, ListingFilter, ListingId, ListingOwner,
    ListingPatch, ObjectIdGenerator, VerifiedIdentity, VisaListing,
};

pub(crate) fn map_listing_repository_error(error: ListingRepositoryError) -> Error {
    match error {
        ListingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("listing repository unavailable: {message}"))
        }
        ListingRepositoryError::Query { message } => {
            Error::internal(format!("listing repository error: {message}"))
        }
    }
}

pub(crate) fn listing_not_found(id: &ListingId) -> Error {
    Error::not_found(format!("visa listing {id} not found"))
}

/// Listing service implementing [`CatalogCommand`].
#[derive(Clone)]
pub struct CatalogCommandService<R> {
    listings: Arc<R>,
    ids: Arc<ObjectIdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<R> CatalogCommandService<R> {
    /// Create a command service over `listings`.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use visa_backend::domain::{CatalogCommandService, ObjectIdGenerator};
    /// # use visa_backend::outbound::memory::InMemoryListingRepository;
    /// let clock = Arc::new(DefaultClock);
    /// let service = CatalogCommandService::new(
    ///     Arc::new(InMemoryListingRepository::default()),
    ///     Arc::new(ObjectIdGenerator::new(clock.clone())),
    ///     clock,
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(listings: Arc<R>, ids: Arc<ObjectIdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            listings,
            ids,
            clock,
        }
    }
}

impl<R> CatalogCommandService<R>
where
    R: ListingRepository,
{
    /// Load a listing and make sure `actor` owns it.
    async fn owned_listing(
        &self,
        actor: &VerifiedIdentity,
        id: &ListingId,
    ) -> Result<Option<VisaListing>, Error> {
        let Some(listing) = self
            .listings
            .find_by_id(id)
            .await
            .map_err(map_listing_repository_error)?
        else {
            return Ok(None);
        };
        if !listing.is_owned_by(actor.email()) {
            warn!(
                listing_id = %id,
                actor = %actor.email(),
                "rejected change to listing owned by another user"
            );
            return Err(Error::forbidden("only the listing owner may change it"));
        }
        Ok(Some(listing))
    }
}

#[async_trait]
impl<R> CatalogCommand for CatalogCommandService<R>
where
    R: ListingRepository,
{
    async fn create_listing(
        &self,
        owner: &VerifiedIdentity,
        draft: ListingDraft,
    ) -> Result<VisaListing, Error> {
        let details = ListingDetails::new(&draft)?;
        let listing = VisaListing::new(
            ListingId::from(self.ids.next_id()),
            ListingOwner::new(
                owner.email().clone(),
                owner.display_name().map(str::to_owned),
            ),
            details,
            self.clock.utc(),
        );
        self.listings
            .insert(&listing)
            .await
            .map_err(map_listing_repository_error)?;
        info!(listing_id = %listing.id(), owner = %owner.email(), "visa listing created");
        Ok(listing)
    }

    async fn update_listing(
        &self,
        actor: &VerifiedIdentity,
        id: &ListingId,
        patch: ListingPatch,
    ) -> Result<VisaListing, Error> {
        let Some(current) = self.owned_listing(actor, id).await? else {
            return Err(listing_not_found(id));
        };
        if patch.is_empty() {
            return Ok(current);
        }
        let details = current.details().apply(&patch)?;
        let updated = self
            .listings
            .update_details(id, &details)
            .await
            .map_err(map_listing_repository_error)?
            .ok_or_else(|| listing_not_found(id))?;
        info!(listing_id = %id, "visa listing updated");
        Ok(updated)
    }

    async fn delete_listing(
        &self,
        actor: &VerifiedIdentity,
        id: &ListingId,
    ) -> Result<DeleteListingOutcome, Error> {
        if self.owned_listing(actor, id).await?.is_none() {
            return Ok(DeleteListingOutcome::AlreadyAbsent);
        }
        let removed = self
            .listings
            .delete(id)
            .await
            .map_err(map_listing_repository_error)?;
        info!(listing_id = %id, removed, "visa listing deleted");
        Ok(if removed {
            DeleteListingOutcome::Deleted
        } else {
            DeleteListingOutcome::AlreadyAbsent
        })
    }
}

/// Listing service implementing [`CatalogQuery`].
#[derive(Clone)]
pub struct CatalogQueryService<R> {
    listings: Arc<R>,
}

impl<R> CatalogQueryService<R> {
    /// Create a query service over `listings`.
    pub fn new(listings: Arc<R>) -> Self {
        Self { listings }
    }
}

#[async_trait]
impl<R> CatalogQuery for CatalogQueryService<R>
where
    R: ListingRepository,
{
    async fn list_listings(&self, filter: ListingFilter) -> Result<Vec<VisaListing>, Error> {
        self.listings
            .list(filter)
            .await
            .map_err(map_listing_repository_error)
    }

    async fn latest_listings(&self, limit: usize) -> Result<Vec<VisaListing>, Error> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.listings
            .latest(limit)
            .await
            .map_err(map_listing_repository_error)
    }

    async fn get_listing(&self, id: &ListingId) -> Result<VisaListing, Error> {
        self.listings
            .find_by_id(id)
            .await
            .map_err(map_listing_repository_error)?
            .ok_or_else(|| listing_not_found(id))
    }

    async fn list_owned(&self, owner: &EmailAddress) -> Result<Vec<VisaListing>, Error> {
        self.listings
            .list_by_owner(owner)
            .await
            .map_err(map_listing_repository_error)
    }
}

#[cfg(test)]
#[path = "catalog_service_tests.rs"]
mod tests;

//! In-process stores used when no database is configured.
//!
//! They honour the same ordering contracts as the Diesel adapters and back
//! the HTTP integration tests. Contents are lost on restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{
    ApplicationRepository, ApplicationRepositoryError, ListingRepository, ListingRepositoryError,
};
use crate::domain::{
    EmailAddress, ListingDetails, ListingFilter, ListingId, VisaApplication, VisaListing,
};

/// Listing store keeping rows in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryListingRepository {
    rows: RwLock<Vec<VisaListing>>,
}

impl InMemoryListingRepository {
    fn duplicate(id: &ListingId) -> ListingRepositoryError {
        ListingRepositoryError::query(format!("duplicate listing id {id}"))
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn insert(&self, listing: &VisaListing) -> Result<(), ListingRepositoryError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id() == listing.id()) {
            return Err(Self::duplicate(listing.id()));
        }
        rows.push(listing.clone());
        Ok(())
    }

    async fn list(
        &self,
        filter: ListingFilter,
    ) -> Result<Vec<VisaListing>, ListingRepositoryError> {
        let rows = self.rows.read().await;
        let mut found: Vec<VisaListing> =
            rows.iter().filter(|row| filter.matches(row)).cloned().collect();
        // Stable sort keeps insertion order for equal timestamps.
        found.sort_by_key(VisaListing::created_at);
        Ok(found)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<VisaListing>, ListingRepositoryError> {
        let rows = self.rows.read().await;
        let mut indexed: Vec<(usize, &VisaListing)> = rows.iter().enumerate().collect();
        indexed.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| seq_b.cmp(seq_a))
        });
        Ok(indexed
            .into_iter()
            .take(limit)
            .map(|(_, listing)| listing.clone())
            .collect())
    }

    async fn find_by_id(
        &self,
        id: &ListingId,
    ) -> Result<Option<VisaListing>, ListingRepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner: &EmailAddress,
    ) -> Result<Vec<VisaListing>, ListingRepositoryError> {
        let rows = self.rows.read().await;
        let mut found: Vec<VisaListing> = rows
            .iter()
            .filter(|row| row.is_owned_by(owner))
            .cloned()
            .collect();
        found.sort_by_key(VisaListing::created_at);
        Ok(found)
    }

    async fn update_details(
        &self,
        id: &ListingId,
        details: &ListingDetails,
    ) -> Result<Option<VisaListing>, ListingRepositoryError> {
        let mut rows = self.rows.write().await;
        let Some(row) = rows.iter_mut().find(|row| row.id() == id) else {
            return Ok(None);
        };
        *row = row.clone().with_details(details.clone());
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: &ListingId) -> Result<bool, ListingRepositoryError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok(rows.len() < before)
    }
}

/// Application store keeping rows in submission order.
#[derive(Debug, Default)]
pub struct InMemoryApplicationRepository {
    rows: RwLock<Vec<VisaApplication>>,
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn insert(
        &self,
        application: &VisaApplication,
    ) -> Result<(), ApplicationRepositoryError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id == application.id) {
            return Err(ApplicationRepositoryError::query(format!(
                "duplicate application id {}",
                application.id
            )));
        }
        rows.push(application.clone());
        Ok(())
    }

    async fn list_by_applicant(
        &self,
        applicant: &EmailAddress,
    ) -> Result<Vec<VisaApplication>, ApplicationRepositoryError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| &row.applicant_email == applicant)
            .cloned()
            .collect())
    }

    async fn delete_by_applicant(
        &self,
        applicant: &EmailAddress,
    ) -> Result<u64, ApplicationRepositoryError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| &row.applicant_email != applicant);
        Ok(u64::try_from(before - rows.len()).unwrap_or(u64::MAX))
    }
}

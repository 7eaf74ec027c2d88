//! PostgreSQL-backed `ListingRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ListingRepository, ListingRepositoryError};
use crate::domain::{EmailAddress, ListingDetails, ListingFilter, ListingId, VisaListing};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ListingChanges, ListingRow, NewListingRow};
use super::pool::{DbPool, PoolError};
use super::schema::visa_listings;

/// Diesel-backed implementation of the `ListingRepository` port.
#[derive(Clone)]
pub struct DieselListingRepository {
    pool: DbPool,
}

impl DieselListingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ListingRepositoryError {
    map_basic_pool_error(error, ListingRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ListingRepositoryError {
    map_basic_diesel_error(
        error,
        ListingRepositoryError::query,
        ListingRepositoryError::connection,
    )
}

fn rows_to_listings(rows: Vec<ListingRow>) -> Result<Vec<VisaListing>, ListingRepositoryError> {
    rows.into_iter()
        .map(|row| row.into_domain().map_err(ListingRepositoryError::query))
        .collect()
}

#[async_trait]
impl ListingRepository for DieselListingRepository {
    async fn insert(&self, listing: &VisaListing) -> Result<(), ListingRepositoryError> {
        let row = NewListingRow::from_domain(listing).map_err(ListingRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(visa_listings::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list(
        &self,
        filter: ListingFilter,
    ) -> Result<Vec<VisaListing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = visa_listings::table.into_boxed();
        if let Some(visa_type) = filter.visa_type {
            query = query.filter(visa_listings::visa_type.eq(visa_type.label()));
        }
        let rows: Vec<ListingRow> = query
            .order((visa_listings::created_at.asc(), visa_listings::seq.asc()))
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_listings(rows)
    }

    async fn latest(&self, limit: usize) -> Result<Vec<VisaListing>, ListingRepositoryError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ListingRow> = visa_listings::table
            .order((visa_listings::created_at.desc(), visa_listings::seq.desc()))
            .limit(limit)
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_listings(rows)
    }

    async fn find_by_id(
        &self,
        id: &ListingId,
    ) -> Result<Option<VisaListing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ListingRow> = visa_listings::table
            .find(id.as_str())
            .select(ListingRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row.into_domain().map_err(ListingRepositoryError::query))
            .transpose()
    }

    async fn list_by_owner(
        &self,
        owner: &EmailAddress,
    ) -> Result<Vec<VisaListing>, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ListingRow> = visa_listings::table
            .filter(visa_listings::owner_email.eq(owner.as_str()))
            .order((visa_listings::created_at.asc(), visa_listings::seq.asc()))
            .select(ListingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_listings(rows)
    }

    async fn update_details(
        &self,
        id: &ListingId,
        details: &ListingDetails,
    ) -> Result<Option<VisaListing>, ListingRepositoryError> {
        let changes =
            ListingChanges::from_details(details).map_err(ListingRepositoryError::query)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ListingRow> = diesel::update(visa_listings::table.find(id.as_str()))
            .set(&changes)
            .returning(ListingRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row.into_domain().map_err(ListingRepositoryError::query))
            .transpose()
    }

    async fn delete(&self, id: &ListingId) -> Result<bool, ListingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(visa_listings::table.find(id.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}

//! PostgreSQL-backed `ApplicationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ApplicationRepository, ApplicationRepositoryError};
use crate::domain::{EmailAddress, VisaApplication};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ApplicationRow, NewApplicationRow};
use super::pool::{DbPool, PoolError};
use super::schema::visa_applications;

/// Diesel-backed implementation of the `ApplicationRepository` port.
#[derive(Clone)]
pub struct DieselApplicationRepository {
    pool: DbPool,
}

impl DieselApplicationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ApplicationRepositoryError {
    map_basic_pool_error(error, ApplicationRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ApplicationRepositoryError {
    map_basic_diesel_error(
        error,
        ApplicationRepositoryError::query,
        ApplicationRepositoryError::connection,
    )
}

#[async_trait]
impl ApplicationRepository for DieselApplicationRepository {
    async fn insert(
        &self,
        application: &VisaApplication,
    ) -> Result<(), ApplicationRepositoryError> {
        let row = NewApplicationRow::from(application);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(visa_applications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn list_by_applicant(
        &self,
        applicant: &EmailAddress,
    ) -> Result<Vec<VisaApplication>, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ApplicationRow> = visa_applications::table
            .filter(visa_applications::applicant_email.eq(applicant.as_str()))
            .order((
                visa_applications::created_at.asc(),
                visa_applications::seq.asc(),
            ))
            .select(ApplicationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(ApplicationRepositoryError::query))
            .collect()
    }

    async fn delete_by_applicant(
        &self,
        applicant: &EmailAddress,
    ) -> Result<u64, ApplicationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            visa_applications::table
                .filter(visa_applications::applicant_email.eq(applicant.as_str())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }
}

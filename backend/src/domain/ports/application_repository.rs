//! Driven port for visa application persistence.
//!
//! Inserts never check that `visa_id` refers to an existing listing: an
//! application carries its own snapshot and outlives the listing.

use async_trait::async_trait;

use crate::domain::{EmailAddress, VisaApplication};

use super::define_port_error;

define_port_error! {
    /// Errors raised by application repository adapters.
    pub enum ApplicationRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "application repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "application repository query failed: {message}",
    }
}

/// Port for application storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn insert(&self, application: &VisaApplication)
    -> Result<(), ApplicationRepositoryError>;

    /// Applications whose applicant email equals `applicant` exactly, in
    /// submission order.
    async fn list_by_applicant(
        &self,
        applicant: &EmailAddress,
    ) -> Result<Vec<VisaApplication>, ApplicationRepositoryError>;

    /// Remove every application for `applicant` in one operation and report
    /// how many were removed.
    async fn delete_by_applicant(
        &self,
        applicant: &EmailAddress,
    ) -> Result<u64, ApplicationRepositoryError>;
}

//! Driving port for reading an applicant's submissions.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, VisaApplication};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationQuery: Send + Sync {
    /// Applications submitted by `applicant`, optionally narrowed to those
    /// whose country name contains `search` (case-insensitive).
    ///
    /// # Errors
    /// Under the legacy empty-result policy, `not_found` when nothing
    /// matches.
    async fn list_applications(
        &self,
        applicant: &EmailAddress,
        search: Option<String>,
    ) -> Result<Vec<VisaApplication>, Error>;
}

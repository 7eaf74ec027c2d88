//! Driving port for submitting and withdrawing visa applications.

use async_trait::async_trait;

use crate::domain::{ApplicationDraft, EmailAddress, Error, VerifiedIdentity, VisaApplication};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationCommand: Send + Sync {
    /// Submit an application on behalf of `applicant`.
    ///
    /// The referenced listing is read once to snapshot its fee and display
    /// fields.
    ///
    /// # Errors
    /// `invalid_request` for malformed names and `not_found` when the
    /// listing does not exist at submission time.
    async fn submit_application(
        &self,
        applicant: &VerifiedIdentity,
        draft: ApplicationDraft,
    ) -> Result<VisaApplication, Error>;

    /// Remove every application `applicant` has submitted and return the
    /// number removed.
    ///
    /// # Errors
    /// Under the legacy empty-result policy, `not_found` when nothing was
    /// removed.
    async fn withdraw_all(&self, applicant: &EmailAddress) -> Result<u64, Error>;
}

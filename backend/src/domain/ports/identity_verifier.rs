//! Driven port for exchanging an auth-provider token for a verified identity.
//!
//! The session endpoint is the only caller. Everything downstream trusts the
//! identity stored in the session and never a client-supplied email.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, VerifiedIdentity};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity verifier adapters.
    pub enum IdentityVerifierError {
        /// The provider refused the token (expired, revoked, malformed).
        Rejected { message: String } => "identity token rejected: {message}",
        /// The provider could not be reached in time.
        Connection { message: String } => "identity provider unreachable: {message}",
        /// The provider answered with something other than a usable identity.
        Response { message: String } =>
            "identity provider returned an unusable response: {message}",
    }
}

impl From<IdentityVerifierError> for Error {
    fn from(value: IdentityVerifierError) -> Self {
        match value {
            IdentityVerifierError::Rejected { .. } => Self::unauthorized(value.to_string()),
            IdentityVerifierError::Connection { .. } => {
                Self::service_unavailable(value.to_string())
            }
            IdentityVerifierError::Response { .. } => Self::internal(value.to_string()),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify `token` with the provider.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityVerifierError>;
}

/// Development verifier with a fixed token table.
///
/// | token             | email                 | display name   |
/// |-------------------|-----------------------|----------------|
/// | `owner-token`     | owner@example.com     | Olive Owner    |
/// | `applicant-token` | applicant@example.com | Arun Applicant |
/// | `other-token`     | other@example.com     | none           |
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityVerifier;

impl FixtureIdentityVerifier {
    const TOKENS: &'static [(&'static str, &'static str, Option<&'static str>)] = &[
        ("owner-token", "owner@example.com", Some("Olive Owner")),
        ("applicant-token", "applicant@example.com", Some("Arun Applicant")),
        ("other-token", "other@example.com", None),
    ];
}

#[async_trait]
impl IdentityVerifier for FixtureIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityVerifierError> {
        let Some((_, email, name)) = Self::TOKENS.iter().find(|(known, _, _)| *known == token)
        else {
            return Err(IdentityVerifierError::rejected("unknown fixture token"));
        };
        let email = EmailAddress::new(*email)
            .map_err(|err| IdentityVerifierError::response(err.to_string()))?;
        VerifiedIdentity::new(email, name.map(str::to_owned))
            .map_err(|err| IdentityVerifierError::response(err.to_string()))
    }
}

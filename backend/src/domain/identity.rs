//! Verified caller identity.
//!
//! Identities are produced by an [`crate::domain::ports::IdentityVerifier`]
//! from a credential issued by the external auth provider. Handlers never
//! derive an identity from request parameters.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length accepted for an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum length accepted for a display name.
pub const DISPLAY_NAME_MAX: usize = 100;

/// Validation errors for identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email must look like name@domain.tld")]
    InvalidEmail,
    #[error("email must be at most {max} characters")]
    EmailTooLong { max: usize },
    #[error("display name must be at most {max} characters")]
    DisplayNameTooLong { max: usize },
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Well-formed email address.
///
/// Comparison is exact and case-sensitive; no normalisation is applied, so
/// `A@x.com` and `a@x.com` are different owners.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an email address.
    ///
    /// # Examples
    /// ```
    /// use visa_backend::domain::EmailAddress;
    ///
    /// assert!(EmailAddress::new("a@x.com").is_ok());
    /// assert!(EmailAddress::new("a@x").is_err());
    /// ```
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        if value.chars().count() > EMAIL_MAX {
            return Err(IdentityValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&value) {
            return Err(IdentityValidationError::InvalidEmail);
        }
        Ok(Self(value))
    }

    /// Borrow the address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identity established by the auth provider for the current caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedIdentity {
    email: EmailAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

impl VerifiedIdentity {
    /// Build an identity, discarding a blank display name.
    pub fn new(
        email: EmailAddress,
        display_name: Option<String>,
    ) -> Result<Self, IdentityValidationError> {
        let display_name = display_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());
        let too_long = display_name
            .as_ref()
            .is_some_and(|name| name.chars().count() > DISPLAY_NAME_MAX);
        if too_long {
            return Err(IdentityValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self {
            email,
            display_name,
        })
    }

    /// Email address the provider vouches for.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name supplied by the provider, if any.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

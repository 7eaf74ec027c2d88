//! Wire types for the provider's account lookup endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::{EmailAddress, VerifiedIdentity};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupRequestDto<'a> {
    pub id_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LookupResponseDto {
    #[serde(default)]
    users: Vec<AccountDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountDto {
    email: Option<String>,
    display_name: Option<String>,
    #[serde(default = "default_verified")]
    email_verified: bool,
}

const fn default_verified() -> bool {
    true
}

/// Why a lookup response could not produce an identity.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum AccountProblem {
    /// The provider knows the token but not a usable verified email.
    Unverified(String),
    /// The payload is not shaped as expected.
    Malformed(String),
}

impl LookupResponseDto {
    pub(super) fn into_identity(self) -> Result<VerifiedIdentity, AccountProblem> {
        let Some(account) = self.users.into_iter().next() else {
            return Err(AccountProblem::Malformed("response lists no users".to_owned()));
        };
        if !account.email_verified {
            return Err(AccountProblem::Unverified(
                "account email is not verified".to_owned(),
            ));
        }
        let Some(email) = account.email else {
            return Err(AccountProblem::Unverified(
                "account has no email address".to_owned(),
            ));
        };
        let email = EmailAddress::new(email)
            .map_err(|err| AccountProblem::Malformed(format!("account email: {err}")))?;
        VerifiedIdentity::new(email, account.display_name)
            .map_err(|err| AccountProblem::Malformed(err.to_string()))
    }
}

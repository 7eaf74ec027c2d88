//! Reqwest-backed identity verifier.
//!
//! Exchanges an ID token for the account it belongs to by POSTing
//! `{"idToken": ...}` to the provider's account lookup endpoint. This adapter
//! owns transport details only: timeout, status mapping and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

use super::dto::{AccountProblem, LookupRequestDto, LookupResponseDto};
use crate::domain::VerifiedIdentity;
use crate::domain::ports::{IdentityVerifier, IdentityVerifierError};

const DEFAULT_USER_AGENT: &str = "visa-backend-identity/0.1";

/// Identity verifier calling one account lookup endpoint.
pub struct HttpIdentityVerifier {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl HttpIdentityVerifier {
    /// Build a verifier with an explicit request timeout. `api_key`, when
    /// set, is sent as the `key` query parameter.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        endpoint: Url,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(DEFAULT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    fn lookup_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        if let Some(key) = self.api_key.as_deref() {
            url.query_pairs_mut().append_pair("key", key);
        }
        url
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityVerifierError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(IdentityVerifierError::rejected("token is empty"));
        }
        let response = self
            .client
            .post(self.lookup_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&LookupRequestDto { id_token: token })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status));
        }
        parse_identity(body.as_ref())
    }
}

fn parse_identity(body: &[u8]) -> Result<VerifiedIdentity, IdentityVerifierError> {
    let decoded: LookupResponseDto = serde_json::from_slice(body).map_err(|error| {
        IdentityVerifierError::response(format!("invalid lookup JSON payload: {error}"))
    })?;
    decoded.into_identity().map_err(|problem| match problem {
        AccountProblem::Unverified(message) => IdentityVerifierError::rejected(message),
        AccountProblem::Malformed(message) => IdentityVerifierError::response(message),
    })
}

fn map_transport_error(error: reqwest::Error) -> IdentityVerifierError {
    IdentityVerifierError::connection(error.to_string())
}

// Provider error bodies may echo the token, so only the status is kept.
fn map_status_error(status: StatusCode) -> IdentityVerifierError {
    let message = format!("status {}", status.as_u16());
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            IdentityVerifierError::rejected(message)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            IdentityVerifierError::connection(message)
        }
        _ if status.is_server_error() => IdentityVerifierError::connection(message),
        _ => IdentityVerifierError::response(message),
    }
}

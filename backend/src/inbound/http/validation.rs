//! Request-level parsing shared by the HTTP handlers.
//!
//! Failures become `400 invalid_request` errors whose details carry the
//! offending field, the rejected value and a stable code.

use serde_json::json;

use crate::domain::{EmailAddress, Error, ListingId, VerifiedIdentity, VisaType};

/// Validation error codes for request parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamCode {
    InvalidId,
    InvalidEmail,
    UnknownChoice,
}

impl ParamCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::InvalidEmail => "invalid_email",
            Self::UnknownChoice => "unknown_choice",
        }
    }
}

fn invalid_param(field: &str, value: &str, code: ParamCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a listing identifier taken from the path or a request body.
pub(crate) fn parse_listing_id(raw: &str, field: &str) -> Result<ListingId, Error> {
    ListingId::parse(raw.trim()).map_err(|err| {
        invalid_param(
            field,
            raw,
            ParamCode::InvalidId,
            format!("{field} is not a valid identifier: {err}"),
        )
    })
}

/// Parse the optional `visaType` listing filter.
pub(crate) fn parse_visa_type_filter(raw: Option<&str>) -> Result<Option<VisaType>, Error> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse::<VisaType>().map_err(|err| {
                invalid_param("visaType", value, ParamCode::UnknownChoice, err.to_string())
            })
        })
        .transpose()
}

/// Resolve whose records a request acts on.
///
/// The legacy `email` query parameter is still accepted but must be
/// well-formed and must name the signed-in caller.
pub(crate) fn resolve_subject(
    identity: &VerifiedIdentity,
    email: Option<&str>,
) -> Result<EmailAddress, Error> {
    let Some(raw) = email else {
        return Ok(identity.email().clone());
    };
    let requested = EmailAddress::new(raw).map_err(|err| {
        invalid_param(
            "email",
            raw,
            ParamCode::InvalidEmail,
            format!("email is not valid: {err}"),
        )
    })?;
    if &requested != identity.email() {
        tracing::warn!(
            caller = %identity.email(),
            requested = %requested,
            "rejected request for another user's records"
        );
        return Err(Error::forbidden("email does not match the signed-in user"));
    }
    Ok(requested)
}

//! OpenAPI schema definitions for domain and request types.
//!
//! Domain types stay framework-agnostic and request DTOs carry serde-only
//! attributes (ignored legacy keys, lenient numbers) that utoipa cannot
//! describe faithfully. The wrappers here document the wire shape instead.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No session or the identity token was rejected.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Signed in but not permitted to touch this resource.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with the current resource state.
    #[schema(rename = "conflict")]
    Conflict,
    /// A backing store or the identity provider is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "fee must be a number")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Machine-readable context such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`super::visas::CreateListingRequest`].
///
/// `ageRestriction` and `fee` also accept numeric strings.
#[derive(ToSchema)]
#[schema(as = visas::CreateListingRequest)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CreateListingRequestSchema {
    #[schema(example = "Japan")]
    country_name: String,
    #[schema(example = "https://img.example/japan.jpg")]
    country_image: Option<String>,
    /// One of the recognised visa type labels.
    #[schema(example = "Tourist visa")]
    visa_type: String,
    #[schema(example = "5 working days")]
    processing_time: String,
    #[schema(example = json!(["Valid passport", "Recent passport-size photograph"]))]
    required_documents: Vec<String>,
    description: String,
    #[schema(example = 18)]
    age_restriction: u32,
    #[schema(example = 50.0)]
    fee: f64,
    #[schema(example = "90 days")]
    validity: String,
    #[schema(example = "Online")]
    application_method: String,
}

/// OpenAPI schema for [`super::visas::UpdateListingRequest`].
///
/// Every field is optional. `_id`, `ownerEmail`, `ownerName` and
/// `createdAt` are tolerated and ignored.
#[derive(ToSchema)]
#[schema(as = visas::UpdateListingRequest)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UpdateListingRequestSchema {
    country_name: Option<String>,
    country_image: Option<String>,
    visa_type: Option<String>,
    processing_time: Option<String>,
    required_documents: Option<Vec<String>>,
    description: Option<String>,
    age_restriction: Option<u32>,
    fee: Option<f64>,
    validity: Option<String>,
    application_method: Option<String>,
}

/// OpenAPI schema for [`super::applications::SubmitApplicationRequest`].
#[derive(ToSchema)]
#[schema(as = applications::SubmitApplicationRequest)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SubmitApplicationRequestSchema {
    #[schema(example = "65a0f180aaaaaaaaaa000001")]
    visa_id: String,
    #[schema(example = "Ada")]
    applicant_first_name: String,
    #[schema(example = "Lovelace")]
    applicant_last_name: String,
    /// Must equal the signed-in user's email when present.
    applicant_email: Option<String>,
}

/// OpenAPI schema for [`super::identity::SessionRequest`].
#[derive(ToSchema)]
#[schema(as = identity::SessionRequest)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SessionRequestSchema {
    /// ID token issued by the identity provider.
    id_token: String,
}

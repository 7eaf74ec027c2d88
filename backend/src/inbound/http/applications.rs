//! Visa application handlers.
//!
//! ```text
//! POST   /visa-applications {"visaId":"…","applicantFirstName":"Ada","applicantLastName":"Lovelace"}
//! GET    /visaApplications?search=jap
//! DELETE /visaApplications
//! ```
//!
//! The applicant is always the signed-in user. The legacy `email` query
//! parameter and `applicantEmail` body key are accepted only when they name
//! that same user.

use actix_web::{delete, get, post, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApplicationDraft, VisaApplication};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, SubmitApplicationRequestSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_listing_id, resolve_subject};

/// Body of `POST /visa-applications`.
///
/// Older clients post the whole listing document with the applicant fields
/// merged in, so unrecognised keys are ignored here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    pub visa_id: String,
    #[serde(alias = "firstName")]
    pub applicant_first_name: String,
    #[serde(alias = "lastName")]
    pub applicant_last_name: String,
    #[serde(default, alias = "email")]
    pub applicant_email: Option<String>,
}

/// A stored application with its listing snapshot flattened in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisaApplicationDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub visa_id: String,
    pub applicant_email: String,
    pub applicant_first_name: String,
    pub applicant_last_name: String,
    #[schema(value_type = String, format = Date, example = "2024-01-12")]
    pub applied_date: NaiveDate,
    pub fee: f64,
    pub country_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_image: Option<String>,
    pub visa_type: String,
    pub processing_time: String,
    pub validity: String,
    pub application_method: String,
    pub created_at: DateTime<Utc>,
}

impl From<&VisaApplication> for VisaApplicationDto {
    fn from(application: &VisaApplication) -> Self {
        let snapshot = &application.listing;
        Self {
            id: application.id.to_string(),
            visa_id: application.visa_id.to_string(),
            applicant_email: application.applicant_email.to_string(),
            applicant_first_name: application.first_name.to_string(),
            applicant_last_name: application.last_name.to_string(),
            applied_date: application.applied_date,
            fee: application.fee,
            country_name: snapshot.country_name.clone(),
            country_image: snapshot.country_image.clone(),
            visa_type: snapshot.visa_type.label().to_owned(),
            processing_time: snapshot.processing_time.clone(),
            validity: snapshot.validity.clone(),
            application_method: snapshot.application_method.clone(),
            created_at: application.created_at,
        }
    }
}

/// Query string of `GET /visaApplications`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApplicantQuery {
    /// Must equal the signed-in user's email when present.
    pub email: Option<String>,
    /// Case-insensitive substring of the country name.
    pub search: Option<String>,
}

/// Query string of `DELETE /visaApplications`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WithdrawQuery {
    /// Must equal the signed-in user's email when present.
    pub email: Option<String>,
}

/// Response of `DELETE /visaApplications`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationsDeletedResponse {
    #[schema(example = "2 visa application(s) deleted successfully")]
    pub message: String,
    pub deleted_count: u64,
}

/// Apply for a listing as the signed-in user.
#[utoipa::path(
    post,
    path = "/visa-applications",
    request_body = SubmitApplicationRequestSchema,
    responses(
        (status = 200, description = "Application stored", body = VisaApplicationDto),
        (status = 400, description = "Invalid names or identifier", body = ErrorSchema),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 403, description = "applicantEmail names another user", body = ErrorSchema),
        (status = 404, description = "Listing does not exist", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "submitApplication"
)]
#[post("/visa-applications")]
pub async fn submit_application(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitApplicationRequest>,
) -> ApiResult<web::Json<VisaApplicationDto>> {
    let applicant = session.require_identity()?;
    let SubmitApplicationRequest {
        visa_id,
        applicant_first_name,
        applicant_last_name,
        applicant_email,
    } = payload.into_inner();
    resolve_subject(&applicant, applicant_email.as_deref())?;
    let draft = ApplicationDraft {
        visa_id: parse_listing_id(&visa_id, "visaId")?,
        first_name: applicant_first_name,
        last_name: applicant_last_name,
    };
    let application = state
        .applications
        .submit_application(&applicant, draft)
        .await?;
    Ok(web::Json(VisaApplicationDto::from(&application)))
}

/// Applications submitted by the signed-in user.
#[utoipa::path(
    get,
    path = "/visaApplications",
    params(ApplicantQuery),
    responses(
        (status = 200, description = "Caller's applications, possibly empty", body = [VisaApplicationDto]),
        (status = 400, description = "Malformed email", body = ErrorSchema),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 403, description = "Email names another user", body = ErrorSchema),
        (status = 404, description = "Nothing found (legacy empty-result policy)", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "listApplications"
)]
#[get("/visaApplications")]
pub async fn list_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ApplicantQuery>,
) -> ApiResult<web::Json<Vec<VisaApplicationDto>>> {
    let identity = session.require_identity()?;
    let ApplicantQuery { email, search } = query.into_inner();
    let applicant = resolve_subject(&identity, email.as_deref())?;
    let applications = state
        .applications_query
        .list_applications(&applicant, search)
        .await?;
    Ok(web::Json(
        applications.iter().map(VisaApplicationDto::from).collect(),
    ))
}

/// Withdraw every application of the signed-in user.
#[utoipa::path(
    delete,
    path = "/visaApplications",
    params(WithdrawQuery),
    responses(
        (status = 200, description = "Applications removed", body = ApplicationsDeletedResponse),
        (status = 400, description = "Malformed email", body = ErrorSchema),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 403, description = "Email names another user", body = ErrorSchema),
        (status = 404, description = "Nothing removed (legacy empty-result policy)", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["applications"],
    operation_id = "withdrawApplications"
)]
#[delete("/visaApplications")]
pub async fn withdraw_applications(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<WithdrawQuery>,
) -> ApiResult<web::Json<ApplicationsDeletedResponse>> {
    let identity = session.require_identity()?;
    let applicant = resolve_subject(&identity, query.email.as_deref())?;
    let deleted_count = state.applications.withdraw_all(&applicant).await?;
    Ok(web::Json(ApplicationsDeletedResponse {
        message: format!("{deleted_count} visa application(s) deleted successfully"),
        deleted_count,
    }))
}

#[cfg(test)]
#[path = "applications_tests.rs"]
mod tests;

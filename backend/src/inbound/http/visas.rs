//! Visa listing handlers.
//!
//! ```text
//! GET    /latestVisas
//! GET    /visas?visaType=Work%20visa
//! GET    /visas/{id}
//! POST   /visas
//! GET    /my-added-visas
//! PUT    /visa/{id}
//! DELETE /visa/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use tracing::debug;

use crate::domain::ports::{DeleteListingOutcome, LATEST_LISTINGS_LIMIT};
use crate::domain::{ListingDraft, ListingFilter, ListingPatch, VisaListing};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    CreateListingRequestSchema, ErrorSchema, UpdateListingRequestSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_listing_id, parse_visa_type_filter, resolve_subject,
};

pub use super::visas_dto::{
    CreateListingRequest, ListingCreatedResponse, ListingDeletedResponse, ListingsQuery,
    NumberOrText, OwnerQuery, UpdateListingRequest, VisaListingDto,
};

const CREATED_MESSAGE: &str = "Visa added successfully!";

fn to_dtos(listings: &[VisaListing]) -> Vec<VisaListingDto> {
    listings.iter().map(VisaListingDto::from).collect()
}

/// The six most recently published listings, newest first.
#[utoipa::path(
    get,
    path = "/latestVisas",
    responses(
        (status = 200, description = "Newest listings", body = [VisaListingDto]),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["visas"],
    operation_id = "latestVisas",
    security([])
)]
#[get("/latestVisas")]
pub async fn latest_visas(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<VisaListingDto>>> {
    let listings = state
        .catalog_query
        .latest_listings(LATEST_LISTINGS_LIMIT)
        .await?;
    Ok(web::Json(to_dtos(&listings)))
}

/// Every listing, oldest first, optionally filtered by visa type.
#[utoipa::path(
    get,
    path = "/visas",
    params(ListingsQuery),
    responses(
        (status = 200, description = "All listings", body = [VisaListingDto]),
        (status = 400, description = "Unknown visa type", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["visas"],
    operation_id = "listVisas",
    security([])
)]
#[get("/visas")]
pub async fn list_visas(
    state: web::Data<HttpState>,
    query: web::Query<ListingsQuery>,
) -> ApiResult<web::Json<Vec<VisaListingDto>>> {
    let visa_type = parse_visa_type_filter(query.visa_type.as_deref())?;
    let listings = state
        .catalog_query
        .list_listings(ListingFilter { visa_type })
        .await?;
    Ok(web::Json(to_dtos(&listings)))
}

/// One listing by identifier.
#[utoipa::path(
    get,
    path = "/visas/{id}",
    params(("id" = String, Path, description = "24 hex character listing identifier")),
    responses(
        (status = 200, description = "Listing", body = VisaListingDto),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "No such listing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["visas"],
    operation_id = "getVisa",
    security([])
)]
#[get("/visas/{id}")]
pub async fn get_visa(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<VisaListingDto>> {
    let id = parse_listing_id(&path, "id")?;
    let listing = state.catalog_query.get_listing(&id).await?;
    Ok(web::Json(VisaListingDto::from(&listing)))
}

/// Publish a listing owned by the signed-in user.
#[utoipa::path(
    post,
    path = "/visas",
    request_body = CreateListingRequestSchema,
    responses(
        (status = 200, description = "Listing created", body = ListingCreatedResponse),
        (status = 400, description = "Invalid listing", body = ErrorSchema),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["visas"],
    operation_id = "createVisa"
)]
#[post("/visas")]
pub async fn create_visa(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateListingRequest>,
) -> ApiResult<web::Json<ListingCreatedResponse>> {
    let owner = session.require_identity()?;
    let draft = ListingDraft::try_from(payload.into_inner())?;
    let listing = state.catalog.create_listing(&owner, draft).await?;
    Ok(web::Json(ListingCreatedResponse {
        message: CREATED_MESSAGE.to_owned(),
        id: listing.id().to_string(),
    }))
}

/// Listings published by the signed-in user.
#[utoipa::path(
    get,
    path = "/my-added-visas",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Caller's listings", body = [VisaListingDto]),
        (status = 400, description = "Malformed email", body = ErrorSchema),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 403, description = "Email names another user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["visas"],
    operation_id = "myAddedVisas"
)]
#[get("/my-added-visas")]
pub async fn my_added_visas(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<OwnerQuery>,
) -> ApiResult<web::Json<Vec<VisaListingDto>>> {
    let identity = session.require_identity()?;
    let owner = resolve_subject(&identity, query.email.as_deref())?;
    let listings = state.catalog_query.list_owned(&owner).await?;
    Ok(web::Json(to_dtos(&listings)))
}

/// Replace some fields of a listing the caller owns.
#[utoipa::path(
    put,
    path = "/visa/{id}",
    params(("id" = String, Path, description = "24 hex character listing identifier")),
    request_body = UpdateListingRequestSchema,
    responses(
        (status = 200, description = "Updated listing", body = VisaListingDto),
        (status = 400, description = "Invalid identifier or fields", body = ErrorSchema),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 403, description = "Listing belongs to another user", body = ErrorSchema),
        (status = 404, description = "No such listing", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["visas"],
    operation_id = "updateVisa"
)]
#[put("/visa/{id}")]
pub async fn update_visa(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateListingRequest>,
) -> ApiResult<web::Json<VisaListingDto>> {
    let actor = session.require_identity()?;
    let id = parse_listing_id(&path, "id")?;
    let patch = ListingPatch::try_from(payload.into_inner())?;
    let listing = state.catalog.update_listing(&actor, &id, patch).await?;
    Ok(web::Json(VisaListingDto::from(&listing)))
}

/// Remove a listing the caller owns. Removing a missing listing succeeds.
#[utoipa::path(
    delete,
    path = "/visa/{id}",
    params(("id" = String, Path, description = "24 hex character listing identifier")),
    responses(
        (status = 200, description = "Listing removed or already absent", body = ListingDeletedResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 401, description = "Sign in required", body = ErrorSchema),
        (status = 403, description = "Listing belongs to another user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["visas"],
    operation_id = "deleteVisa"
)]
#[delete("/visa/{id}")]
pub async fn delete_visa(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_identity()?;
    let id = parse_listing_id(&path, "id")?;
    let outcome = state.catalog.delete_listing(&actor, &id).await?;
    if outcome == DeleteListingOutcome::AlreadyAbsent {
        debug!(listing_id = %id, "delete of absent listing treated as success");
    }
    Ok(HttpResponse::Ok().json(ListingDeletedResponse { success: true }))
}

#[cfg(test)]
#[path = "visas_tests.rs"]
mod tests;

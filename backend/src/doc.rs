//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler, the schema wrappers from
//! [`crate::inbound::http::schemas`] and the session cookie security scheme.
//! Swagger UI serves it in debug builds and `openapi-dump` writes it to
//! stdout for tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::applications::{ApplicationsDeletedResponse, VisaApplicationDto};
use crate::inbound::http::identity::IdentityDto;
use crate::inbound::http::schemas::{
    CreateListingRequestSchema, ErrorCodeSchema, ErrorSchema, SessionRequestSchema,
    SubmitApplicationRequestSchema, UpdateListingRequestSchema,
};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::visas::{ListingCreatedResponse, ListingDeletedResponse, VisaListingDto};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Encrypted session cookie issued by POST /session.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Visa catalog API",
        description = "Publish visa listings and apply for them with a session-backed identity."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::identity::create_session,
        crate::inbound::http::identity::current_session,
        crate::inbound::http::identity::delete_session,
        crate::inbound::http::visas::latest_visas,
        crate::inbound::http::visas::list_visas,
        crate::inbound::http::visas::get_visa,
        crate::inbound::http::visas::create_visa,
        crate::inbound::http::visas::my_added_visas,
        crate::inbound::http::visas::update_visa,
        crate::inbound::http::visas::delete_visa,
        crate::inbound::http::applications::submit_application,
        crate::inbound::http::applications::list_applications,
        crate::inbound::http::applications::withdraw_applications,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateListingRequestSchema,
        UpdateListingRequestSchema,
        SubmitApplicationRequestSchema,
        SessionRequestSchema,
        VisaListingDto,
        ListingCreatedResponse,
        ListingDeletedResponse,
        VisaApplicationDto,
        ApplicationsDeletedResponse,
        IdentityDto,
    )),
    tags(
        (name = "session", description = "Sign in with an identity provider token"),
        (name = "visas", description = "Visa listing catalog"),
        (name = "applications", description = "Visa applications of the signed-in user"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

//! Sign-in handlers.
//!
//! ```text
//! POST   /session {"idToken":"…"}
//! GET    /session
//! DELETE /session
//! ```
//!
//! The browser obtains an ID token from the auth provider and exchanges it
//! here for a server-side session. Every protected route reads identity from
//! that session only.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::{Error, VerifiedIdentity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, SessionRequestSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body of `POST /session`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub id_token: String,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDto {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "Ada Lovelace")]
    pub display_name: Option<String>,
}

impl From<&VerifiedIdentity> for IdentityDto {
    fn from(identity: &VerifiedIdentity) -> Self {
        Self {
            email: identity.email().to_string(),
            display_name: identity.display_name().map(str::to_owned),
        }
    }
}

/// Verify an ID token and start a session for its owner.
#[utoipa::path(
    post,
    path = "/session",
    request_body = SessionRequestSchema,
    responses(
        (status = 200, description = "Signed in", body = IdentityDto,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Missing token", body = ErrorSchema),
        (status = 401, description = "Token rejected", body = ErrorSchema),
        (status = 500, description = "Unusable provider response", body = ErrorSchema),
        (status = 503, description = "Provider unreachable", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "createSession",
    security([])
)]
#[post("/session")]
pub async fn create_session(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SessionRequest>,
) -> ApiResult<web::Json<IdentityDto>> {
    let token = payload.into_inner().id_token;
    if token.trim().is_empty() {
        return Err(Error::invalid_field(
            "idToken",
            "empty_token",
            "idToken must not be empty",
        ));
    }
    let identity = state.identity.verify(&token).await.map_err(|error| {
        warn!(%error, "identity verification failed");
        Error::from(error)
    })?;
    session.persist_identity(&identity)?;
    info!(email = %identity.email(), "session established");
    Ok(web::Json(IdentityDto::from(&identity)))
}

/// The identity bound to the current session.
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Signed in", body = IdentityDto),
        (status = 401, description = "No session", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(session: SessionContext) -> ApiResult<web::Json<IdentityDto>> {
    let identity = session.require_identity()?;
    Ok(web::Json(IdentityDto::from(&identity)))
}

/// End the current session. Succeeds without a session too.
#[utoipa::path(
    delete,
    path = "/session",
    responses((status = 204, description = "Signed out")),
    tags = ["session"],
    operation_id = "deleteSession",
    security([])
)]
#[delete("/session")]
pub async fn delete_session(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{IdentityVerifierError, MockIdentityVerifier};
    use crate::inbound::http::state::HttpStatePorts;
    use crate::inbound::http::test_utils::{
        SESSION_COOKIE, in_memory_ports, in_memory_state, sign_in, test_app,
    };

    #[actix_web::test]
    async fn sign_in_returns_identity_and_cookie() {
        let app = actix_test::init_service(test_app(in_memory_state())).await;
        let cookie = sign_in(&app, "owner-token").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/session")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: IdentityDto = actix_test::read_body_json(response).await;
        assert_eq!(body.email, "owner@example.com");
        assert_eq!(body.display_name.as_deref(), Some("Olive Owner"));
    }

    #[rstest]
    #[case("", StatusCode::BAD_REQUEST, "invalid_request")]
    #[case("   ", StatusCode::BAD_REQUEST, "invalid_request")]
    #[case("forged-token", StatusCode::UNAUTHORIZED, "unauthorized")]
    #[actix_web::test]
    async fn bad_tokens_do_not_start_a_session(
        #[case] token: &str,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app(in_memory_state())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/session")
                .set_json(json!({ "idToken": token }))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), status);
        assert!(
            response
                .response()
                .cookies()
                .all(|cookie| cookie.name() != SESSION_COOKIE)
        );
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], code);
    }

    #[actix_web::test]
    async fn unreachable_provider_is_service_unavailable() {
        let mut verifier = MockIdentityVerifier::new();
        verifier
            .expect_verify()
            .times(1)
            .returning(|_| Err(IdentityVerifierError::connection("timed out")));
        let state = HttpState::new(HttpStatePorts {
            identity: Arc::new(verifier),
            ..in_memory_ports()
        });
        let app = actix_test::init_service(test_app(state)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/session")
                .set_json(json!({ "idToken": "anything" }))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn current_session_requires_sign_in() {
        let app = actix_test::init_service(test_app(in_memory_state())).await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/session").to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn sign_out_expires_the_cookie() {
        let app = actix_test::init_service(test_app(in_memory_state())).await;
        let cookie = sign_in(&app, "applicant-token").await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/session")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let removal = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .expect("removal cookie");
        assert_eq!(removal.value(), "");
    }
}

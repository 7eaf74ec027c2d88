//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::json;

use crate::domain::ports::FixtureIdentityVerifier;
use crate::domain::{
    ApplicationCommandService, ApplicationQueryService, CatalogCommandService,
    CatalogQueryService,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::{InMemoryApplicationRepository, InMemoryListingRepository};
use crate::test_support::{fixed_clock, id_generator};

/// Cookie name used by [`test_session_middleware`].
pub const SESSION_COOKIE: &str = "visa_session";

/// Session middleware with a fresh key and the `Secure` flag disabled so
/// cookies survive plain-HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Ports backed by empty in-memory stores, a frozen clock and the fixture
/// token table. Tests override single fields with mocks.
pub fn in_memory_ports() -> HttpStatePorts {
    let clock = fixed_clock();
    let ids = id_generator();
    let listings = Arc::new(InMemoryListingRepository::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());
    HttpStatePorts {
        catalog: Arc::new(CatalogCommandService::new(
            listings.clone(),
            ids.clone(),
            clock.clone(),
        )),
        catalog_query: Arc::new(CatalogQueryService::new(listings.clone())),
        applications: Arc::new(ApplicationCommandService::new(
            applications.clone(),
            listings,
            ids,
            clock,
        )),
        applications_query: Arc::new(ApplicationQueryService::new(applications)),
        identity: Arc::new(FixtureIdentityVerifier),
    }
}

pub fn in_memory_state() -> HttpState {
    HttpState::new(in_memory_ports())
}

/// Every API route over `state`, behind [`test_session_middleware`].
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .configure(configure)
}

/// Exchange a fixture token at `POST /session` and return the session
/// cookie. The app under test must mount the session handlers.
pub async fn sign_in<S, B>(app: &S, token: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/session")
            .set_json(json!({ "idToken": token }))
            .to_request(),
    )
    .await;
    assert!(
        response.status().is_success(),
        "sign in with {token} failed: {}",
        response.status()
    );
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

//! Server harness and shared world for visa catalog scenarios.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The server runs over in-memory stores
//! with the fixture token table, so every scenario starts from empty state.
//! `WorldFixture` stops the server even if a step panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::Key;
use actix_web::dev::ServerHandle;
use actix_web::{App, HttpServer, web};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use visa_backend::Trace;
use visa_backend::domain::ports::FixtureIdentityVerifier;
use visa_backend::domain::{
    ApplicationCommandService, ApplicationQueryService, CatalogCommandService,
    CatalogQueryService, EmptyResultPolicy, ObjectIdGenerator,
};
use visa_backend::inbound::http::configure;
use visa_backend::inbound::http::session_config::SESSION_COOKIE_NAME;
use visa_backend::inbound::http::state::{HttpState, HttpStatePorts};
use visa_backend::outbound::memory::{InMemoryApplicationRepository, InMemoryListingRepository};

pub(crate) struct VisaWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    /// `name=value` cookie pairs keyed by fixture token.
    pub(crate) cookies: HashMap<String, String>,
    /// Listing ids keyed by country name.
    pub(crate) listings: HashMap<String, String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<VisaWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so the world stays
    // borrowed while calling `block_on`. The future must not touch the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Handler state over fresh in-memory stores.
pub(crate) fn in_memory_state(policy: EmptyResultPolicy) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ids = Arc::new(ObjectIdGenerator::new(clock.clone()));
    let listings = Arc::new(InMemoryListingRepository::default());
    let applications = Arc::new(InMemoryApplicationRepository::default());
    HttpState::new(HttpStatePorts {
        catalog: Arc::new(CatalogCommandService::new(
            listings.clone(),
            ids.clone(),
            clock.clone(),
        )),
        catalog_query: Arc::new(CatalogQueryService::new(listings.clone())),
        applications: Arc::new(
            ApplicationCommandService::new(applications.clone(), listings, ids, clock)
                .with_empty_result_policy(policy),
        ),
        applications_query: Arc::new(
            ApplicationQueryService::new(applications).with_empty_result_policy(policy),
        ),
        identity: Arc::new(FixtureIdentityVerifier),
    })
}

async fn spawn_server(state: HttpState) -> Result<(String, ServerHandle), String> {
    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Trace)
            .service(
                web::scope("")
                    .wrap(session_middleware(key.clone()))
                    .configure(configure),
            )
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

/// Start a fresh server over empty stores.
pub(crate) fn world_with_policy(policy: EmptyResultPolicy) -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let (base_url, server) = local
        .block_on(&runtime, spawn_server(in_memory_state(policy)))
        .expect("spawn server");

    WorldFixture {
        world: Rc::new(RefCell::new(VisaWorld {
            runtime,
            local,
            base_url,
            server,
            cookies: HashMap::new(),
            listings: HashMap::new(),
            last_status: None,
            last_body: None,
            last_trace_id: None,
        })),
    }
}

//! Builders for HTTP state ports from the server configuration.
//!
//! Repositories are Diesel-backed when a pool is configured and in-memory
//! otherwise. The identity verifier talks to the provider when a lookup URL
//! is configured. Debug builds fall back to the fixture token table.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use visa_backend::domain::ports::{
    ApplicationRepository, FixtureIdentityVerifier, IdentityVerifier, ListingRepository,
};
use visa_backend::domain::{
    ApplicationCommandService, ApplicationQueryService, CatalogCommandService,
    CatalogQueryService, EmptyResultPolicy, ObjectIdGenerator,
};
use visa_backend::inbound::http::session_config::BuildMode;
use visa_backend::inbound::http::state::{HttpState, HttpStatePorts};
use visa_backend::outbound::identity::HttpIdentityVerifier;
use visa_backend::outbound::memory::{InMemoryApplicationRepository, InMemoryListingRepository};
use visa_backend::outbound::persistence::{DieselApplicationRepository, DieselListingRepository};

use super::ServerConfig;
use super::config::IdentitySettings;

/// Wire the four catalog and application services over one repository pair.
fn build_services<L, A>(
    listings: Arc<L>,
    applications: Arc<A>,
    policy: EmptyResultPolicy,
    identity: Arc<dyn IdentityVerifier>,
) -> HttpStatePorts
where
    L: ListingRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ids = Arc::new(ObjectIdGenerator::new(clock.clone()));
    HttpStatePorts {
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
        identity,
    }
}

fn build_identity_verifier(
    settings: Option<&IdentitySettings>,
    mode: BuildMode,
) -> io::Result<Arc<dyn IdentityVerifier>> {
    match settings {
        Some(settings) => {
            let verifier = HttpIdentityVerifier::new(
                settings.lookup_url.clone(),
                settings.api_key.clone(),
                settings.timeout,
            )
            .map_err(|err| io::Error::other(format!("identity client setup failed: {err}")))?;
            info!(endpoint = %settings.lookup_url, "verifying identity tokens with provider");
            Ok(Arc::new(verifier))
        }
        None if mode == BuildMode::Release => Err(io::Error::other(
            "release builds require an identity provider; set VISA_IDENTITY_LOOKUP_URL",
        )),
        None => {
            warn!("no identity provider configured; accepting fixture tokens only");
            Ok(Arc::new(FixtureIdentityVerifier))
        }
    }
}

/// Build the shared handler state for every worker.
///
/// # Errors
/// Returns [`io::Error`] when the identity HTTP client cannot be built, or
/// when a release build has no identity provider configured.
pub(crate) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let identity = build_identity_verifier(config.identity.as_ref(), config.build_mode)?;
    let policy = config.empty_result_policy;
    let ports = match &config.db_pool {
        Some(pool) => build_services(
            Arc::new(DieselListingRepository::new(pool.clone())),
            Arc::new(DieselApplicationRepository::new(pool.clone())),
            policy,
            identity,
        ),
        None => {
            warn!("no database configured; listings and applications are kept in memory");
            build_services(
                Arc::new(InMemoryListingRepository::default()),
                Arc::new(InMemoryApplicationRepository::default()),
                policy,
                identity,
            )
        }
    };
    Ok(web::Data::new(HttpState::new(ports)))
}

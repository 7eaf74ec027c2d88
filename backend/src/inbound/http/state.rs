//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ApplicationCommand, ApplicationQuery, CatalogCommand, CatalogQuery, IdentityVerifier,
};

/// Port implementations backing the REST surface.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub catalog: Arc<dyn CatalogCommand>,
    pub catalog_query: Arc<dyn CatalogQuery>,
    pub applications: Arc<dyn ApplicationCommand>,
    pub applications_query: Arc<dyn ApplicationQuery>,
    pub identity: Arc<dyn IdentityVerifier>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<dyn CatalogCommand>,
    pub catalog_query: Arc<dyn CatalogQuery>,
    pub applications: Arc<dyn ApplicationCommand>,
    pub applications_query: Arc<dyn ApplicationQuery>,
    pub identity: Arc<dyn IdentityVerifier>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use visa_backend::domain::ports::FixtureIdentityVerifier;
    /// use visa_backend::domain::{
    ///     ApplicationCommandService, ApplicationQueryService, CatalogCommandService,
    ///     CatalogQueryService, ObjectIdGenerator,
    /// };
    /// use visa_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use visa_backend::outbound::memory::{
    ///     InMemoryApplicationRepository, InMemoryListingRepository,
    /// };
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let ids = Arc::new(ObjectIdGenerator::new(clock.clone()));
    /// let listings = Arc::new(InMemoryListingRepository::default());
    /// let applications = Arc::new(InMemoryApplicationRepository::default());
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     catalog: Arc::new(CatalogCommandService::new(
    ///         listings.clone(),
    ///         ids.clone(),
    ///         clock.clone(),
    ///     )),
    ///     catalog_query: Arc::new(CatalogQueryService::new(listings.clone())),
    ///     applications: Arc::new(ApplicationCommandService::new(
    ///         applications.clone(),
    ///         listings,
    ///         ids,
    ///         clock,
    ///     )),
    ///     applications_query: Arc::new(ApplicationQueryService::new(applications)),
    ///     identity: Arc::new(FixtureIdentityVerifier),
    /// });
    /// let _catalog = state.catalog.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            catalog,
            catalog_query,
            applications,
            applications_query,
            identity,
        } = ports;
        Self {
            catalog,
            catalog_query,
            applications,
            applications_query,
            identity,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

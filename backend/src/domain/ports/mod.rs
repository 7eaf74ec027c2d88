//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are consumed by inbound adapters.
//! Driven ports (`*Repository`, [`IdentityVerifier`]) are implemented by
//! outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod application_command;
mod application_query;
mod application_repository;
mod catalog_command;
mod catalog_query;
mod identity_verifier;
mod listing_repository;

#[cfg(test)]
pub use application_command::MockApplicationCommand;
pub use application_command::ApplicationCommand;
#[cfg(test)]
pub use application_query::MockApplicationQuery;
pub use application_query::ApplicationQuery;
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
pub use application_repository::{ApplicationRepository, ApplicationRepositoryError};
#[cfg(test)]
pub use catalog_command::MockCatalogCommand;
pub use catalog_command::{CatalogCommand, DeleteListingOutcome};
#[cfg(test)]
pub use catalog_query::MockCatalogQuery;
pub use catalog_query::{CatalogQuery, LATEST_LISTINGS_LIMIT};
#[cfg(test)]
pub use identity_verifier::MockIdentityVerifier;
pub use identity_verifier::{FixtureIdentityVerifier, IdentityVerifier, IdentityVerifierError};
#[cfg(test)]
pub use listing_repository::MockListingRepository;
pub use listing_repository::{ListingRepository, ListingRepositoryError};

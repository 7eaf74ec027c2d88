//! Visa catalog backend library.
//!
//! Hexagonal layout: [`domain`] owns the model and services, [`inbound`]
//! adapts HTTP onto the driving ports and [`outbound`] implements the driven
//! ports against PostgreSQL, memory and the identity provider.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(test)]
pub(crate) mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

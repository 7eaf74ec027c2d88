//! Identity provider outbound adapters.
//!
//! A thin HTTP implementation of the `IdentityVerifier` port. The fixture
//! verifier used in development lives next to the port.

mod dto;
mod http_verifier;

pub use http_verifier::HttpIdentityVerifier;

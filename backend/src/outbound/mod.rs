//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM.
//! - **memory**: in-process repositories for development and tests.
//! - **identity**: HTTP client for the external auth provider.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod identity;
pub mod memory;
pub mod persistence;

//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the listing and application repository ports
//! backed by PostgreSQL via `diesel-async` and a `bb8` pool.
//!
//! - Adapters only translate between Diesel rows and domain types.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//!   private to this module.
//! - Database failures map onto the ports' `Connection`/`Query` variants.
//!
//! # Example
//!
//! ```no_run
//! use visa_backend::outbound::persistence::{
//!     DbPool, DieselListingRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://visa@localhost/visa";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let listings = DieselListingRepository::new(pool);
//! # let _ = listings;
//! # Ok(())
//! # }
//! ```

mod diesel_application_repository;
mod diesel_basic_error_mapping;
mod diesel_listing_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_application_repository::DieselApplicationRepository;
pub use diesel_listing_repository::DieselListingRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

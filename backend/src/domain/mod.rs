//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed visa catalog and application model,
//! the validation rules every write path shares, and the services that
//! implement the driving ports in [`ports`]. Nothing here knows about HTTP
//! or SQL.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failure envelope.
//! - [`VisaListing`] and friends: the catalog aggregate.
//! - [`VisaApplication`]: immutable application records with a listing
//!   snapshot.
//! - [`CatalogCommandService`], [`CatalogQueryService`],
//!   [`ApplicationCommandService`], [`ApplicationQueryService`].

pub mod application;
mod application_service;
mod catalog_service;
pub mod error;
pub mod identity;
pub mod listing;
pub mod object_id;
pub mod ports;
pub mod trace_id;

pub use self::application::{
    ApplicationDraft, ApplicationField, ApplicationValidationError, ListingSnapshot,
    PERSON_NAME_MAX, PERSON_NAME_MIN, PersonName, VisaApplication,
};
pub use self::application_service::{
    ApplicationCommandService, ApplicationQueryService, EmptyResultPolicy,
};
pub use self::catalog_service::{CatalogCommandService, CatalogQueryService};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity::{EmailAddress, IdentityValidationError, VerifiedIdentity};
pub use self::listing::{
    ListingDetails, ListingDraft, ListingField, ListingFilter, ListingOwner, ListingPatch,
    ListingValidationError, RequiredDocument, UnknownChoiceError, VisaListing, VisaType,
};
pub use self::object_id::{ApplicationId, ListingId, ObjectId, ObjectIdError, ObjectIdGenerator};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use visa_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

//! HTTP inbound adapter exposing REST endpoints.
//!
//! Paths stay at the root to match the browser client. Handlers depend only
//! on [`state::HttpState`] and the session; wiring of middleware, health
//! probes and documentation happens in the server binary.

pub mod applications;
pub mod error;
pub mod health;
pub mod identity;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
mod validation;
pub mod visas;
mod visas_dto;

use actix_web::web;

pub use crate::domain::ApiResult;

/// Register every API handler together with extractor configs that turn
/// malformed bodies, queries and paths into the shared error envelope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use visa_backend::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(identity::create_session)
        .service(identity::current_session)
        .service(identity::delete_session)
        .service(visas::latest_visas)
        .service(visas::list_visas)
        .service(visas::get_visa)
        .service(visas::create_visa)
        .service(visas::my_added_visas)
        .service(visas::update_visa)
        .service(visas::delete_visa)
        .service(applications::submit_application)
        .service(applications::list_applications)
        .service(applications::withdraw_applications);
}

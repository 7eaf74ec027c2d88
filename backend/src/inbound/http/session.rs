//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie session stores exactly one value: the [`VerifiedIdentity`]
//! established at `POST /session`. Handlers ask for it through
//! [`SessionContext::require_identity`] and never read identity from request
//! parameters.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, VerifiedIdentity};

pub(crate) const IDENTITY_KEY: &str = "identity";

/// Newtype wrapper exposing identity-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the verified identity, rotating the session id.
    pub fn persist_identity(&self, identity: &VerifiedIdentity) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(IDENTITY_KEY, identity)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Identity stored in the session, if any. Undecodable payloads are
    /// dropped and treated as anonymous.
    #[must_use]
    pub fn identity(&self) -> Option<VerifiedIdentity> {
        self.0
            .get::<VerifiedIdentity>(IDENTITY_KEY)
            .unwrap_or_else(|error| {
                warn!(%error, "discarding unreadable identity in session cookie");
                self.0.remove(IDENTITY_KEY);
                None
            })
    }

    /// Require a signed-in caller or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<VerifiedIdentity, Error> {
        self.identity()
            .ok_or_else(|| Error::unauthorized("sign in required"))
    }

    /// Drop every session value and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

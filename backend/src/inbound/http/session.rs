//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The private session cookie carries the caller's user id and the role
//! captured at login. Handlers turn it into an [`Identity`] with
//! [`SessionContext::require_identity`].

use std::str::FromStr;

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Identity, Role, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    pub fn persist_identity(&self, identity: Identity) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(USER_ID_KEY, identity.user_id.to_string())
            .and_then(|()| self.0.insert(ROLE_KEY, identity.role.as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Drop everything stored in the session.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// The identity stored in the session, if present and well formed.
    pub fn identity(&self) -> Result<Option<Identity>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_role)) = (read(USER_ID_KEY)?, read(ROLE_KEY)?) else {
            return Ok(None);
        };
        match (UserId::from_str(&raw_id), Role::from_str(&raw_role)) {
            (Ok(user_id), Ok(role)) => Ok(Some(Identity::new(user_id, role))),
            _ => {
                warn!("malformed identity in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<Identity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("Não autorizado"))
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

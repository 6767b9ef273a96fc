//! Session helpers keeping handlers free of framework-specific logic.
//!
//! The cookie stores only the staff account id. Flags are re-read from the
//! account store on every protected request, so deactivating an account
//! takes effect immediately.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, StaffId};

pub(crate) const STAFF_ID_KEY: &str = "staff_id";

/// Session wrapper exposing staff-level operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record the authenticated account, rotating the session key.
    ///
    /// # Errors
    /// Returns an internal error when the session cannot be written.
    pub fn persist_staff(&self, id: StaffId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(STAFF_ID_KEY, id.value())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Account recorded in the session, if any.
    ///
    /// A value that does not decode is treated as an anonymous session.
    pub fn staff_id(&self) -> Option<StaffId> {
        match self.0.get::<i64>(STAFF_ID_KEY) {
            Ok(id) => id.map(StaffId::new),
            Err(error) => {
                warn!(%error, "discarding unreadable session value");
                None
            }
        }
    }

    /// Drop the session entirely.
    pub fn purge(&self) {
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

//! Staff authorisation middleware and extractor.
//!
//! [`RequireStaff`] wraps every protected scope. It resolves the account
//! behind the session cookie, evaluates [`StaffAccess::authorize`], and either
//! short-circuits with a uniform 403 or stores the minted token in the request
//! extensions. Handlers take a [`StaffCaller`] to receive that token.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{FromRequest, HttpMessage, HttpRequest, ResponseError, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

use crate::domain::{Error, StaffAccess, StaffAccount, StaffId};

use super::session::STAFF_ID_KEY;
use super::state::HttpState;

/// Middleware admitting only active staff or superuser sessions.
#[derive(Clone, Copy, Default)]
pub struct RequireStaff;

impl<S, B> Transform<S, ServiceRequest> for RequireStaff
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireStaffMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireStaffMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Service wrapper produced by [`RequireStaff`].
pub struct RequireStaffMiddleware<S> {
    service: Rc<S>,
}

async fn resolve_caller(req: &ServiceRequest) -> Result<Option<StaffAccount>, Error> {
    let staff_id = match req.get_session().get::<i64>(STAFF_ID_KEY) {
        Ok(Some(raw)) => StaffId::new(raw),
        Ok(None) => return Ok(None),
        Err(error) => {
            warn!(%error, "discarding unreadable session value");
            return Ok(None);
        }
    };
    let Some(state) = req.app_data::<web::Data<HttpState>>() else {
        return Err(Error::internal("HTTP state is not configured"));
    };
    state.login.resolve(staff_id).await
}

impl<S, B> Service<ServiceRequest> for RequireStaffMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let decision = match resolve_caller(&req).await {
                Ok(account) => StaffAccess::authorize(account.as_ref()),
                Err(error) => Err(error),
            };
            match decision {
                Ok(access) => {
                    req.extensions_mut().insert(access);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(error) => {
                    debug!(code = ?error.code(), path = %req.path(), "request rejected by staff guard");
                    let response = error.error_response();
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Extractor yielding the token minted by [`RequireStaff`].
///
/// Using it on a route outside a guarded scope yields the same 403 as an
/// anonymous caller.
#[derive(Debug, Clone, Copy)]
pub struct StaffCaller(pub StaffAccess);

impl FromRequest for StaffCaller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let access = req.extensions().get::<StaffAccess>().copied();
        ready(match access {
            Some(access) => Ok(Self(access)),
            None => StaffAccess::authorize(None).map(Self),
        })
    }
}

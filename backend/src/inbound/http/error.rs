//! HTTP mapping for domain errors.
//!
//! The domain [`Error`] stays transport agnostic; this module gives it an
//! Actix status code and JSON body. Internal failures are logged in full and
//! redacted to a generic message on the wire.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    let redacted = Error::internal(INTERNAL_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if self.code() == ErrorCode::InternalError {
            error!(
                trace_id = self.trace_id().unwrap_or_default(),
                message = self.message(),
                "request failed with internal error"
            );
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal(INTERNAL_MESSAGE)
    }
}

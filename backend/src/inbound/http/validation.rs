//! Shared validation helpers for inbound HTTP adapters.
//!
//! Actix rejects malformed bodies, query strings, and path segments before a
//! handler runs. The extractor configs here route those rejections through
//! the domain error envelope so clients always see `invalid_request`.

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::{Error, FieldViolation, ViolationKind};

/// Error for a required field the payload left out.
pub(crate) fn missing_field(field: &'static str) -> Error {
    FieldViolation::new(field, ViolationKind::MissingField).into()
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "expected an application/json body".to_owned(),
        JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => {
            format!("request body exceeds {limit} bytes")
        }
        other => format!("malformed JSON body: {other}"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": "malformed_body" }))
        .into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("malformed query string: {err}"))
        .with_details(json!({ "code": "malformed_query" }))
        .into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("malformed path parameter: {err}"))
        .with_details(json!({ "field": "id", "code": "invalid_id" }))
        .into()
}

/// JSON extractor config reporting failures as `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Query extractor config reporting failures as `invalid_request`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}

/// Path extractor config reporting failures as `invalid_request`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}

//! Tests for domain error construction and serialisation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("x"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("x"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("x"), ErrorCode::Forbidden)]
#[case(Error::not_found("x"), ErrorCode::NotFound)]
#[case(Error::conflict("x"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("x"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("x"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] code: ErrorCode) {
    assert_eq!(error.code(), code);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let error = Error::forbidden("  ");
    assert_eq!(error.message(), "forbidden");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let payload = json!({"code": "not_found", "message": "missing"});
    let error: Error = TraceId::scope(trace_id, async move {
        serde_json::from_value(payload).expect("payload deserialises")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn serialises_camel_case_fields(expected_trace_id: String) {
    let error = Error::invalid_request("bad")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "name", "code": "blank"}));

    let value = serde_json::to_value(&error).expect("error serialises");

    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "bad",
            "traceId": expected_trace_id,
            "details": {"field": "name", "code": "blank"},
        })
    );
}

#[rstest]
fn serialisation_omits_absent_fields(base_error: Error) {
    let value = serde_json::to_value(&base_error).expect("error serialises");
    assert_eq!(value, json!({"code": "invalid_request", "message": "bad"}));
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let result: Result<Error, _> =
        serde_json::from_value(json!({"code": "conflict", "message": ""}));
    assert!(result.is_err());
}

//! OpenAPI schema definitions for domain and envelope types.
//!
//! Domain types and the `pagination` crate stay framework agnostic by not
//! deriving `ToSchema`. The wrappers here mirror their wire shape so the
//! generated document matches what handlers emit.

use utoipa::ToSchema;

use super::catalogue_dto::{ContactBody, ProductBody};
use super::nodes_dto::NodeBody;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The caller is not an active staff member.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with stored state.
    #[schema(rename = "conflict")]
    Conflict,
    /// The store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "a node cannot be its own supplier")]
    message: String,
    /// Request correlation id, echoed in the `trace-id` header.
    #[schema(example = "6f1d4a3e-9b0c-4f5e-8a7d-2c1b0e9f8d7c")]
    trace_id: Option<String>,
    /// Field-level details: `{ field, code, value? }`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`pagination::PaginationLinks`].
#[derive(ToSchema)]
#[schema(as = PaginationLinks)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PaginationLinksSchema {
    /// Link to this page.
    #[schema(rename = "self")]
    self_: String,
    /// Link to the following page.
    next: Option<String>,
    /// Link to the preceding page.
    prev: Option<String>,
}

/// Page of nodes.
#[derive(ToSchema)]
#[schema(as = NodePage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NodePageSchema {
    data: Vec<NodeBody>,
    #[schema(example = 20)]
    limit: usize,
    links: PaginationLinksSchema,
}

/// Page of contacts.
#[derive(ToSchema)]
#[schema(as = ContactPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ContactPageSchema {
    data: Vec<ContactBody>,
    limit: usize,
    links: PaginationLinksSchema,
}

/// Page of products.
#[derive(ToSchema)]
#[schema(as = ProductPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProductPageSchema {
    data: Vec<ProductBody>,
    limit: usize,
    links: PaginationLinksSchema,
}

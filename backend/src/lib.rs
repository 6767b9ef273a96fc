//! Electronics distribution network backend.
//!
//! Hexagonal layout: [`domain`] holds the supply hierarchy rules and ports,
//! [`inbound`] the Actix HTTP adapter, and [`outbound`] the PostgreSQL,
//! in-memory, and password hashing adapters.

pub mod doc;
pub mod domain;
pub mod example_data;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware attaching a trace id to every response.
pub use middleware::Trace;

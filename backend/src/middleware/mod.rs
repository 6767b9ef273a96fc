//! Request middleware.
//!
//! Request-lifecycle concerns shared by every route: trace identifiers and
//! request logging. Staff authorisation lives with the HTTP adapter in
//! [`crate::inbound::http::staff_guard`].

pub mod trace;

pub use trace::Trace;

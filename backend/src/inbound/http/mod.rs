//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate JSON and query strings into domain values and call the
//! driving ports held by [`state::HttpState`]. Every network, contact, and
//! product route sits behind [`staff_guard::RequireStaff`].

pub mod auth;
pub mod cache_control;
pub mod catalogue_dto;
pub mod contacts;
pub mod error;
pub mod health;
pub mod nodes;
pub mod nodes_dto;
mod paging;
pub mod products;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod staff_guard;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

//! Shared HTTP adapter state.
//!
//! Handlers receive [`HttpState`] through `web::Data` and depend only on the
//! driving ports, so tests can swap in mocks or in-memory services.

use std::sync::Arc;

use crate::domain::ports::{ContactBook, LoginService, NetworkCommand, NetworkQuery, ProductCatalog};

/// Driving ports used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Credential checks and session resolution.
    pub login: Arc<dyn LoginService>,
    /// Node mutations.
    pub network: Arc<dyn NetworkCommand>,
    /// Node reads.
    pub network_query: Arc<dyn NetworkQuery>,
    /// Contact management.
    pub contacts: Arc<dyn ContactBook>,
    /// Product management.
    pub products: Arc<dyn ProductCatalog>,
}

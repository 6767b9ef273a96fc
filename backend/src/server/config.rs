//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use network_backend::inbound::http::session_config::SessionSettings;
use network_backend::outbound::memory::{InMemoryNetworkStore, InMemoryStaffRepository};
use network_backend::outbound::persistence::DbPool;

/// Storage behind the driving ports.
#[derive(Clone)]
pub enum StoreBackend {
    /// PostgreSQL through a Diesel pool.
    Postgres(DbPool),
    /// Process-local stores, empty at startup.
    Memory {
        /// Contacts, products, and nodes.
        network: Arc<InMemoryNetworkStore>,
        /// Staff accounts.
        staff: Arc<InMemoryStaffRepository>,
    },
}

impl StoreBackend {
    /// Fresh in-memory stores.
    pub fn memory() -> Self {
        Self::Memory {
            network: Arc::new(InMemoryNetworkStore::new()),
            staff: Arc::new(InMemoryStaffRepository::new()),
        }
    }

    /// Short label for startup logs.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory { .. } => "memory",
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: StoreBackend,
}

impl ServerConfig {
    /// Construct a configuration serving in-memory stores.
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            store: StoreBackend::memory(),
        }
    }

    /// Serve the given storage backend.
    pub fn with_store(mut self, store: StoreBackend) -> Self {
        self.store = store;
        self
    }
}

//! Service configuration loaded via OrthoConfig.
//!
//! Values layer defaults, configuration files, `NETWORK_*` environment
//! variables, and command-line flags. The database URL additionally falls
//! back to the conventional `DATABASE_URL` variable.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: ([u8; 4], u16) = ([0, 0, 0, 0], 8080);
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Process-level settings for the network service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NETWORK")]
pub struct ServiceSettings {
    /// Listen address, default `0.0.0.0:8080`.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL; absent selects the in-memory store.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Staff account created at startup when running in memory.
    pub bootstrap_staff_username: Option<String>,
    /// Password for the bootstrap account.
    pub bootstrap_staff_password: Option<String>,
}

/// Credentials for the in-memory bootstrap account.
pub struct BootstrapStaff {
    /// Login name.
    pub username: String,
    /// Plain-text password, wiped on drop.
    pub password: Zeroizing<String>,
}

impl ServiceSettings {
    /// Configured listen address.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(DEFAULT_BIND_ADDR))
    }

    /// Database URL from settings, then from `DATABASE_URL`.
    #[must_use]
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .filter(|url| !url.trim().is_empty())
    }

    /// Pool size, default 10.
    #[must_use]
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    /// Bootstrap account when both username and password are set.
    #[must_use]
    pub fn bootstrap_staff(&self) -> Option<BootstrapStaff> {
        match (&self.bootstrap_staff_username, &self.bootstrap_staff_password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(BootstrapStaff {
                    username: username.clone(),
                    password: Zeroizing::new(password.clone()),
                })
            }
            _ => None,
        }
    }
}

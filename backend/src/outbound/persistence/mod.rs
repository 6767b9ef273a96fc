//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations translate between Diesel rows and domain types
//! and own the transaction boundary for every hierarchy change. Row structs
//! and the schema are private to this module.
//!
//! # Example
//!
//! ```rust,no_run
//! use network_backend::outbound::persistence::{
//!     DbPool, DieselNetworkNodeRepository, PoolConfig, run_migrations,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://localhost/network";
//! run_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let nodes = DieselNetworkNodeRepository::new(pool);
//! # let _ = nodes;
//! # Ok(())
//! # }
//! ```

mod diesel_contact_repository;
mod diesel_network_node_repository;
mod diesel_network_seed_repository;
mod diesel_product_repository;
mod diesel_staff_repository;
mod error_mapping;
mod migrations;
mod models;
mod node_rows;
mod pool;
mod schema;

pub use diesel_contact_repository::DieselContactRepository;
pub use diesel_network_node_repository::DieselNetworkNodeRepository;
pub use diesel_network_seed_repository::DieselNetworkSeedRepository;
pub use diesel_product_repository::DieselProductRepository;
pub use diesel_staff_repository::DieselStaffRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories built on Diesel.
//! - **memory**: process-local stores used when no database is configured
//!   and by the test suites.
//! - **security**: Argon2 password hashing for staff accounts.
//!
//! Adapters translate between domain types and their backing technology and
//! hold no business rules beyond the transaction boundary.

pub mod memory;
pub mod persistence;
pub mod security;

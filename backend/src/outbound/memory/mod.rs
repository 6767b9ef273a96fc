//! In-process adapters for database-less runs and HTTP tests.
//!
//! Each adapter keeps its state behind one `tokio` mutex so every mutation
//! is a single critical section, mirroring a transaction in the PostgreSQL
//! adapters.

mod network_store;
mod staff_store;

pub use network_store::InMemoryNetworkStore;
pub use staff_store::InMemoryStaffRepository;

//! Deterministic example distribution network for demonstration purposes.
//!
//! This crate describes a small electronics supply network (factories, retail
//! chains, and sole proprietors) as a [`NetworkBlueprint`]: plain records that
//! reference each other by index. It is independent of backend domain types so
//! the backend can convert the blueprint into its own commands.
//!
//! # Overview
//!
//! - Fixed contact and product tables
//! - Three factories, five retailers, seven entrepreneurs
//! - Entrepreneur catalogues drawn from the supplier's catalogue using a
//!   seeded RNG, so the same seed always yields the same network
//!
//! # Example
//!
//! ```
//! use example_data::generate_network;
//!
//! let blueprint = generate_network(42).expect("built-in tables are consistent");
//!
//! assert_eq!(blueprint.contacts.len(), 17);
//! assert_eq!(blueprint.products.len(), 20);
//! assert_eq!(blueprint.nodes.len(), 15);
//! assert_eq!(blueprint, generate_network(42).expect("deterministic"));
//! ```

mod catalogue;
mod error;
mod generator;
mod seed;

pub use error::{BlueprintError, GenerationError};
pub use generator::{DEFAULT_SEED, generate_network};
pub use seed::{ContactSeed, NetworkBlueprint, NodeSeed, ProductSeed};

//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`]) describe what the domain
//! needs from storage and crypto adapters; each exposes a typed error enum.
//! Driving ports ([`LoginService`], [`NetworkCommand`], [`NetworkQuery`],
//! [`ContactBook`], [`ProductCatalog`]) are what inbound adapters call.

mod macros;

mod contact_book;
mod contact_repository;
mod login_service;
mod network_command;
mod network_node_repository;
mod network_query;
mod network_seed_repository;
mod password_hasher;
mod product_catalog;
mod product_repository;
mod staff_repository;

pub(crate) use macros::define_port_error;

pub use contact_book::ContactBook;
pub use contact_repository::{ContactRemoval, ContactRepository, ContactRepositoryError};
pub use login_service::LoginService;
pub use network_command::NetworkCommand;
pub use network_node_repository::{NetworkNodeRepository, NetworkNodeRepositoryError};
pub use network_query::NetworkQuery;
pub use network_seed_repository::{
    NetworkSeedRepository, NetworkSeedRepositoryError, NetworkSeedRequest, SeedMode, SeedNode,
    SeedOutcome,
};
pub use password_hasher::{PasswordHashError, PasswordHasher};
pub use product_catalog::ProductCatalog;
pub use product_repository::{ProductRepository, ProductRepositoryError};
pub use staff_repository::{StaffCredentialRecord, StaffRepository, StaffRepositoryError};

#[cfg(test)]
pub use contact_book::MockContactBook;
#[cfg(test)]
pub use contact_repository::MockContactRepository;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use network_command::MockNetworkCommand;
#[cfg(test)]
pub use network_node_repository::MockNetworkNodeRepository;
#[cfg(test)]
pub use network_query::MockNetworkQuery;
#[cfg(test)]
pub use network_seed_repository::MockNetworkSeedRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use product_catalog::MockProductCatalog;
#[cfg(test)]
pub use product_repository::MockProductRepository;
#[cfg(test)]
pub use staff_repository::MockStaffRepository;

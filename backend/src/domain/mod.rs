//! Domain primitives, the supply hierarchy engine, and the services that
//! drive the distribution network.
//!
//! Purpose: define strongly typed entities used by the HTTP and persistence
//! adapters and keep every hierarchy rule in one place. Types are transport
//! agnostic; adapters convert them into DTOs at the edge.
//!
//! Public surface:
//! - Error (alias to `error::Error`) and ErrorCode: failure payloads.
//! - Contact, Product, NetworkNode: the data model.
//! - SupplyHierarchy: level derivation, cycle guard, and cascades.
//! - StaffAccess: capability token required by every network operation.
//! - NetworkService, ContactService, ProductService, StaffLoginService,
//!   NetworkSeeder: services implementing the driving ports.

pub mod catalogue_service;
pub mod contact;
pub mod error;
pub mod listing;
pub mod network;
pub mod network_seeder;
pub mod network_service;
pub mod ports;
pub mod product;
pub mod staff;
pub mod staff_service;
#[cfg(test)]
mod test_fixtures;
pub mod trace_id;
pub mod validation;

pub use self::catalogue_service::{ContactService, ProductService};
pub use self::contact::{Contact, ContactDraft, ContactId, EmailAddress};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::listing::{ListWindow, Page};
pub use self::network::{
    Debt, DebtInfo, Detachment, HierarchyError, LevelChange, NetworkNode, NewNetworkNode,
    NodeDraft, NodeFilter, NodeId, NodeLevel, NodeListQuery, NodeName, NodeOrdering, NodePage,
    NodePatch, NodeUpdate, OrderField, SupplierLink, SupplierRef, SupplyHierarchy, parse_date,
    text_term,
};
pub use self::network_seeder::{NetworkSeedReport, NetworkSeeder, NetworkSeedingError};
pub use self::network_service::NetworkService;
pub use self::product::{Product, ProductDraft, ProductId};
pub use self::staff::{
    LoginCredentials, LoginValidationError, NewStaffAccount, StaffAccess, StaffAccount, StaffId,
};
pub use self::staff_service::{StaffLoginService, StaffRole};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{FieldViolation, ViolationKind, bounded_text};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use network_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

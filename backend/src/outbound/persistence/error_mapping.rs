//! Shared Diesel error classification for the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Storage failure reduced to the cases repositories distinguish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The connection was lost.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// Anything else.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, emitting debug context.
pub(crate) fn classify(error: DieselError) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => StoreFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(kind, info) => {
            let constraint = info.constraint_name().map(str::to_owned);
            match kind {
                DatabaseErrorKind::UniqueViolation => StoreFailure::UniqueViolation { constraint },
                DatabaseErrorKind::ForeignKeyViolation => {
                    StoreFailure::ForeignKeyViolation { constraint }
                }
                DatabaseErrorKind::ClosedConnection => {
                    StoreFailure::Connection("database connection error".to_owned())
                }
                _ => StoreFailure::Query(info.message().to_owned()),
            }
        }
        other => StoreFailure::Query(other.to_string()),
    }
}

/// Error type threaded through Diesel transactions.
///
/// `Rejected` carries a port error decided inside the transaction; returning
/// it rolls the transaction back.
#[derive(Debug)]
pub(crate) enum TxError<E> {
    Diesel(DieselError),
    Rejected(E),
}

impl<E> From<DieselError> for TxError<E> {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl<E> TxError<E> {
    /// Collapse into the port error, mapping Diesel failures with `map`.
    pub(crate) fn resolve(self, map: impl FnOnce(DieselError) -> E) -> E {
        match self {
            Self::Diesel(error) => map(error),
            Self::Rejected(error) => error,
        }
    }
}

/// Build an `ILIKE` pattern matching `term` anywhere, escaping wildcards.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len().saturating_add(2));
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

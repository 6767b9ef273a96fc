//! Embedded schema migrations.
//!
//! Diesel's migration harness is synchronous, so migrations run on a blocking
//! thread over a dedicated connection before the pool is handed out.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failures while bringing the schema up to date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be opened.
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

/// Apply every pending migration to the database at `database_url`.
///
/// Returns the number of migrations applied.
///
/// # Errors
/// Returns [`MigrationError`] when the connection or a migration fails.
pub async fn run_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || apply_pending(&url))
        .await
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })??;
    info!(applied, "database schema is up to date");
    Ok(applied)
}

fn apply_pending(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn =
        PgConnection::establish(database_url).map_err(|err| MigrationError::Connection {
            message: err.to_string(),
        })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    Ok(applied.len())
}

//! Provision a staff account in PostgreSQL.
//!
//! # Examples
//! ```sh
//! NETWORK_STAFF_PASSWORD=... cargo run --bin create-staff -- --username manager --superuser
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use network_backend::domain::{StaffLoginService, StaffRole};
use network_backend::outbound::persistence::{
    DbPool, DieselStaffRepository, PoolConfig, run_migrations,
};
use network_backend::outbound::security::Argon2PasswordHasher;
use tokio::runtime::Builder;
use zeroize::Zeroizing;

const PASSWORD_ENV: &str = "NETWORK_STAFF_PASSWORD";

/// `create-staff` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "create-staff",
    about = "Create an active staff account for the network API",
    version
)]
struct CliArgs {
    /// Login name for the new account.
    #[arg(long)]
    username: String,
    /// Grant superuser rights.
    #[arg(long)]
    superuser: bool,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let password = Zeroizing::new(
        std::env::var(PASSWORD_ENV).map_err(|_| eyre!("{PASSWORD_ENV} must hold the password"))?,
    );
    let database_url = resolve_database_url(args.database_url.clone())?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(create(args, database_url, password))
}

async fn create(args: CliArgs, database_url: String, password: Zeroizing<String>) -> Result<()> {
    run_migrations(&database_url)
        .await
        .wrap_err("apply database migrations")?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("create database pool")?;
    let service = StaffLoginService::new(
        Arc::new(DieselStaffRepository::new(pool)),
        Arc::new(Argon2PasswordHasher),
    );
    let role = if args.superuser {
        StaffRole::SUPERUSER
    } else {
        StaffRole::STAFF
    };
    let account = service
        .provision(&args.username, password, role)
        .await
        .map_err(|err| eyre!("create staff account: {err}"))?;
    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "created staff account {} (id {}, superuser: {})",
        account.username, account.id, account.is_superuser
    )?;
    Ok(())
}

fn resolve_database_url(explicit: Option<String>) -> Result<String> {
    explicit
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| eyre!("--database-url or DATABASE_URL is required"))
}

//! Load the deterministic example network.
//!
//! Without a database URL the network is generated in memory and only the
//! report is printed, which is useful for inspecting a seed.
//!
//! # Examples
//! ```sh
//! cargo run --bin seed-network -- --seed 7 --replace --database-url postgres://localhost/network
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultClock;
use network_backend::domain::ports::{SeedMode, SeedOutcome};
use network_backend::domain::{NetworkSeedReport, NetworkSeeder};
use network_backend::outbound::memory::InMemoryNetworkStore;
use network_backend::outbound::persistence::{
    DbPool, DieselNetworkSeedRepository, PoolConfig, run_migrations,
};
use tokio::runtime::Builder;

/// `seed-network` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "seed-network",
    about = "Populate the store with the example distribution network",
    version
)]
struct CliArgs {
    /// Generator seed; the same seed always yields the same network.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Delete existing contacts, products, and nodes first.
    #[arg(long)]
    replace: bool,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

impl CliArgs {
    const fn mode(&self) -> SeedMode {
        if self.replace {
            SeedMode::Replace
        } else {
            SeedMode::IfEmpty
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    let database_url = args
        .database_url
        .clone()
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty());
    let report = runtime.block_on(seed(&args, database_url))?;
    print_report(&mut io::stdout().lock(), args.seed, &report)?;
    Ok(())
}

async fn seed(args: &CliArgs, database_url: Option<String>) -> Result<NetworkSeedReport> {
    let report = match database_url {
        Some(url) => {
            run_migrations(&url)
                .await
                .wrap_err("apply database migrations")?;
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .wrap_err("create database pool")?;
            NetworkSeeder::new(
                Arc::new(DieselNetworkSeedRepository::new(pool)),
                Arc::new(DefaultClock),
            )
            .seed(args.seed, args.mode())
            .await
        }
        None => {
            NetworkSeeder::new(Arc::new(InMemoryNetworkStore::new()), Arc::new(DefaultClock))
                .seed(args.seed, args.mode())
                .await
        }
    };
    report.wrap_err("seed example network")
}

fn print_report(out: &mut impl Write, seed: u64, report: &NetworkSeedReport) -> io::Result<()> {
    match report.outcome {
        SeedOutcome::Applied {
            contacts,
            products,
            nodes,
        } => writeln!(
            out,
            "seed {seed}: inserted {contacts} contacts, {products} products, {nodes} nodes"
        )?,
        SeedOutcome::SkippedNonEmpty => {
            writeln!(out, "seed {seed}: store already holds nodes, nothing inserted")?;
        }
    }
    writeln!(
        out,
        "factories={} retailers={} entrepreneurs={} deeper={}",
        report.factories, report.retailers, report.entrepreneurs, report.deeper
    )?;
    writeln!(
        out,
        "total_debt={} average_products={}",
        report.total_debt, report.average_products
    )
}

//! Startup seeding orchestration.

use std::sync::Arc;

use mockable::DefaultClock;
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{NetworkSeedRepository, SeedMode, SeedOutcome};
use crate::domain::{NetworkSeedReport, NetworkSeeder, NetworkSeedingError};
use crate::example_data::config::ExampleDataSettings;

/// Errors returned while seeding at startup.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// Generation, validation, or persistence failed.
    #[error("example network seeding error: {0}")]
    Seeding(#[from] NetworkSeedingError),
}

/// Load the example network on startup when enabled.
///
/// A store that already holds data is left untouched.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use network_backend::example_data::{ExampleDataSettings, seed_example_data_on_startup};
/// use network_backend::outbound::memory::InMemoryNetworkStore;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = ExampleDataSettings {
///     seed_example_data: true,
///     example_seed: Some(42),
/// };
/// let store = Arc::new(InMemoryNetworkStore::new());
/// let report = seed_example_data_on_startup(&settings, store).await?;
/// assert!(report.is_some());
/// # Ok(())
/// # }
/// ```
pub async fn seed_example_data_on_startup<R>(
    settings: &ExampleDataSettings,
    repository: Arc<R>,
) -> Result<Option<NetworkSeedReport>, StartupSeedingError>
where
    R: NetworkSeedRepository,
{
    if !settings.is_enabled() {
        info!(reason = "disabled", "example network seeding skipped");
        return Ok(None);
    }

    let seed = settings.example_seed();
    let seeder = NetworkSeeder::new(repository, Arc::new(DefaultClock));
    let report = seeder.seed(seed, SeedMode::IfEmpty).await?;

    match report.outcome {
        SeedOutcome::Applied {
            contacts,
            products,
            nodes,
        } => info!(
            seed,
            contacts,
            products,
            nodes,
            factories = report.factories,
            retailers = report.retailers,
            entrepreneurs = report.entrepreneurs,
            total_debt = %report.total_debt,
            "example network seeded"
        ),
        SeedOutcome::SkippedNonEmpty => {
            info!(seed, "store already holds network data; example seeding skipped");
        }
    }
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::outbound::memory::InMemoryNetworkStore;

    fn settings(enabled: bool) -> ExampleDataSettings {
        ExampleDataSettings {
            seed_example_data: enabled,
            example_seed: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn disabled_seeding_does_nothing() {
        let store = Arc::new(InMemoryNetworkStore::new());
        let report = seed_example_data_on_startup(&settings(false), store)
            .await
            .expect("disabled seeding succeeds");
        assert!(report.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn second_start_leaves_the_network_alone() {
        let store = Arc::new(InMemoryNetworkStore::new());
        let first = seed_example_data_on_startup(&settings(true), store.clone())
            .await
            .expect("first run")
            .expect("report");
        assert!(matches!(first.outcome, SeedOutcome::Applied { nodes: 15, .. }));

        let second = seed_example_data_on_startup(&settings(true), store)
            .await
            .expect("second run")
            .expect("report");
        assert_eq!(second.outcome, SeedOutcome::SkippedNonEmpty);
    }
}

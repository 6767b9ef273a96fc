//! Example network configuration loaded via OrthoConfig.

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_EXAMPLE_SEED: u64 = 42;

/// Settings controlling example network seeding at startup.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "NETWORK")]
pub struct ExampleDataSettings {
    /// Load the example network when the store is empty.
    #[ortho_config(default = false)]
    pub seed_example_data: bool,
    /// Generator seed; the same value always yields the same network.
    pub example_seed: Option<u64>,
}

impl ExampleDataSettings {
    /// Whether startup seeding is requested.
    pub fn is_enabled(&self) -> bool {
        self.seed_example_data
    }

    /// Configured generator seed, falling back to 42.
    pub fn example_seed(&self) -> u64 {
        self.example_seed.unwrap_or(DEFAULT_EXAMPLE_SEED)
    }
}

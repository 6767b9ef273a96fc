//! Temporary databases cloned from a migrated template.
//!
//! The template name carries a hash of `migrations/`, so a schema change
//! provisions a fresh template instead of reusing a stale one.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use network_backend::outbound::persistence::run_migrations;
use pg_embedded_setup_unpriv::test_support::{hash_directory, shared_cluster_handle};
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;
use uuid::Uuid;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const TEMPLATE_PREFIX: &str = "network_template";
const PROVISION_RETRIES: usize = 5;
const PROVISION_RETRY_DELAY: Duration = Duration::from_millis(500);

fn template_name() -> Result<String, String> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let hash = hash_directory(dir).map_err(|err| format!("hash migrations: {err}"))?;
    let short = hash.get(..8).unwrap_or(&hash);
    Ok(format!("{TEMPLATE_PREFIX}_{short}"))
}

fn ensure_template(cluster: &ClusterHandle, runtime: &Runtime) -> Result<String, String> {
    let name = template_name()?;
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());
    let exists = cluster
        .database_exists(name.as_str())
        .map_err(|err| format!("template check: {err:?}"))?;
    if !exists {
        cluster
            .create_database(name.as_str())
            .map_err(|err| format!("create template: {err:?}"))?;
        let url = cluster.connection().database_url(&name);
        runtime
            .block_on(run_migrations(&url))
            .map_err(|err| format!("migrate template: {err}"))?;
    }
    Ok(name)
}

/// Provision an isolated database with every migration applied.
///
/// Retries briefly because parallel suites race on template creation.
pub fn provision_migrated_database(runtime: &Runtime) -> Result<TemporaryDatabase, String> {
    let cluster = shared_cluster_handle().map_err(|err| format!("{err:?}"))?;
    let mut last_error = String::from("no attempt made");
    for attempt in 1..=PROVISION_RETRIES {
        let result = ensure_template(cluster, runtime).and_then(|template| {
            let name = format!("test_{}", Uuid::new_v4().simple());
            cluster
                .temporary_database_from_template(name.as_str(), template.as_str())
                .map_err(|err| format!("clone template: {err:?}"))
        });
        match result {
            Ok(database) => return Ok(database),
            Err(error) => last_error = format!("attempt {attempt}/{PROVISION_RETRIES}: {error}"),
        }
        std::thread::sleep(PROVISION_RETRY_DELAY);
    }
    Err(last_error)
}

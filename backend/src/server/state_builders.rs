//! Builders wiring storage adapters into the HTTP state.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultClock;
use tracing::info;

use network_backend::domain::ports::{
    ContactRepository, NetworkNodeRepository, ProductRepository, StaffRepository,
};
use network_backend::domain::{
    ContactService, NetworkService, ProductService, StaffLoginService, StaffRole,
};
use network_backend::example_data::{ExampleDataSettings, seed_example_data_on_startup};
use network_backend::inbound::http::state::HttpState;
use network_backend::outbound::persistence::{
    DbPool, DieselContactRepository, DieselNetworkNodeRepository, DieselNetworkSeedRepository,
    DieselProductRepository, DieselStaffRepository, PoolConfig, run_migrations,
};
use network_backend::outbound::security::Argon2PasswordHasher;
use network_backend::settings::ServiceSettings;

use super::StoreBackend;

fn http_state_over<N, C, P, S>(
    nodes: Arc<N>,
    contacts: Arc<C>,
    products: Arc<P>,
    staff: Arc<S>,
) -> HttpState
where
    N: NetworkNodeRepository + 'static,
    C: ContactRepository + 'static,
    P: ProductRepository + 'static,
    S: StaffRepository + 'static,
{
    let network = Arc::new(NetworkService::new(nodes, Arc::new(DefaultClock)));
    HttpState {
        login: Arc::new(StaffLoginService::new(staff, Arc::new(Argon2PasswordHasher))),
        network: network.clone(),
        network_query: network,
        contacts: Arc::new(ContactService::new(contacts)),
        products: Arc::new(ProductService::new(products)),
    }
}

/// Build the driving ports over the selected backend.
pub(crate) fn build_http_state(store: &StoreBackend) -> HttpState {
    match store {
        StoreBackend::Postgres(pool) => http_state_over(
            Arc::new(DieselNetworkNodeRepository::new(pool.clone())),
            Arc::new(DieselContactRepository::new(pool.clone())),
            Arc::new(DieselProductRepository::new(pool.clone())),
            Arc::new(DieselStaffRepository::new(pool.clone())),
        ),
        StoreBackend::Memory { network, staff } => http_state_over(
            Arc::clone(network),
            Arc::clone(network),
            Arc::clone(network),
            Arc::clone(staff),
        ),
    }
}

/// Select PostgreSQL when a database URL is configured, memory otherwise.
///
/// Pending migrations run before the pool is built.
pub async fn connect_store(settings: &ServiceSettings) -> Result<StoreBackend> {
    let Some(url) = settings.database_url() else {
        return Ok(StoreBackend::memory());
    };
    let applied = run_migrations(&url)
        .await
        .wrap_err("apply database migrations")?;
    info!(applied, "database migrations complete");
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()))
        .await
        .wrap_err("create database pool")?;
    Ok(StoreBackend::Postgres(pool))
}

/// Provision the configured bootstrap superuser in the in-memory store.
///
/// PostgreSQL deployments provision accounts with `create-staff`.
pub async fn provision_bootstrap_staff(
    store: &StoreBackend,
    settings: &ServiceSettings,
) -> Result<()> {
    let (StoreBackend::Memory { staff, .. }, Some(bootstrap)) = (store, settings.bootstrap_staff())
    else {
        return Ok(());
    };
    let service = StaffLoginService::new(Arc::clone(staff), Arc::new(Argon2PasswordHasher));
    service
        .provision(&bootstrap.username, bootstrap.password, StaffRole::SUPERUSER)
        .await
        .wrap_err("provision bootstrap staff account")?;
    Ok(())
}

/// Load the example network when enabled.
pub async fn seed_on_startup(store: &StoreBackend, settings: &ExampleDataSettings) -> Result<()> {
    match store {
        StoreBackend::Postgres(pool) => {
            let repository = Arc::new(DieselNetworkSeedRepository::new(pool.clone()));
            seed_example_data_on_startup(settings, repository).await
        }
        StoreBackend::Memory { network, .. } => {
            seed_example_data_on_startup(settings, Arc::clone(network)).await
        }
    }
    .wrap_err("seed example network")?;
    Ok(())
}

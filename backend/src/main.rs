//! Backend entry-point: loads configuration, prepares the store, and serves
//! the REST API with its OpenAPI docs.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use network_backend::example_data::ExampleDataSettings;
use network_backend::inbound::http::health::HealthState;
use network_backend::inbound::http::session_config::{
    BuildMode, key_fingerprint, session_settings_from_env,
};
use network_backend::settings::ServiceSettings;
use server::{
    ServerConfig, connect_store, create_server, provision_bootstrap_staff, seed_on_startup,
};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load().wrap_err("load service settings")?;
    let example_data = ExampleDataSettings::load().wrap_err("load example data settings")?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::current())
        .wrap_err("load session settings")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        "session signing key loaded"
    );

    let store = connect_store(&settings).await?;
    info!(store = store.label(), bind_addr = %settings.bind_addr(), "starting network backend");
    provision_bootstrap_staff(&store, &settings).await?;
    seed_on_startup(&store, &example_data).await?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(session, settings.bind_addr()).with_store(store);
    let server = create_server(health_state.clone(), config).wrap_err("start HTTP server")?;
    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("HTTP server failed")
}

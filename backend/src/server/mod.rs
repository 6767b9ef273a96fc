//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::{ServerConfig, StoreBackend};
#[cfg(feature = "metrics")]
use metrics::build_metrics;
pub use state_builders::{connect_store, provision_bootstrap_staff, seed_on_startup};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{DefaultHeaders, NormalizePath};
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use network_backend::doc::ApiDoc;
use network_backend::inbound::http::auth::{login, logout};
use network_backend::inbound::http::cache_control::private_no_cache_header;
use network_backend::inbound::http::health::{HealthState, live, ready};
use network_backend::inbound::http::session_config::{SessionSettings, session_middleware};
use network_backend::inbound::http::staff_guard::RequireStaff;
use network_backend::inbound::http::state::HttpState;
use network_backend::inbound::http::validation::{json_config, path_config, query_config};
use network_backend::inbound::http::{contacts, nodes, products};
use network_backend::Trace;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: std::sync::Arc<SessionSettings>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let api = web::scope("/api/v1")
        .wrap(session_middleware(&session))
        .service(login)
        .service(logout)
        .service(
            web::scope("/nodes")
                .wrap(RequireStaff)
                .wrap(DefaultHeaders::new().add(private_no_cache_header()))
                .configure(nodes::configure),
        )
        .service(
            web::scope("/contacts")
                .wrap(RequireStaff)
                .wrap(DefaultHeaders::new().add(private_no_cache_header()))
                .configure(contacts::configure),
        )
        .service(
            web::scope("/products")
                .wrap(RequireStaff)
                .wrap(DefaultHeaders::new().add(private_no_cache_header()))
                .configure(products::configure),
        );

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .wrap(NormalizePath::trim())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server over the configured store.
///
/// Readiness flips to healthy once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config.store));
    let ServerConfig {
        session,
        bind_addr,
        store: _,
    } = config;
    let session = std::sync::Arc::new(session);
    #[cfg(feature = "metrics")]
    let prometheus = build_metrics()?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

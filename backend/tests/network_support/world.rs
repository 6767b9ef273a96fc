//! Server harness and shared world for the network behaviour suites.
//!
//! Each world owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The server runs over in-memory stores
//! that the steps can also reach directly for seeding and account setup.
//! Dropping the fixture stops the server even if a step panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::cookie::Key;
use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::middleware::{DefaultHeaders, NormalizePath};
use actix_web::{App, HttpServer, web};
use awc::Client;
use mockable::DefaultClock;
use network_backend::Trace;
use network_backend::domain::ports::SeedMode;
use network_backend::domain::{
    ContactService, NetworkSeeder, NetworkService, ProductService, StaffId, StaffLoginService,
    StaffRole, TRACE_ID_HEADER,
};
use network_backend::inbound::http::auth::{login, logout};
use network_backend::inbound::http::cache_control::private_no_cache_header;
use network_backend::inbound::http::session_config::{SessionSettings, session_middleware};
use network_backend::inbound::http::staff_guard::RequireStaff;
use network_backend::inbound::http::state::HttpState;
use network_backend::inbound::http::validation::{json_config, path_config, query_config};
use network_backend::inbound::http::{contacts, nodes, products};
use network_backend::outbound::memory::{InMemoryNetworkStore, InMemoryStaffRepository};
use network_backend::outbound::security::Argon2PasswordHasher;
use rstest::fixture;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use zeroize::Zeroizing;

pub(crate) const STAFF_PASSWORD: &str = "correct horse battery staple";

pub(crate) struct NetworkWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) network: Arc<InMemoryNetworkStore>,
    pub(crate) staff: Arc<InMemoryStaffRepository>,
    pub(crate) accounts: HashMap<String, StaffId>,
    pub(crate) nodes: HashMap<String, i64>,
    pub(crate) contact_id: Option<i64>,
    pub(crate) session_cookie: Option<String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
    pub(crate) last_cache_control: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<NetworkWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

/// Run a future on the world's runtime with the server base URL.
///
/// The future must not borrow the world.
pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn http_state(network: &Arc<InMemoryNetworkStore>, staff: &Arc<InMemoryStaffRepository>) -> HttpState {
    let service = Arc::new(NetworkService::new(
        Arc::clone(network),
        Arc::new(DefaultClock),
    ));
    HttpState {
        login: Arc::new(StaffLoginService::new(
            Arc::clone(staff),
            Arc::new(Argon2PasswordHasher),
        )),
        network: service.clone(),
        network_query: service,
        contacts: Arc::new(ContactService::new(Arc::clone(network))),
        products: Arc::new(ProductService::new(Arc::clone(network))),
    }
}

async fn spawn_server(state: HttpState) -> Result<(String, ServerHandle), String> {
    let settings = Arc::new(SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
    });
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let data = web::Data::new(state);

    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .wrap(session_middleware(&settings))
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

        App::new()
            .app_data(data.clone())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .wrap(NormalizePath::trim())
            .wrap(Trace)
            .service(api)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

#[fixture]
pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let network = Arc::new(InMemoryNetworkStore::new());
    let staff = Arc::new(InMemoryStaffRepository::new());
    let state = http_state(&network, &staff);
    let (base_url, server) = local
        .block_on(&runtime, spawn_server(state))
        .expect("spawn network server");

    WorldFixture {
        world: Rc::new(RefCell::new(NetworkWorld {
            runtime,
            local,
            base_url,
            server,
            network,
            staff,
            accounts: HashMap::new(),
            nodes: HashMap::new(),
            contact_id: None,
            session_cookie: None,
            last_status: None,
            last_body: None,
            last_trace_id: None,
            last_cache_control: None,
        })),
    }
}

/// Store an account with the given flags and password [`STAFF_PASSWORD`].
pub(crate) fn provision_account(world: &SharedWorld, username: &str, role: StaffRole) {
    let staff = world.borrow().staff.clone();
    let service = StaffLoginService::new(staff, Arc::new(Argon2PasswordHasher));
    let name = username.to_owned();
    let account = with_world_async(world, |_| async move {
        service
            .provision(&name, Zeroizing::new(STAFF_PASSWORD.to_owned()), role)
            .await
            .expect("provision account")
    });
    world
        .borrow_mut()
        .accounts
        .insert(username.to_owned(), account.id);
}

/// Load the example network for `seed` into the in-memory store.
pub(crate) fn seed_example_network(world: &SharedWorld, seed: u64) {
    let network = world.borrow().network.clone();
    with_world_async(world, |_| async move {
        NetworkSeeder::new(network, Arc::new(DefaultClock))
            .seed(seed, SeedMode::Replace)
            .await
            .expect("seed example network")
    });
}

/// Disable a stored account.
pub(crate) fn deactivate_account(world: &SharedWorld, username: &str) {
    let (staff, id) = {
        let ctx = world.borrow();
        let id = *ctx.accounts.get(username).expect("known account");
        (ctx.staff.clone(), id)
    };
    let updated = with_world_async(world, |_| async move { staff.set_active(id, false).await });
    assert!(updated, "account {username} should exist");
}

fn cookie_pair(header_value: &str) -> Option<String> {
    header_value.split(';').next().map(str::to_owned)
}

/// Send one request, recording status, body, trace id, and cache policy.
pub(crate) fn perform(world: &SharedWorld, method: Method, path: &str, payload: Option<Value>) {
    let cookie = world.borrow().session_cookie.clone();
    let path = path.to_owned();
    let (status, trace_id, cache_control, set_cookie, body) =
        with_world_async(world, |base_url| async move {
            let mut request = Client::default().request(method, format!("{base_url}{path}"));
            if let Some(cookie) = cookie {
                request = request.insert_header((header::COOKIE, cookie));
            }
            let mut response = match payload {
                Some(payload) => request.send_json(&payload).await.expect("request sent"),
                None => request.send().await.expect("request sent"),
            };
            let header_text = |name: &str| {
                response
                    .headers()
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned)
            };
            let trace_id = header_text(TRACE_ID_HEADER);
            let cache_control = header_text(header::CACHE_CONTROL.as_str());
            let set_cookie = header_text(header::SET_COOKIE.as_str());
            let status = response.status().as_u16();
            let bytes = response.body().await.expect("response body");
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).expect("JSON body")
            };
            (status, trace_id, cache_control, set_cookie, body)
        });

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.last_trace_id = trace_id;
    ctx.last_cache_control = cache_control;
    ctx.last_body = Some(body);
    if let Some(pair) = set_cookie.as_deref().and_then(cookie_pair) {
        ctx.session_cookie = Some(pair);
    }
}

/// Sign in as `username` with `password`.
pub(crate) fn sign_in(world: &SharedWorld, username: &str, password: &str) {
    perform(
        world,
        Method::POST,
        "/api/v1/login",
        Some(serde_json::json!({ "username": username, "password": password })),
    );
}

/// Status and body of the last response.
pub(crate) fn last_response(world: &SharedWorld) -> (u16, Value) {
    let ctx = world.borrow();
    (
        ctx.last_status.expect("a request was made"),
        ctx.last_body.clone().expect("a response body was recorded"),
    )
}

/// Id recorded for a node created under `name`.
pub(crate) fn node_id(world: &SharedWorld, name: &str) -> i64 {
    *world
        .borrow()
        .nodes
        .get(name.trim_matches('"'))
        .unwrap_or_else(|| panic!("node {name} was not created"))
}

//! Steps shared by every network behaviour suite.

use actix_web::http::Method;
use network_backend::domain::StaffRole;
use rstest_bdd_macros::{given, then, when};
use serde_json::{Value, json};

use super::world::{
    STAFF_PASSWORD, WorldFixture, last_response, perform, provision_account,
    seed_example_network, sign_in,
};

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches('"')
}

#[given("a running network server")]
fn a_running_network_server(world: &WorldFixture) {
    let _ = world;
}

#[given("the example network is loaded with seed {seed}")]
fn the_example_network_is_loaded(world: &WorldFixture, seed: u64) {
    seed_example_network(&world.world(), seed);
}

#[given("a staff account {username} exists")]
fn a_staff_account_exists(world: &WorldFixture, username: String) {
    provision_account(&world.world(), unquote(&username), StaffRole::STAFF);
}

#[given("a non-staff account {username} exists")]
fn a_non_staff_account_exists(world: &WorldFixture, username: String) {
    let role = StaffRole {
        is_staff: false,
        is_superuser: false,
    };
    provision_account(&world.world(), unquote(&username), role);
}

#[given("a staff member is signed in")]
fn a_staff_member_is_signed_in(world: &WorldFixture) {
    let shared = world.world();
    provision_account(&shared, "manager", StaffRole::STAFF);
    sign_in(&shared, "manager", STAFF_PASSWORD);
    let (status, _) = last_response(&shared);
    assert_eq!(status, 200, "staff sign-in should succeed");
}

#[given("a contact exists")]
fn a_contact_exists(world: &WorldFixture) {
    let shared = world.world();
    perform(
        &shared,
        Method::POST,
        "/api/v1/contacts",
        Some(json!({
            "email": "hq@example.com",
            "country": "Germany",
            "city": "Berlin",
            "street": "Unter den Linden",
            "house_number": "1",
        })),
    );
    let (status, body) = last_response(&shared);
    assert_eq!(status, 201, "contact creation should succeed: {body}");
    shared.borrow_mut().contact_id = body.get("id").and_then(Value::as_i64);
}

#[when("the client lists nodes")]
fn the_client_lists_nodes(world: &WorldFixture) {
    perform(&world.world(), Method::GET, "/api/v1/nodes", None);
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &WorldFixture, status: u16) {
    let (actual, body) = last_response(&world.world());
    assert_eq!(actual, status, "unexpected response body: {body}");
}

#[then("the response is a validation error with code {code}")]
fn the_response_is_a_validation_error(world: &WorldFixture, code: String) {
    let (status, body) = last_response(&world.world());
    assert_eq!(status, 400, "unexpected response body: {body}");
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], unquote(&code));
}

#[then("the response is forbidden with a trace id")]
fn the_response_is_forbidden_with_a_trace_id(world: &WorldFixture) {
    let shared = world.world();
    let (status, body) = last_response(&shared);
    assert_eq!(status, 403);
    assert_eq!(body["code"], "forbidden");
    let ctx = shared.borrow();
    let trace_id = ctx.last_trace_id.as_deref().expect("trace id header");
    assert_eq!(body.get("traceId").and_then(Value::as_str), Some(trace_id));
}

//! Behaviour tests for supplier links, derived levels, and cascades.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

// Shared world helpers are not all used by every suite.
#[allow(dead_code)]
#[path = "network_support/mod.rs"]
mod network_support;

use actix_web::http::Method;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

use network_support::world::{self as world_support, SharedWorld, WorldFixture, last_response, node_id, perform};

#[fixture]
fn world() -> WorldFixture {
    world_support::world()
}

fn clean(raw: &str) -> String {
    raw.trim().trim_matches('"').to_owned()
}

fn create_node(world: &SharedWorld, name: &str, supplier: Option<i64>, extra: Value) {
    let contact_id = world.borrow().contact_id.expect("contact created first");
    let mut payload = json!({
        "name": name,
        "contact_id": contact_id,
        "supplier_id": supplier,
    });
    if let (Some(target), Some(fields)) = (payload.as_object_mut(), extra.as_object()) {
        target.extend(fields.clone());
    }
    perform(world, Method::POST, "/api/v1/nodes", Some(payload));
    let (status, body) = last_response(world);
    if status == 201 {
        let id = body.get("id").and_then(Value::as_i64).expect("node id");
        world.borrow_mut().nodes.insert(name.to_owned(), id);
    }
}

fn fetch_node(world: &SharedWorld, name: &str) -> Value {
    let id = node_id(world, name);
    perform(world, Method::GET, &format!("/api/v1/nodes/{id}"), None);
    let (status, body) = last_response(world);
    assert_eq!(status, 200, "node {name} should be readable: {body}");
    body
}

#[given("node {name} has no supplier")]
fn node_has_no_supplier(world: &WorldFixture, name: String) {
    let shared = world.world();
    create_node(&shared, &clean(&name), None, json!({}));
    assert_eq!(last_response(&shared).0, 201);
}

#[given("node {name} is supplied by {supplier}")]
fn node_is_supplied_by(world: &WorldFixture, name: String, supplier: String) {
    let shared = world.world();
    let supplier_id = node_id(&shared, &clean(&supplier));
    create_node(&shared, &clean(&name), Some(supplier_id), json!({}));
    assert_eq!(last_response(&shared).0, 201);
}

#[when("node {name} is created with debt {debt} and level {level}")]
fn node_is_created_with_debt(world: &WorldFixture, name: String, debt: String, level: u32) {
    create_node(
        &world.world(),
        &clean(&name),
        None,
        json!({ "debt": clean(&debt), "level": level }),
    );
}

#[when("node {name} is detached from its supplier")]
fn node_is_detached(world: &WorldFixture, name: String) {
    let shared = world.world();
    let id = node_id(&shared, &name);
    perform(
        &shared,
        Method::PATCH,
        &format!("/api/v1/nodes/{id}"),
        Some(json!({ "supplier_id": null })),
    );
    assert_eq!(last_response(&shared).0, 200);
}

#[when("node {name} is re-parented to {supplier}")]
fn node_is_reparented(world: &WorldFixture, name: String, supplier: String) {
    let shared = world.world();
    let id = node_id(&shared, &name);
    let supplier_id = node_id(&shared, &supplier);
    perform(
        &shared,
        Method::PATCH,
        &format!("/api/v1/nodes/{id}"),
        Some(json!({ "supplier_id": supplier_id })),
    );
}

#[when("node {name} is deleted")]
fn node_is_deleted(world: &WorldFixture, name: String) {
    let shared = world.world();
    let id = node_id(&shared, &name);
    perform(&shared, Method::DELETE, &format!("/api/v1/nodes/{id}"), None);
}

#[then("node {name} has level {level}")]
fn node_has_level(world: &WorldFixture, name: String, level: u32) {
    let body = fetch_node(&world.world(), &name);
    assert_eq!(body["level"], level, "node {name}: {body}");
}

#[then("node {name} is a root supplier")]
fn node_is_a_root_supplier(world: &WorldFixture, name: String) {
    let body = fetch_node(&world.world(), &name);
    assert_eq!(body["level"], 0);
    assert!(body["supplier_id"].is_null());
    assert!(body["supplier"].is_null());
    assert_eq!(body["level_display"], "Factory");
}

#[then("node {name} owes {debt}")]
fn node_owes(world: &WorldFixture, name: String, debt: String) {
    let body = fetch_node(&world.world(), &name);
    assert_eq!(body["debt"], clean(&debt));
}

#[scenario(path = "tests/features/supply_hierarchy.feature")]
fn supply_hierarchy_scenarios(world: WorldFixture) {
    drop(world);
}

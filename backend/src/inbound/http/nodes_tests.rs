//! Tests for network node HTTP handlers.

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::staff::test_access;
use crate::domain::{ContactDraft, ContactId};
use crate::inbound::http::staff_guard::RequireStaff;
use crate::inbound::http::test_utils::{
    session_cookie, staff_state, test_session_middleware, test_sign_in,
};

macro_rules! node_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .wrap(test_session_middleware())
                .route("/test-login", web::post().to(test_sign_in))
                .service(
                    web::scope("/api/v1/nodes")
                        .wrap(RequireStaff)
                        .configure(configure),
                ),
        )
        .await
    };
}

async fn seed_contact(state: &web::Data<HttpState>, email: &str) -> ContactId {
    let draft = ContactDraft::try_new(email, "Germany", "Berlin", "Alexanderplatz", "1")
        .expect("contact draft");
    state
        .contacts
        .create_contact(&test_access(), draft)
        .await
        .expect("contact stored")
        .id
}

macro_rules! sign_in {
    ($app:expr) => {{
        let res = test::call_service(
            &$app,
            test::TestRequest::post().uri("/test-login").to_request(),
        )
        .await;
        session_cookie(&res)
    }};
}

macro_rules! call_json {
    ($app:expr, $req:expr, $cookie:expr) => {{
        let res = test::call_service(&$app, $req.cookie($cookie.clone()).to_request()).await;
        let status = res.status();
        let bytes = test::read_body(res).await;
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }};
}

fn create(name: &str, contact: ContactId, supplier: Option<i64>) -> test::TestRequest {
    test::TestRequest::post().uri("/api/v1/nodes").set_json(json!({
        "name": name,
        "contact_id": contact.value(),
        "products_ids": [],
        "supplier_id": supplier,
    }))
}

fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("node id")
}

#[rstest]
#[case(test::TestRequest::get().uri("/api/v1/nodes"))]
#[case(test::TestRequest::get().uri("/api/v1/nodes/factories"))]
#[case(test::TestRequest::post().uri("/api/v1/nodes/clear-debt").set_json(json!({"ids": [1]})))]
#[case(test::TestRequest::delete().uri("/api/v1/nodes/1"))]
#[actix_web::test]
async fn anonymous_callers_are_forbidden(#[case] req: test::TestRequest) {
    let state = staff_state();
    let app = node_app!(state);
    let res = test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "forbidden");
}

#[rstest]
#[actix_web::test]
async fn created_nodes_start_debt_free_whatever_the_payload() {
    let state = staff_state();
    let contact = seed_contact(&state, "factory@example.com").await;
    let app = node_app!(state);
    let cookie: Cookie<'static> = sign_in!(app);

    let req = test::TestRequest::post().uri("/api/v1/nodes").set_json(json!({
        "name": "Apple Factory",
        "contact_id": contact.value(),
        "debt": "5000.00",
        "level": 3,
    }));
    let (status, body) = call_json!(app, req, cookie);

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["debt"], "0.00");
    assert_eq!(body["level"], 0);
    assert_eq!(body["level_display"], "Factory");
    assert_eq!(body["supplier"], Value::Null);
}

#[rstest]
#[actix_web::test]
async fn detaching_a_retailer_lifts_its_subtree() {
    let state = staff_state();
    let contact = seed_contact(&state, "chain@example.com").await;
    let app = node_app!(state);
    let cookie = sign_in!(app);

    let (_, factory) = call_json!(app, create("F", contact, None), cookie);
    let (_, retailer) = call_json!(app, create("R", contact, Some(id_of(&factory))), cookie);
    let (_, shop) = call_json!(app, create("E", contact, Some(id_of(&retailer))), cookie);
    assert_eq!(retailer["level"], 1);
    assert_eq!(shop["level"], 2);
    assert_eq!(shop["supplier"], "R");

    let detach = test::TestRequest::patch()
        .uri(&format!("/api/v1/nodes/{}", id_of(&retailer)))
        .set_json(json!({ "supplier_id": null }));
    let (status, patched) = call_json!(app, detach, cookie);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["level"], 0);
    assert_eq!(patched["supplier_id"], Value::Null);

    let get = test::TestRequest::get().uri(&format!("/api/v1/nodes/{}", id_of(&shop)));
    let (_, reloaded) = call_json!(app, get, cookie);
    assert_eq!(reloaded["level"], 1);
    assert_eq!(reloaded["level_display"], "Retail network");
}

#[rstest]
#[actix_web::test]
async fn supplier_loops_are_rejected_with_field_details() {
    let state = staff_state();
    let contact = seed_contact(&state, "loop@example.com").await;
    let app = node_app!(state);
    let cookie = sign_in!(app);

    let (_, top) = call_json!(app, create("Top", contact, None), cookie);
    let (_, below) = call_json!(app, create("Below", contact, Some(id_of(&top))), cookie);

    let own = test::TestRequest::patch()
        .uri(&format!("/api/v1/nodes/{}", id_of(&top)))
        .set_json(json!({ "supplier_id": id_of(&top) }));
    let (status, body) = call_json!(app, own, cookie);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "self_supply");

    let cycle = test::TestRequest::put()
        .uri(&format!("/api/v1/nodes/{}", id_of(&top)))
        .set_json(json!({
            "name": "Top",
            "contact_id": contact.value(),
            "supplier_id": id_of(&below),
        }));
    let (status, body) = call_json!(app, cycle, cookie);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "cyclic_supplier_chain");
}

#[rstest]
#[actix_web::test]
async fn level_views_and_debt_info_follow_the_hierarchy() {
    let state = staff_state();
    let contact = seed_contact(&state, "views@example.com").await;
    let app = node_app!(state);
    let cookie = sign_in!(app);

    let (_, factory) = call_json!(app, create("Zeta Works", contact, None), cookie);
    call_json!(app, create("Alpha Works", contact, None), cookie);
    let (_, retailer) = call_json!(app, create("Mid", contact, Some(id_of(&factory))), cookie);

    let (status, factories) = call_json!(
        app,
        test::TestRequest::get().uri("/api/v1/nodes/factories"),
        cookie
    );
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = factories
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|node| node["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Alpha Works", "Zeta Works"]);

    let (_, retails) = call_json!(
        app,
        test::TestRequest::get().uri("/api/v1/nodes/retails"),
        cookie
    );
    assert_eq!(retails.as_array().map(Vec::len), Some(1));

    let info_uri = format!("/api/v1/nodes/{}/debt-info", id_of(&retailer));
    let (_, info) = call_json!(app, test::TestRequest::get().uri(&info_uri), cookie);
    assert_eq!(
        info,
        json!({
            "node_name": "Mid",
            "debt": "0.00",
            "supplier": "Zeta Works",
            "level": 1,
            "level_display": "Retail network",
        })
    );
}

#[rstest]
#[actix_web::test]
async fn listing_pages_with_cursors() {
    let state = staff_state();
    let contact = seed_contact(&state, "pages@example.com").await;
    let app = node_app!(state);
    let cookie = sign_in!(app);
    for name in ["A", "B", "C"] {
        call_json!(app, create(name, contact, None), cookie);
    }

    let (status, first) = call_json!(
        app,
        test::TestRequest::get().uri("/api/v1/nodes?limit=2&level=0"),
        cookie
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["limit"], 2);
    assert_eq!(first["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(first["links"]["prev"], Value::Null);
    let next = first["links"]["next"].as_str().expect("next link").to_owned();
    let next_uri = url::Url::parse(&next).expect("absolute");
    let relative = format!(
        "{}?{}",
        next_uri.path(),
        next_uri.query().expect("query")
    );

    let (_, second) = call_json!(app, test::TestRequest::get().uri(&relative), cookie);
    assert_eq!(second["data"][0]["name"], "C");
    assert_eq!(second["links"]["next"], Value::Null);
}

#[rstest]
#[case("/api/v1/nodes?level=two", "invalid_level")]
#[case("/api/v1/nodes?level=3000000000", "invalid_level")]
#[case("/api/v1/nodes?ordering=price", "invalid_ordering")]
#[case("/api/v1/nodes?created_after=2026-13-01", "invalid_date")]
#[case("/api/v1/nodes?cursor=%2A%2A%2A", "invalid_cursor")]
#[actix_web::test]
async fn invalid_list_parameters_are_rejected(#[case] uri: &str, #[case] code: &str) {
    let state = staff_state();
    let app = node_app!(state);
    let cookie = sign_in!(app);
    let (status, body) = call_json!(app, test::TestRequest::get().uri(uri), cookie);
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn clearing_debt_counts_known_nodes_and_deletion_detaches() {
    let state = staff_state();
    let contact = seed_contact(&state, "debt@example.com").await;
    let app = node_app!(state);
    let cookie = sign_in!(app);
    let (_, factory) = call_json!(app, create("F", contact, None), cookie);
    let (_, retailer) = call_json!(app, create("R", contact, Some(id_of(&factory))), cookie);

    let clear = test::TestRequest::post()
        .uri("/api/v1/nodes/clear-debt")
        .set_json(json!({ "ids": [id_of(&retailer), 9999] }));
    let (status, body) = call_json!(app, clear, cookie);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "cleared": 1 }));

    let remove = test::TestRequest::delete().uri(&format!("/api/v1/nodes/{}", id_of(&factory)));
    let (status, _) = call_json!(app, remove, cookie);
    assert_eq!(status, StatusCode::NO_CONTENT);

    let get = test::TestRequest::get().uri(&format!("/api/v1/nodes/{}", id_of(&retailer)));
    let (_, orphan) = call_json!(app, get, cookie);
    assert_eq!(orphan["level"], 0);
    assert_eq!(orphan["supplier"], Value::Null);

    let again = test::TestRequest::delete().uri(&format!("/api/v1/nodes/{}", id_of(&factory)));
    let (status, body) = call_json!(app, again, cookie);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn unknown_references_are_not_found() {
    let state = staff_state();
    let app = node_app!(state);
    let cookie = sign_in!(app);
    let (status, body) = call_json!(app, create("Ghost", ContactId::new(404), None), cookie);
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["field"], "contact_id");
}

//! End-to-end HTTP tests over the in-memory adapters.

use std::sync::Arc;

use actions::Deps;
use axum::http::StatusCode;
use axum_test::TestServer;
use docstore::MemoryStore;
use identity::StaticIdentity;
use portal::{Claims, Email, NoopPageCache, Role, UserId};
use serde_json::{json, Value};

const ADMIN_TOKEN: &str = "admin-token";
const USER_TOKEN: &str = "user-token";

fn claims(uid: &str, email: &str, role: Option<Role>) -> Claims {
    Claims {
        uid: UserId::new(uid).unwrap(),
        email: Email::new(email).unwrap(),
        role,
    }
}

async fn portal_server() -> (TestServer, MemoryStore, StaticIdentity) {
    let store = MemoryStore::new();
    let identity = StaticIdentity::new()
        .with_token(
            ADMIN_TOKEN,
            claims("admin-uid", "admin@example.com", Some(Role::Admin)),
        )
        .await
        .with_token(USER_TOKEN, claims("user-uid", "user@example.com", None))
        .await;

    let deps = Arc::new(Deps {
        apps: Arc::new(store.clone()),
        categories: Arc::new(store.clone()),
        settings: Arc::new(store.clone()),
        profiles: Arc::new(store.clone()),
        verifier: Arc::new(identity.clone()),
        directory: Arc::new(identity.clone()),
        pages: Arc::new(NoopPageCache),
        admin_email: Email::new("admin@example.com"),
    });

    let server = TestServer::new(server::router(deps)).unwrap();
    (server, store, identity)
}

fn app_payload(category_id: &str) -> Value {
    json!({
        "name": "Jira",
        "url": "https://jira.example.com",
        "description": "Issue tracking",
        "category_id": category_id,
        "tags": "tracking, agile",
    })
}

#[tokio::test]
async fn healthz_is_open() {
    let (server, _, _) = portal_server().await;
    let response = server.get("/healthz").await;
    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn dashboard_requires_a_token() {
    let (server, _, _) = portal_server().await;
    let response = server.get("/api/dashboard").await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn mutations_require_the_admin_role() {
    let (server, _, _) = portal_server().await;
    let response = server
        .post("/api/apps")
        .authorization_bearer(USER_TOKEN)
        .json(&app_payload("productivity"))
        .await;
    response.assert_status_forbidden();
}

#[tokio::test]
async fn invalid_app_payload_reports_field_errors() {
    let (server, _, _) = portal_server().await;
    let response = server
        .post("/api/apps")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "name": "", "url": "not a url", "category_id": "" }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "url", "category_id"]);
}

#[tokio::test]
async fn created_apps_show_up_on_the_dashboard() {
    let (server, _, _) = portal_server().await;

    let created = server
        .post("/api/categories")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "name": "Productivity", "sort_order": 1 }))
        .await;
    created.assert_status_ok();
    let category_id = created.json::<Value>()["data"].as_str().unwrap().to_string();

    let created = server
        .post("/api/apps")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&app_payload(&category_id))
        .await;
    created.assert_status_ok();

    let dashboard = server
        .get("/api/dashboard")
        .authorization_bearer(USER_TOKEN)
        .await;
    dashboard.assert_status_ok();
    let body: Value = dashboard.json();
    assert_eq!(body["data"]["apps"][0]["name"], "Jira");
    assert_eq!(body["data"]["categories"][0]["name"], "Productivity");
    assert_eq!(body["data"]["is_admin"], false);
}

#[tokio::test]
async fn mutation_responses_list_the_invalidated_pages() {
    let (server, _, _) = portal_server().await;
    let response = server
        .post("/api/categories")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "name": "Finance", "sort_order": "2" }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["invalidated"], json!(["/admin/categories", "/"]));
}

#[tokio::test]
async fn favorite_toggle_round_trip() {
    let (server, _, _) = portal_server().await;

    let seeded = server
        .post("/api/seed")
        .authorization_bearer(ADMIN_TOKEN)
        .await;
    seeded.assert_status_ok();

    let dashboard = server
        .get("/api/dashboard")
        .authorization_bearer(USER_TOKEN)
        .await;
    let app_id = dashboard.json::<Value>()["data"]["apps"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let toggled = server
        .post(&format!("/api/favorites/{app_id}/toggle"))
        .authorization_bearer(USER_TOKEN)
        .await;
    toggled.assert_status_ok();
    assert_eq!(toggled.json::<Value>()["data"]["is_favorite"], true);

    let toggled = server
        .post(&format!("/api/favorites/{app_id}/toggle"))
        .authorization_bearer(USER_TOKEN)
        .await;
    assert_eq!(toggled.json::<Value>()["data"]["is_favorite"], false);
}

#[tokio::test]
async fn recents_cap_at_ten_most_recent() {
    let (server, _, _) = portal_server().await;

    // One more than the dashboard keeps; the oldest falls off.
    for i in 1..=11 {
        server
            .post(&format!("/api/recents/app-{i:02}"))
            .authorization_bearer(USER_TOKEN)
            .await
            .assert_status_ok();
    }

    let dashboard = server
        .get("/api/dashboard")
        .authorization_bearer(USER_TOKEN)
        .await;
    let recent = dashboard.json::<Value>()["data"]["recent_ids"].clone();
    let ids: Vec<&str> = recent
        .as_array()
        .unwrap()
        .iter()
        .map(|id| id.as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 10);
    assert_eq!(ids[0], "app-11");
    assert!(!ids.contains(&"app-01"));
}

#[tokio::test]
async fn settings_read_is_open_and_write_is_gated() {
    let (server, _, _) = portal_server().await;

    let empty = server.get("/api/settings").await;
    empty.assert_status_ok();
    assert_eq!(empty.json::<Value>()["data"], Value::Null);

    server
        .put("/api/settings")
        .authorization_bearer(USER_TOKEN)
        .json(&json!({ "portal_name": "Intranet" }))
        .await
        .assert_status_forbidden();

    server
        .put("/api/settings")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "portal_name": "Intranet" }))
        .await
        .assert_status_ok();

    let loaded = server.get("/api/settings").await;
    assert_eq!(loaded.json::<Value>()["data"]["portal_name"], "Intranet");
}

#[tokio::test]
async fn bootstrap_promotes_only_the_designated_email() {
    let (server, store, _) = portal_server().await;

    let denied = server
        .post("/api/auth/bootstrap")
        .authorization_bearer(USER_TOKEN)
        .await;
    denied.assert_status_ok();
    assert_eq!(denied.json::<Value>()["data"], "not_designated");

    let promoted = server
        .post("/api/auth/bootstrap")
        .authorization_bearer(ADMIN_TOKEN)
        .await;
    promoted.assert_status_ok();
    assert_eq!(promoted.json::<Value>()["data"], "promoted");

    let profile = store
        .profile(&UserId::new("admin-uid").unwrap())
        .await
        .unwrap();
    assert_eq!(profile.role, Role::Admin);
}

#[tokio::test]
async fn bootstrap_takes_effect_on_the_next_request() {
    let (server, _, identity) = portal_server().await;

    // Freshly minted token without the admin claim.
    let _identity = identity
        .with_token(
            "pending-admin",
            claims("admin2-uid", "admin@example.com", None),
        )
        .await;

    server
        .post("/api/categories")
        .authorization_bearer("pending-admin")
        .json(&json!({ "name": "HR" }))
        .await
        .assert_status_forbidden();

    server
        .post("/api/auth/bootstrap")
        .authorization_bearer("pending-admin")
        .await
        .assert_status_ok();

    // The directory updated the role claim, so the same token now clears
    // the admin guard.
    server
        .post("/api/categories")
        .authorization_bearer("pending-admin")
        .json(&json!({ "name": "HR" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn user_list_and_role_updates_are_admin_only() {
    let (server, store, _) = portal_server().await;

    server
        .get("/api/users")
        .authorization_bearer(USER_TOKEN)
        .await
        .assert_status_forbidden();

    let listed = server
        .get("/api/users")
        .authorization_bearer(ADMIN_TOKEN)
        .await;
    listed.assert_status_ok();
    assert_eq!(listed.json::<Value>()["data"].as_array().unwrap().len(), 2);

    server
        .put("/api/users/user-uid/role")
        .authorization_bearer(ADMIN_TOKEN)
        .json(&json!({ "role": "ADMIN" }))
        .await
        .assert_status_ok();

    let profile = store
        .profile(&UserId::new("user-uid").unwrap())
        .await
        .unwrap();
    assert_eq!(profile.role, Role::Admin);
}

#[tokio::test]
async fn deleting_a_missing_app_is_a_backend_failure() {
    let (server, _, _) = portal_server().await;
    let response = server
        .delete("/api/apps/no-such-app")
        .authorization_bearer(ADMIN_TOKEN)
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .contains("no-such-app"));
}

// Copyright 2025 The Questline Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! API Integration Tests
//!
//! These tests exercise the complete stack: auth middleware, handlers,
//! the projection layer and the store, through in-process requests.

#![allow(clippy::unwrap_used)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use questline_server::api::resources::Resources;
use questline_server::config::AuthSettings;
use questline_server::domain::{Account, Instance, Mission, MissionRelationship, Progression};
use questline_server::{build_app_router, Store};

const USER: &str = "admin";
const PASS: &str = "secret";

fn auth_header() -> String {
    format!("Basic {}", BASE64.encode(format!("{USER}:{PASS}")))
}

fn seeded_store() -> Arc<Store> {
    let store = Store::new();
    store
        .save_instance(Instance {
            id: 0,
            slug: "jquest".to_string(),
            name: "JQuest".to_string(),
            host: "jquest.example.org".to_string(),
        })
        .unwrap();
    store
        .save_mission(Mission {
            id: 0,
            name: "First steps".to_string(),
            description: "Learn the ropes".to_string(),
            image: Some("/media/missions/first.png".to_string()),
            instance_id: 1,
        })
        .unwrap();
    store
        .save_mission(Mission {
            id: 0,
            name: "Deep dive".to_string(),
            description: String::new(),
            image: None,
            instance_id: 1,
        })
        .unwrap();
    store
        .save_mission_relationship(MissionRelationship {
            id: 0,
            parent_id: 1,
            mission_id: 2,
        })
        .unwrap();
    store
        .save_account(Account {
            id: 0,
            username: "ariane".to_string(),
            first_name: "Ariane".to_string(),
            last_name: String::new(),
            email: "ariane@example.org".to_string(),
            password: "hunter2".to_string(),
            is_active: true,
            date_joined: Utc::now(),
        })
        .unwrap();
    store
        .save_progression(Progression {
            id: 0,
            account_id: 1,
            mission_id: 1,
            state: "succeeded".to_string(),
            points: Some(100),
        })
        .unwrap();
    Arc::new(store)
}

fn app(store: Arc<Store>) -> Router {
    let auth = Arc::new(AuthSettings {
        username: USER.to_string(),
        password: PASS.to_string(),
    });
    build_app_router(store, Arc::new(Resources::new()), auth)
}

fn get(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .header(header::AUTHORIZATION, auth_header())
        .header(header::HOST, "api.example.org")
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .header(header::AUTHORIZATION, auth_header())
        .header(header::HOST, "api.example.org")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_open() {
    let response = app(seeded_store())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], json!("healthy"));
}

#[tokio::test]
async fn resources_require_credentials() {
    let response = app(seeded_store())
        .oneshot(
            Request::builder()
                .uri("/api/v1/account")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key("www-authenticate"));

    let bad = Request::builder()
        .uri("/api/v1/account")
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", BASE64.encode("admin:wrong")),
        )
        .body(Body::empty())
        .unwrap();
    let response = app(seeded_store()).oneshot(bad).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_accounts_projects_base_fields() {
    let response = app(seeded_store())
        .oneshot(get("/api/v1/account"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));

    let accounts = body["data"].as_array().unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0]["resource_uri"], json!("/api/v1/account/1"));
    assert_eq!(accounts[0]["username"], json!("ariane"));
    assert!(accounts[0].get("password").is_none());
    assert!(accounts[0].get("progressions").is_none());
}

#[tokio::test]
async fn account_detail_embeds_progressions() {
    let response = app(seeded_store())
        .oneshot(get("/api/v1/account/1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let progressions = body["data"]["progressions"].as_array().unwrap();
    assert_eq!(progressions.len(), 1);
    assert_eq!(progressions[0]["state"], json!("Succeeded"));
    assert_eq!(progressions[0]["mission"], json!("/api/v1/mission/1"));
}

#[tokio::test]
async fn mission_image_is_absolutized_against_request_host() {
    let response = app(seeded_store())
        .oneshot(get("/api/v1/mission/1"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(
        body["data"]["image"],
        json!("http://api.example.org/media/missions/first.png")
    );
    assert_eq!(body["data"]["instance"], json!("/api/v1/instance/1"));
}

#[tokio::test]
async fn mission_filters_span_the_instance_relationship() {
    let app = app(seeded_store());

    let response = app
        .clone()
        .oneshot(get("/api/v1/mission?instance__slug=jquest"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = app
        .clone()
        .oneshot(get("/api/v1/mission?instance__slug=other"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // unknown filter key is a client error
    let response = app.oneshot(get("/api/v1/mission?bogus=1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_account_fans_out_nested_oauths() {
    let store = seeded_store();
    let request = send_json(
        "POST",
        "/api/v1/account",
        json!({
            "username": "badia",
            "email": "badia@example.org",
            "oauths": [
                {"consumer": "github", "consumer_user_id": "77"},
                {"consumer": "twitter", "consumer_user_id": "badia"}
            ]
        }),
    );
    let response = app(Arc::clone(&store)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["data"]["username"], json!("badia"));
    assert_eq!(body["data"]["resource_uri"], json!("/api/v1/account/2"));

    let links = store.oauth_links().filter(|l| l.account_id == 2);
    assert_eq!(links.len(), 2);
}

#[tokio::test]
async fn malformed_oauths_rejects_before_persisting() {
    let store = seeded_store();
    let request = send_json(
        "POST",
        "/api/v1/account",
        json!({"username": "badia", "oauths": "github"}),
    );
    let response = app(Arc::clone(&store)).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // nothing was saved
    assert_eq!(store.accounts().len(), 1);
    assert!(store.oauth_links().is_empty());
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let request = send_json("POST", "/api/v1/account", json!({"username": "ariane"}));
    let response = app(seeded_store()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("DUPLICATE_RESOURCE"));
}

#[tokio::test]
async fn relationship_writes_answer_with_status_only() {
    let request = send_json(
        "POST",
        "/api/v1/mission_relationship",
        json!({"parent": 2, "mission": 1}),
    );
    let response = app(seeded_store()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    // no full echo for this resource
    assert!(body["data"]["message"].is_string());
    assert!(body["data"].get("resource_uri").is_none());
}

#[tokio::test]
async fn update_rejects_blanking_required_field() {
    let app = app(seeded_store());

    let request = send_json("PUT", "/api/v1/mission/1", json!({"name": null}));
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // blank-allowed field may be emptied
    let request = send_json("PUT", "/api/v1/mission/1", json!({"description": ""}));
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_rejects_unknown_and_readonly_fields() {
    let app = app(seeded_store());

    let request = send_json("PUT", "/api/v1/account/1", json!({"bogus": 1}));
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = send_json(
        "PUT",
        "/api/v1/account/1",
        json!({"resource_uri": "/api/v1/account/9"}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_account_cascades_to_owned_records() {
    let store = seeded_store();
    let response = app(Arc::clone(&store))
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/v1/account/1")
                .header(header::AUTHORIZATION, auth_header())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(store.accounts().is_empty());
    assert!(store.progressions().is_empty());
}

#[tokio::test]
async fn missing_resource_is_not_found() {
    let response = app(seeded_store())
        .oneshot(get("/api/v1/mission/99"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("MISSION_NOT_FOUND"));
}

#[tokio::test]
async fn versions_endpoint_lists_v1() {
    let response = app(seeded_store())
        .oneshot(
            Request::builder()
                .uri("/api/versions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["current"], json!("v1"));
    assert_eq!(body["versions"], json!(["v1"]));
}

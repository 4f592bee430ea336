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

//! Projection layer tests through the public crate surface.

#![allow(clippy::unwrap_used)]

use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use questline_server::api::resources::Resources;
use questline_server::domain::{Account, Instance, Mission, Progression};
use questline_server::projection::RequestContext;
use questline_server::Store;

fn store_with_account() -> Store {
    let store = Store::new();
    store
        .save_instance(Instance {
            id: 0,
            slug: "jquest".to_string(),
            name: "JQuest".to_string(),
            host: String::new(),
        })
        .unwrap();
    store
        .save_mission(Mission {
            id: 0,
            name: "First steps".to_string(),
            description: String::new(),
            image: None,
            instance_id: 1,
        })
        .unwrap();
    store
        .save_account(Account {
            id: 0,
            username: "ariane".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            is_active: true,
            date_joined: Utc::now(),
        })
        .unwrap();
    store
}

#[test]
fn detail_is_an_exact_path_match() {
    let store = store_with_account();
    let resources = Resources::new();
    let account = store.accounts().get(1).unwrap();

    // exact canonical URI -> detail
    let ctx = RequestContext::new("/api/v1/account/1", "localhost");
    assert!(resources.account().is_detail(&account, &ctx));

    // trailing slash, different id, or list path -> not detail
    for path in ["/api/v1/account/1/", "/api/v1/account/10", "/api/v1/account"] {
        let ctx = RequestContext::new(path, "localhost");
        assert!(!resources.account().is_detail(&account, &ctx));
    }
}

#[test]
fn override_sees_the_in_progress_mapping() {
    // The progression state override reads the raw state out of the
    // partially built output map, not the entity.
    let store = store_with_account();
    store
        .save_progression(Progression {
            id: 0,
            account_id: 1,
            mission_id: 1,
            state: "offered".to_string(),
            points: None,
        })
        .unwrap();

    let resources = Resources::new();
    let ctx = RequestContext::new("/api/v1/progression", "localhost");
    let progression = store.progressions().get(1).unwrap();
    let data = resources
        .progression()
        .project(&progression, &ctx, &store)
        .unwrap();
    assert_eq!(data["state"], json!("Offered"));
}

#[test]
fn related_fields_bind_to_the_owning_namespace() {
    let store = store_with_account();
    store
        .save_progression(Progression {
            id: 0,
            account_id: 1,
            mission_id: 1,
            state: "started".to_string(),
            points: None,
        })
        .unwrap();

    let resources = Resources::new();
    let ctx = RequestContext::new("/api/v1/progression/1", "localhost");
    let progression = store.progressions().get(1).unwrap();
    let data = resources
        .progression()
        .project(&progression, &ctx, &store)
        .unwrap();

    assert_eq!(data["resource_uri"], json!("/api/v1/progression/1"));
    assert_eq!(data["account"], json!("/api/v1/account/1"));
    assert_eq!(data["mission"], json!("/api/v1/mission/1"));
    // raw foreign keys never appear
    assert!(data.get("account_id").is_none());
    assert!(data.get("mission_id").is_none());
}

#[test]
fn dangling_relation_is_a_projection_error() {
    let store = store_with_account();
    let resources = Resources::new();
    let ctx = RequestContext::new("/api/v1/oauth_link", "localhost");
    let orphan = questline_server::domain::OAuthLink {
        id: 7,
        consumer: "github".to_string(),
        consumer_user_id: "1".to_string(),
        account_id: 999,
    };
    let err = resources
        .oauth_link()
        .project(&orphan, &ctx, &store)
        .unwrap_err();
    assert!(err.to_string().contains("account"));
}

#[test]
fn field_order_is_stable() {
    let store = store_with_account();
    let resources = Resources::new();
    let ctx = RequestContext::new("/api/v1/instance", "localhost");
    let instance = store.instances().get(1).unwrap();
    let data = resources.instance().project(&instance, &ctx, &store).unwrap();

    let keys: Vec<&str> = data.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["resource_uri", "id", "slug", "name", "host"]);
    assert_eq!(data["resource_uri"], Value::String("/api/v1/instance/1".into()));
}

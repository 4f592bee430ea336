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

//! API v1 route definitions.
//!
//! All routes nest under `/api/v1/`. Path segments use the singular
//! resource names so a request path can be compared against an object's
//! canonical URI for detail classification.

use axum::{
    extract::Extension,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use super::handlers;
use crate::api::resources::Resources;
use crate::store::Store;

/// Build the complete v1 API router.
pub fn build_v1_router(store: Arc<Store>, resources: Arc<Resources>) -> Router {
    Router::new()
        .route("/account", get(handlers::list_accounts))
        .route("/account", post(handlers::create_account))
        .route("/account/:id", get(handlers::get_account))
        .route("/account/:id", put(handlers::update_account))
        .route("/account/:id", delete(handlers::delete_account))
        .route("/oauth_link", get(handlers::list_oauth_links))
        .route("/oauth_link", post(handlers::create_oauth_link))
        .route("/oauth_link/:id", get(handlers::get_oauth_link))
        .route("/oauth_link/:id", delete(handlers::delete_oauth_link))
        .route("/auth_token", get(handlers::list_auth_tokens))
        .route("/auth_token", post(handlers::create_auth_token))
        .route("/auth_token/:id", get(handlers::get_auth_token))
        .route("/auth_token/:id", delete(handlers::delete_auth_token))
        .route("/instance", get(handlers::list_instances))
        .route("/instance", post(handlers::create_instance))
        .route("/instance/:id", get(handlers::get_instance))
        .route("/instance/:id", put(handlers::update_instance))
        .route("/instance/:id", delete(handlers::delete_instance))
        .route("/mission", get(handlers::list_missions))
        .route("/mission", post(handlers::create_mission))
        .route("/mission/:id", get(handlers::get_mission))
        .route("/mission/:id", put(handlers::update_mission))
        .route("/mission/:id", delete(handlers::delete_mission))
        .route(
            "/mission_relationship",
            get(handlers::list_mission_relationships),
        )
        .route(
            "/mission_relationship",
            post(handlers::create_mission_relationship),
        )
        .route(
            "/mission_relationship/:id",
            get(handlers::get_mission_relationship),
        )
        .route(
            "/mission_relationship/:id",
            delete(handlers::delete_mission_relationship),
        )
        .route("/progression", get(handlers::list_progressions))
        .route("/progression", post(handlers::create_progression))
        .route("/progression/:id", get(handlers::get_progression))
        .route("/progression/:id", put(handlers::update_progression))
        .route("/progression/:id", delete(handlers::delete_progression))
        .layer(Extension(store))
        .layer(Extension(resources))
}

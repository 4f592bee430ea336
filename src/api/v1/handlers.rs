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

//! API v1 handler functions with OpenAPI documentation.
//!
//! Every read handler builds a [`RequestContext`] from the request path
//! and host, then delegates to the projection spec of the resource. Write
//! handlers validate, persist, and echo the projected object back when
//! the resource opts into full write echoes.

use axum::{
    extract::{Extension, OriginalUri, Path, Query},
    http::{header::HOST, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use log::{debug, info};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::mappings::{
    apply_account_update, apply_instance_update, apply_mission_update, apply_progression_update,
    parse_oauth_payloads,
};
use crate::api::models::{
    AccountCreateRequest, AuthTokenCreateRequest, InstanceCreateRequest, MissionCreateRequest,
    MissionRelationshipCreateRequest, OAuthLinkCreateRequest, ProgressionCreateRequest,
};
use crate::api::resources::Resources;
use crate::api::shared::{
    error_codes, ApiResponse, ApiVersionsResponse, ErrorResponse, HealthResponse, StatusResponse,
};
use crate::api::version::{ApiVersion, API_CURRENT_VERSION};
use crate::domain::{Entity, Id, OAuthLink};
use crate::projection::{FieldMap, RequestContext, ResourceSpec};
use crate::store::{Store, Table};

type ErrReply = (StatusCode, Json<ErrorResponse>);

fn invalid_request(message: impl Into<String>) -> ErrReply {
    ErrorResponse::new(error_codes::INVALID_REQUEST, message).with_status()
}

fn host_of(headers: &HeaderMap) -> String {
    headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("localhost")
        .to_string()
}

/// Project every row passing the declared filters, in insertion order.
fn list_resource<T: Entity>(
    spec: &ResourceSpec<T>,
    table: &Table<T>,
    store: &Store,
    ctx: &RequestContext,
    params: &HashMap<String, String>,
) -> Result<Vec<FieldMap>, ErrReply> {
    let mut objects = Vec::new();
    for row in table.all() {
        match spec.matches_filters(&row, params, store) {
            Ok(true) => {
                let data = spec
                    .project(&row, ctx, store)
                    .map_err(|e| ErrorResponse::from(e).with_status())?;
                objects.push(data);
            }
            Ok(false) => {}
            Err(message) => return Err(invalid_request(message)),
        }
    }
    Ok(objects)
}

fn get_resource<T: Entity>(
    spec: &ResourceSpec<T>,
    table: &Table<T>,
    store: &Store,
    ctx: &RequestContext,
    id: Id,
) -> Result<FieldMap, ErrReply> {
    let row = table
        .get(id)
        .map_err(|e| ErrorResponse::from(e).with_status())?;
    spec.project(&row, ctx, store)
        .map_err(|e| ErrorResponse::from(e).with_status())
}

/// Answer a successful write: the full projected object when the
/// resource opts in, a plain status message otherwise.
fn write_reply<T: Entity>(
    spec: &ResourceSpec<T>,
    obj: &T,
    ctx: &RequestContext,
    store: &Store,
    status: StatusCode,
) -> Response {
    if spec.always_return_data() {
        match spec.project(obj, ctx, store) {
            Ok(data) => (status, Json(ApiResponse::success(data))).into_response(),
            Err(e) => ErrorResponse::from(e).with_status().into_response(),
        }
    } else {
        let message = format!("{} {} saved", T::NAME, obj.id());
        (status, Json(ApiResponse::success(StatusResponse { message }))).into_response()
    }
}

fn payload_object(payload: Value) -> Result<FieldMap, ErrReply> {
    match payload {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_request("Request body must be a JSON object")),
    }
}

/// List available API versions
#[utoipa::path(
    get,
    path = "/api/versions",
    responses(
        (status = 200, description = "List of available API versions", body = ApiVersionsResponse),
    ),
    tag = "API"
)]
pub async fn list_api_versions() -> Json<ApiVersionsResponse> {
    Json(ApiVersionsResponse {
        versions: ApiVersion::all_strings(),
        current: API_CURRENT_VERSION.to_string(),
    })
}

/// Check server health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse),
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now(),
    })
}

// =============================================================================
// Accounts
// =============================================================================

/// List accounts
#[utoipa::path(
    get,
    path = "/api/v1/account",
    responses(
        (status = 200, description = "List of accounts", body = ApiResponse),
        (status = 400, description = "Unsupported filter", body = ErrorResponse),
    ),
    tag = "Accounts"
)]
pub async fn list_accounts(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match list_resource(resources.account(), store.accounts(), &store, &ctx, &params) {
        Ok(objects) => Json(ApiResponse::success(objects)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get one account with its progressions
#[utoipa::path(
    get,
    path = "/api/v1/account/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account detail", body = ApiResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    ),
    tag = "Accounts"
)]
pub async fn get_account(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match get_resource(resources.account(), store.accounts(), &store, &ctx, id) {
        Ok(data) => Json(ApiResponse::success(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create an account, optionally fanning out nested OAuth links
#[utoipa::path(
    post,
    path = "/api/v1/account",
    request_body = AccountCreateRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse),
        (status = 400, description = "Malformed oauths payload", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse),
    ),
    tag = "Accounts"
)]
pub async fn create_account(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(request): Json<AccountCreateRequest>,
) -> Response {
    // Validate the nested oauths shape before anything is persisted
    let oauth_payloads = match &request.oauths {
        Some(value) => match parse_oauth_payloads(value) {
            Ok(payloads) => payloads,
            Err(message) => return invalid_request(message).into_response(),
        },
        None => Vec::new(),
    };

    let duplicate = !store
        .accounts()
        .filter(|a| a.username == request.username)
        .is_empty();
    if duplicate {
        return ErrorResponse::new(
            error_codes::DUPLICATE_RESOURCE,
            format!("Username '{}' is already taken", request.username),
        )
        .with_status()
        .into_response();
    }

    let account = match store.save_account(request.into()) {
        Ok(account) => account,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };

    for payload in oauth_payloads {
        let link = OAuthLink {
            id: 0,
            consumer: payload.consumer,
            consumer_user_id: payload.consumer_user_id,
            account_id: account.id,
        };
        if let Err(e) = store.save_oauth_link(link) {
            return ErrorResponse::from(e).with_status().into_response();
        }
    }

    info!("Created account '{}' with id {}", account.username, account.id);
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(
        resources.account(),
        &account,
        &ctx,
        &store,
        StatusCode::CREATED,
    )
}

/// Update an account
#[utoipa::path(
    put,
    path = "/api/v1/account/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Account updated", body = ApiResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    ),
    tag = "Accounts"
)]
pub async fn update_account(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
    Json(payload): Json<Value>,
) -> Response {
    let payload = match payload_object(payload) {
        Ok(map) => map,
        Err(e) => return e.into_response(),
    };
    if let Err(message) = resources.account().validate_payload(&payload) {
        return invalid_request(message).into_response();
    }
    let mut account = match store.accounts().get(id) {
        Ok(account) => account,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };
    if let Err(message) = apply_account_update(&mut account, &payload) {
        return invalid_request(message).into_response();
    }
    let account = match store.save_account(account) {
        Ok(account) => account,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };

    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(resources.account(), &account, &ctx, &store, StatusCode::OK)
}

/// Delete an account and its owned records
#[utoipa::path(
    delete,
    path = "/api/v1/account/{id}",
    params(("id" = i64, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account deleted", body = ApiResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
    ),
    tag = "Accounts"
)]
pub async fn delete_account(
    Extension(store): Extension<Arc<Store>>,
    Path(id): Path<Id>,
) -> Response {
    match store.delete_account(id) {
        Ok(_) => {
            debug!("Deleted account {id}");
            Json(ApiResponse::success(StatusResponse {
                message: format!("account {id} deleted"),
            }))
            .into_response()
        }
        Err(e) => ErrorResponse::from(e).with_status().into_response(),
    }
}

// =============================================================================
// OAuth links
// =============================================================================

/// List OAuth links
#[utoipa::path(
    get,
    path = "/api/v1/oauth_link",
    responses(
        (status = 200, description = "List of OAuth links", body = ApiResponse),
        (status = 400, description = "Unsupported filter", body = ErrorResponse),
    ),
    tag = "OAuth links"
)]
pub async fn list_oauth_links(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match list_resource(
        resources.oauth_link(),
        store.oauth_links(),
        &store,
        &ctx,
        &params,
    ) {
        Ok(objects) => Json(ApiResponse::success(objects)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get one OAuth link
#[utoipa::path(
    get,
    path = "/api/v1/oauth_link/{id}",
    params(("id" = i64, Path, description = "OAuth link ID")),
    responses(
        (status = 200, description = "OAuth link detail", body = ApiResponse),
        (status = 404, description = "OAuth link not found", body = ErrorResponse),
    ),
    tag = "OAuth links"
)]
pub async fn get_oauth_link(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match get_resource(resources.oauth_link(), store.oauth_links(), &store, &ctx, id) {
        Ok(data) => Json(ApiResponse::success(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create an OAuth link
#[utoipa::path(
    post,
    path = "/api/v1/oauth_link",
    request_body = OAuthLinkCreateRequest,
    responses(
        (status = 201, description = "OAuth link created", body = ApiResponse),
        (status = 404, description = "Owning account not found", body = ErrorResponse),
    ),
    tag = "OAuth links"
)]
pub async fn create_oauth_link(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(request): Json<OAuthLinkCreateRequest>,
) -> Response {
    let link = match store.save_oauth_link(request.into()) {
        Ok(link) => link,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(
        resources.oauth_link(),
        &link,
        &ctx,
        &store,
        StatusCode::CREATED,
    )
}

/// Delete an OAuth link
#[utoipa::path(
    delete,
    path = "/api/v1/oauth_link/{id}",
    params(("id" = i64, Path, description = "OAuth link ID")),
    responses(
        (status = 200, description = "OAuth link deleted", body = ApiResponse),
        (status = 404, description = "OAuth link not found", body = ErrorResponse),
    ),
    tag = "OAuth links"
)]
pub async fn delete_oauth_link(
    Extension(store): Extension<Arc<Store>>,
    Path(id): Path<Id>,
) -> Response {
    match store.delete_oauth_link(id) {
        Ok(_) => Json(ApiResponse::success(StatusResponse {
            message: format!("oauth_link {id} deleted"),
        }))
        .into_response(),
        Err(e) => ErrorResponse::from(e).with_status().into_response(),
    }
}

// =============================================================================
// Auth tokens
// =============================================================================

/// List auth tokens
#[utoipa::path(
    get,
    path = "/api/v1/auth_token",
    responses(
        (status = 200, description = "List of auth tokens", body = ApiResponse),
        (status = 400, description = "Unsupported filter", body = ErrorResponse),
    ),
    tag = "Auth tokens"
)]
pub async fn list_auth_tokens(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match list_resource(
        resources.auth_token(),
        store.auth_tokens(),
        &store,
        &ctx,
        &params,
    ) {
        Ok(objects) => Json(ApiResponse::success(objects)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get one auth token
#[utoipa::path(
    get,
    path = "/api/v1/auth_token/{id}",
    params(("id" = i64, Path, description = "Auth token ID")),
    responses(
        (status = 200, description = "Auth token detail", body = ApiResponse),
        (status = 404, description = "Auth token not found", body = ErrorResponse),
    ),
    tag = "Auth tokens"
)]
pub async fn get_auth_token(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match get_resource(resources.auth_token(), store.auth_tokens(), &store, &ctx, id) {
        Ok(data) => Json(ApiResponse::success(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create an auth token, generating the value when absent
#[utoipa::path(
    post,
    path = "/api/v1/auth_token",
    request_body = AuthTokenCreateRequest,
    responses(
        (status = 201, description = "Auth token created", body = ApiResponse),
        (status = 404, description = "Owning account not found", body = ErrorResponse),
    ),
    tag = "Auth tokens"
)]
pub async fn create_auth_token(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(request): Json<AuthTokenCreateRequest>,
) -> Response {
    let token = match store.save_auth_token(request.into()) {
        Ok(token) => token,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(
        resources.auth_token(),
        &token,
        &ctx,
        &store,
        StatusCode::CREATED,
    )
}

/// Delete an auth token
#[utoipa::path(
    delete,
    path = "/api/v1/auth_token/{id}",
    params(("id" = i64, Path, description = "Auth token ID")),
    responses(
        (status = 200, description = "Auth token deleted", body = ApiResponse),
        (status = 404, description = "Auth token not found", body = ErrorResponse),
    ),
    tag = "Auth tokens"
)]
pub async fn delete_auth_token(
    Extension(store): Extension<Arc<Store>>,
    Path(id): Path<Id>,
) -> Response {
    match store.delete_auth_token(id) {
        Ok(_) => Json(ApiResponse::success(StatusResponse {
            message: format!("auth_token {id} deleted"),
        }))
        .into_response(),
        Err(e) => ErrorResponse::from(e).with_status().into_response(),
    }
}

// =============================================================================
// Instances
// =============================================================================

/// List game instances
#[utoipa::path(
    get,
    path = "/api/v1/instance",
    responses(
        (status = 200, description = "List of instances", body = ApiResponse),
        (status = 400, description = "Unsupported filter", body = ErrorResponse),
    ),
    tag = "Instances"
)]
pub async fn list_instances(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match list_resource(resources.instance(), store.instances(), &store, &ctx, &params) {
        Ok(objects) => Json(ApiResponse::success(objects)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get one instance with its missions
#[utoipa::path(
    get,
    path = "/api/v1/instance/{id}",
    params(("id" = i64, Path, description = "Instance ID")),
    responses(
        (status = 200, description = "Instance detail", body = ApiResponse),
        (status = 404, description = "Instance not found", body = ErrorResponse),
    ),
    tag = "Instances"
)]
pub async fn get_instance(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match get_resource(resources.instance(), store.instances(), &store, &ctx, id) {
        Ok(data) => Json(ApiResponse::success(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create an instance
#[utoipa::path(
    post,
    path = "/api/v1/instance",
    request_body = InstanceCreateRequest,
    responses(
        (status = 201, description = "Instance created", body = ApiResponse),
    ),
    tag = "Instances"
)]
pub async fn create_instance(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(request): Json<InstanceCreateRequest>,
) -> Response {
    let instance = match store.save_instance(request.into()) {
        Ok(instance) => instance,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(
        resources.instance(),
        &instance,
        &ctx,
        &store,
        StatusCode::CREATED,
    )
}

/// Update an instance
#[utoipa::path(
    put,
    path = "/api/v1/instance/{id}",
    params(("id" = i64, Path, description = "Instance ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Instance updated", body = ApiResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Instance not found", body = ErrorResponse),
    ),
    tag = "Instances"
)]
pub async fn update_instance(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
    Json(payload): Json<Value>,
) -> Response {
    let payload = match payload_object(payload) {
        Ok(map) => map,
        Err(e) => return e.into_response(),
    };
    if let Err(message) = resources.instance().validate_payload(&payload) {
        return invalid_request(message).into_response();
    }
    let mut instance = match store.instances().get(id) {
        Ok(instance) => instance,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };
    if let Err(message) = apply_instance_update(&mut instance, &payload) {
        return invalid_request(message).into_response();
    }
    let instance = match store.save_instance(instance) {
        Ok(instance) => instance,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };

    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(resources.instance(), &instance, &ctx, &store, StatusCode::OK)
}

/// Delete an instance and its missions
#[utoipa::path(
    delete,
    path = "/api/v1/instance/{id}",
    params(("id" = i64, Path, description = "Instance ID")),
    responses(
        (status = 200, description = "Instance deleted", body = ApiResponse),
        (status = 404, description = "Instance not found", body = ErrorResponse),
    ),
    tag = "Instances"
)]
pub async fn delete_instance(
    Extension(store): Extension<Arc<Store>>,
    Path(id): Path<Id>,
) -> Response {
    match store.delete_instance(id) {
        Ok(_) => Json(ApiResponse::success(StatusResponse {
            message: format!("instance {id} deleted"),
        }))
        .into_response(),
        Err(e) => ErrorResponse::from(e).with_status().into_response(),
    }
}

// =============================================================================
// Missions
// =============================================================================

/// List missions
#[utoipa::path(
    get,
    path = "/api/v1/mission",
    responses(
        (status = 200, description = "List of missions", body = ApiResponse),
        (status = 400, description = "Unsupported filter", body = ErrorResponse),
    ),
    tag = "Missions"
)]
pub async fn list_missions(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match list_resource(resources.mission(), store.missions(), &store, &ctx, &params) {
        Ok(objects) => Json(ApiResponse::success(objects)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get one mission
#[utoipa::path(
    get,
    path = "/api/v1/mission/{id}",
    params(("id" = i64, Path, description = "Mission ID")),
    responses(
        (status = 200, description = "Mission detail", body = ApiResponse),
        (status = 404, description = "Mission not found", body = ErrorResponse),
    ),
    tag = "Missions"
)]
pub async fn get_mission(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match get_resource(resources.mission(), store.missions(), &store, &ctx, id) {
        Ok(data) => Json(ApiResponse::success(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a mission
#[utoipa::path(
    post,
    path = "/api/v1/mission",
    request_body = MissionCreateRequest,
    responses(
        (status = 201, description = "Mission created", body = ApiResponse),
        (status = 404, description = "Owning instance not found", body = ErrorResponse),
    ),
    tag = "Missions"
)]
pub async fn create_mission(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(request): Json<MissionCreateRequest>,
) -> Response {
    let mission = match store.save_mission(request.into()) {
        Ok(mission) => mission,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(
        resources.mission(),
        &mission,
        &ctx,
        &store,
        StatusCode::CREATED,
    )
}

/// Update a mission
#[utoipa::path(
    put,
    path = "/api/v1/mission/{id}",
    params(("id" = i64, Path, description = "Mission ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Mission updated", body = ApiResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Mission not found", body = ErrorResponse),
    ),
    tag = "Missions"
)]
pub async fn update_mission(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
    Json(payload): Json<Value>,
) -> Response {
    let payload = match payload_object(payload) {
        Ok(map) => map,
        Err(e) => return e.into_response(),
    };
    if let Err(message) = resources.mission().validate_payload(&payload) {
        return invalid_request(message).into_response();
    }
    let mut mission = match store.missions().get(id) {
        Ok(mission) => mission,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };
    if let Err(message) = apply_mission_update(&mut mission, &payload) {
        return invalid_request(message).into_response();
    }
    let mission = match store.save_mission(mission) {
        Ok(mission) => mission,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };

    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(resources.mission(), &mission, &ctx, &store, StatusCode::OK)
}

/// Delete a mission, its edges and progressions
#[utoipa::path(
    delete,
    path = "/api/v1/mission/{id}",
    params(("id" = i64, Path, description = "Mission ID")),
    responses(
        (status = 200, description = "Mission deleted", body = ApiResponse),
        (status = 404, description = "Mission not found", body = ErrorResponse),
    ),
    tag = "Missions"
)]
pub async fn delete_mission(
    Extension(store): Extension<Arc<Store>>,
    Path(id): Path<Id>,
) -> Response {
    match store.delete_mission(id) {
        Ok(_) => Json(ApiResponse::success(StatusResponse {
            message: format!("mission {id} deleted"),
        }))
        .into_response(),
        Err(e) => ErrorResponse::from(e).with_status().into_response(),
    }
}

// =============================================================================
// Mission relationships
// =============================================================================

/// List mission relationships
#[utoipa::path(
    get,
    path = "/api/v1/mission_relationship",
    responses(
        (status = 200, description = "List of mission relationships", body = ApiResponse),
    ),
    tag = "Mission relationships"
)]
pub async fn list_mission_relationships(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match list_resource(
        resources.mission_relationship(),
        store.mission_relationships(),
        &store,
        &ctx,
        &params,
    ) {
        Ok(objects) => Json(ApiResponse::success(objects)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get one mission relationship
#[utoipa::path(
    get,
    path = "/api/v1/mission_relationship/{id}",
    params(("id" = i64, Path, description = "Mission relationship ID")),
    responses(
        (status = 200, description = "Mission relationship detail", body = ApiResponse),
        (status = 404, description = "Mission relationship not found", body = ErrorResponse),
    ),
    tag = "Mission relationships"
)]
pub async fn get_mission_relationship(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match get_resource(
        resources.mission_relationship(),
        store.mission_relationships(),
        &store,
        &ctx,
        id,
    ) {
        Ok(data) => Json(ApiResponse::success(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Link two missions
#[utoipa::path(
    post,
    path = "/api/v1/mission_relationship",
    request_body = MissionRelationshipCreateRequest,
    responses(
        (status = 201, description = "Relationship created", body = ApiResponse),
        (status = 404, description = "Either mission not found", body = ErrorResponse),
    ),
    tag = "Mission relationships"
)]
pub async fn create_mission_relationship(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(request): Json<MissionRelationshipCreateRequest>,
) -> Response {
    let edge = match store.save_mission_relationship(request.into()) {
        Ok(edge) => edge,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(
        resources.mission_relationship(),
        &edge,
        &ctx,
        &store,
        StatusCode::CREATED,
    )
}

/// Delete a mission relationship
#[utoipa::path(
    delete,
    path = "/api/v1/mission_relationship/{id}",
    params(("id" = i64, Path, description = "Mission relationship ID")),
    responses(
        (status = 200, description = "Relationship deleted", body = ApiResponse),
        (status = 404, description = "Relationship not found", body = ErrorResponse),
    ),
    tag = "Mission relationships"
)]
pub async fn delete_mission_relationship(
    Extension(store): Extension<Arc<Store>>,
    Path(id): Path<Id>,
) -> Response {
    match store.delete_mission_relationship(id) {
        Ok(_) => Json(ApiResponse::success(StatusResponse {
            message: format!("mission_relationship {id} deleted"),
        }))
        .into_response(),
        Err(e) => ErrorResponse::from(e).with_status().into_response(),
    }
}

// =============================================================================
// Progressions
// =============================================================================

/// List progressions
#[utoipa::path(
    get,
    path = "/api/v1/progression",
    responses(
        (status = 200, description = "List of progressions", body = ApiResponse),
        (status = 400, description = "Unsupported filter", body = ErrorResponse),
    ),
    tag = "Progressions"
)]
pub async fn list_progressions(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match list_resource(
        resources.progression(),
        store.progressions(),
        &store,
        &ctx,
        &params,
    ) {
        Ok(objects) => Json(ApiResponse::success(objects)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get one progression
#[utoipa::path(
    get,
    path = "/api/v1/progression/{id}",
    params(("id" = i64, Path, description = "Progression ID")),
    responses(
        (status = 200, description = "Progression detail", body = ApiResponse),
        (status = 404, description = "Progression not found", body = ErrorResponse),
    ),
    tag = "Progressions"
)]
pub async fn get_progression(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Response {
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    match get_resource(resources.progression(), store.progressions(), &store, &ctx, id) {
        Ok(data) => Json(ApiResponse::success(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Record progress on a mission
#[utoipa::path(
    post,
    path = "/api/v1/progression",
    request_body = ProgressionCreateRequest,
    responses(
        (status = 201, description = "Progression created", body = ApiResponse),
        (status = 404, description = "Account or mission not found", body = ErrorResponse),
    ),
    tag = "Progressions"
)]
pub async fn create_progression(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(request): Json<ProgressionCreateRequest>,
) -> Response {
    let progression = match store.save_progression(request.into()) {
        Ok(progression) => progression,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };
    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(
        resources.progression(),
        &progression,
        &ctx,
        &store,
        StatusCode::CREATED,
    )
}

/// Update a progression
#[utoipa::path(
    put,
    path = "/api/v1/progression/{id}",
    params(("id" = i64, Path, description = "Progression ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Progression updated", body = ApiResponse),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Progression not found", body = ErrorResponse),
    ),
    tag = "Progressions"
)]
pub async fn update_progression(
    Extension(store): Extension<Arc<Store>>,
    Extension(resources): Extension<Arc<Resources>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Path(id): Path<Id>,
    Json(payload): Json<Value>,
) -> Response {
    let payload = match payload_object(payload) {
        Ok(map) => map,
        Err(e) => return e.into_response(),
    };
    if let Err(message) = resources.progression().validate_payload(&payload) {
        return invalid_request(message).into_response();
    }
    let mut progression = match store.progressions().get(id) {
        Ok(progression) => progression,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };
    if let Err(message) = apply_progression_update(&mut progression, &payload) {
        return invalid_request(message).into_response();
    }
    let progression = match store.save_progression(progression) {
        Ok(progression) => progression,
        Err(e) => return ErrorResponse::from(e).with_status().into_response(),
    };

    let host = host_of(&headers);
    let ctx = RequestContext::new(uri.path(), &host);
    write_reply(
        resources.progression(),
        &progression,
        &ctx,
        &store,
        StatusCode::OK,
    )
}

/// Delete a progression
#[utoipa::path(
    delete,
    path = "/api/v1/progression/{id}",
    params(("id" = i64, Path, description = "Progression ID")),
    responses(
        (status = 200, description = "Progression deleted", body = ApiResponse),
        (status = 404, description = "Progression not found", body = ErrorResponse),
    ),
    tag = "Progressions"
)]
pub async fn delete_progression(
    Extension(store): Extension<Arc<Store>>,
    Path(id): Path<Id>,
) -> Response {
    match store.delete_progression(id) {
        Ok(_) => Json(ApiResponse::success(StatusResponse {
            message: format!("progression {id} deleted"),
        }))
        .into_response(),
        Err(e) => ErrorResponse::from(e).with_status().into_response(),
    }
}

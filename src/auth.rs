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

//! Basic-credential authentication middleware.
//!
//! Every resource operation passes through this check before any handler
//! runs. Operational endpoints (`/health`, `/api/versions`, the OpenAPI
//! docs) stay outside the protected router.

use axum::{
    extract::{Extension, Request},
    http::header::{AUTHORIZATION, WWW_AUTHENTICATE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::debug;
use std::sync::Arc;

use crate::api::shared::error::{error_codes, ErrorResponse};
use crate::config::AuthSettings;

/// Require a valid `Authorization: Basic ...` header on every request.
pub async fn require_basic_auth(
    Extension(auth): Extension<Arc<AuthSettings>>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if credentials_match(header, &auth) {
        return next.run(request).await;
    }

    debug!("Rejected request to {} with missing or bad credentials", request.uri().path());
    let (status, body) =
        ErrorResponse::new(error_codes::UNAUTHORIZED, "Valid credentials are required")
            .with_status();
    let mut response = (status, body).into_response();
    response.headers_mut().insert(
        WWW_AUTHENTICATE,
        axum::http::HeaderValue::from_static("Basic realm=\"questline\""),
    );
    response
}

fn credentials_match(header: Option<&str>, auth: &AuthSettings) -> bool {
    let Some(header) = header else {
        return false;
    };
    let Some(encoded) = header.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = BASE64.decode(encoded.trim()) else {
        return false;
    };
    let Ok(pair) = String::from_utf8(decoded) else {
        return false;
    };
    match pair.split_once(':') {
        Some((username, password)) => username == auth.username && password == auth.password,
        None => false,
    }
}

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

//! Error types and error handling utilities shared across API versions.

use axum::http::StatusCode;
use serde::Serialize;
use utoipa::ToSchema;

use crate::projection::ProjectionError;
use crate::store::StoreError;

/// Error codes for API responses
pub mod error_codes {
    pub const ACCOUNT_NOT_FOUND: &str = "ACCOUNT_NOT_FOUND";
    pub const OAUTH_LINK_NOT_FOUND: &str = "OAUTH_LINK_NOT_FOUND";
    pub const AUTH_TOKEN_NOT_FOUND: &str = "AUTH_TOKEN_NOT_FOUND";
    pub const INSTANCE_NOT_FOUND: &str = "INSTANCE_NOT_FOUND";
    pub const MISSION_NOT_FOUND: &str = "MISSION_NOT_FOUND";
    pub const MISSION_RELATIONSHIP_NOT_FOUND: &str = "MISSION_RELATIONSHIP_NOT_FOUND";
    pub const PROGRESSION_NOT_FOUND: &str = "PROGRESSION_NOT_FOUND";

    pub const DUPLICATE_RESOURCE: &str = "DUPLICATE_RESOURCE";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const PROJECTION_FAILED: &str = "PROJECTION_FAILED";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// API error response structure
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetail>,
}

/// Additional error details
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Resource type if applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Resource ID if applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Technical error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technical_details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error response
    pub fn with_details(mut self, details: ErrorDetail) -> Self {
        self.details = Some(details);
        self
    }

    /// Convert to a specific status code
    pub fn with_status(self) -> (StatusCode, axum::Json<Self>) {
        let status = status_from_code(&self.code);
        (status, axum::Json(self))
    }
}

/// Convert an error code to an HTTP status code
fn status_from_code(code: &str) -> StatusCode {
    match code {
        error_codes::ACCOUNT_NOT_FOUND
        | error_codes::OAUTH_LINK_NOT_FOUND
        | error_codes::AUTH_TOKEN_NOT_FOUND
        | error_codes::INSTANCE_NOT_FOUND
        | error_codes::MISSION_NOT_FOUND
        | error_codes::MISSION_RELATIONSHIP_NOT_FOUND
        | error_codes::PROGRESSION_NOT_FOUND => StatusCode::NOT_FOUND,

        error_codes::DUPLICATE_RESOURCE => StatusCode::CONFLICT,

        error_codes::INVALID_REQUEST => StatusCode::BAD_REQUEST,

        error_codes::UNAUTHORIZED => StatusCode::UNAUTHORIZED,

        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Map a missing entity to the matching not-found code.
fn not_found_code(entity: &str) -> &'static str {
    match entity {
        "account" => error_codes::ACCOUNT_NOT_FOUND,
        "oauth_link" => error_codes::OAUTH_LINK_NOT_FOUND,
        "auth_token" => error_codes::AUTH_TOKEN_NOT_FOUND,
        "instance" => error_codes::INSTANCE_NOT_FOUND,
        "mission" => error_codes::MISSION_NOT_FOUND,
        "mission_relationship" => error_codes::MISSION_RELATIONSHIP_NOT_FOUND,
        "progression" => error_codes::PROGRESSION_NOT_FOUND,
        _ => error_codes::INTERNAL_ERROR,
    }
}

impl From<StoreError> for ErrorResponse {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::NotFound { entity, id } => {
                ErrorResponse::new(not_found_code(entity), err.to_string()).with_details(
                    ErrorDetail {
                        resource_type: Some(entity.to_string()),
                        resource_id: Some(id.to_string()),
                        technical_details: None,
                    },
                )
            }
        }
    }
}

impl From<ProjectionError> for ErrorResponse {
    fn from(err: ProjectionError) -> Self {
        ErrorResponse::new(error_codes::PROJECTION_FAILED, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_codes_map_to_404() {
        assert_eq!(
            status_from_code(error_codes::ACCOUNT_NOT_FOUND),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_from_code(error_codes::MISSION_RELATIONSHIP_NOT_FOUND),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn request_level_codes_map_to_client_errors() {
        assert_eq!(
            status_from_code(error_codes::INVALID_REQUEST),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_from_code(error_codes::DUPLICATE_RESOURCE),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_from_code(error_codes::UNAUTHORIZED),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn unknown_code_maps_to_500() {
        assert_eq!(
            status_from_code("SOMETHING_ELSE"),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_not_found_carries_details() {
        let err = StoreError::NotFound {
            entity: "mission",
            id: 7,
        };
        let response = ErrorResponse::from(err);
        assert_eq!(response.code, error_codes::MISSION_NOT_FOUND);
        let details = response.details.expect("details");
        assert_eq!(details.resource_type.as_deref(), Some("mission"));
        assert_eq!(details.resource_id.as_deref(), Some("7"));
    }
}

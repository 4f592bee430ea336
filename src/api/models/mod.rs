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

//! API models module - DTO types for resource requests.
//!
//! Create requests carry the writable fields of each resource. Responses
//! are projected field maps built by the projection layer, so there are
//! no per-resource response DTOs here.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Id;

/// Helper function for serde defaults
fn default_true() -> bool {
    true
}

/// Request body for creating an account.
///
/// `oauths` optionally carries one or many provider links to create in the
/// same request. Its shape is validated before the account is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AccountCreateRequest {
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// A single OAuth link object or an array of them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub oauths: Option<serde_json::Value>,
}

/// One OAuth provider link nested inside an account create request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct OAuthPayload {
    pub consumer: String,
    pub consumer_user_id: String,
}

/// Request body for creating an OAuth link directly.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct OAuthLinkCreateRequest {
    pub consumer: String,
    pub consumer_user_id: String,
    /// ID of the owning account.
    pub account: Id,
}

/// Request body for creating an auth token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AuthTokenCreateRequest {
    /// ID of the owning account.
    pub account: Id,
    /// Token value; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Request body for creating a game instance.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct InstanceCreateRequest {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub host: String,
}

/// Request body for creating a mission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct MissionCreateRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Site-relative image path, e.g. `/media/missions/intro.png`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// ID of the owning instance.
    pub instance: Id,
}

/// Request body for linking two missions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct MissionRelationshipCreateRequest {
    /// ID of the parent mission.
    pub parent: Id,
    /// ID of the dependent mission.
    pub mission: Id,
}

/// Request body for creating a progression.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ProgressionCreateRequest {
    /// ID of the account making progress.
    pub account: Id,
    /// ID of the mission being progressed.
    pub mission: Id,
    /// State code, e.g. `offered` or `succeeded`.
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
}

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

//! OpenAPI documentation for API v1.
//!
//! The spec is available at `/api/v1/openapi.json` and the Swagger UI is
//! served at `/api/v1/docs/`.

use utoipa::OpenApi;

use crate::api::models::{
    AccountCreateRequest, AuthTokenCreateRequest, InstanceCreateRequest, MissionCreateRequest,
    MissionRelationshipCreateRequest, OAuthLinkCreateRequest, OAuthPayload,
    ProgressionCreateRequest,
};
use crate::api::shared::{
    ApiResponseSchema, ApiVersionsResponse, ErrorDetail, ErrorResponse, HealthResponse,
    StatusResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::list_api_versions,
        super::handlers::health_check,
        super::handlers::list_accounts,
        super::handlers::get_account,
        super::handlers::create_account,
        super::handlers::update_account,
        super::handlers::delete_account,
        super::handlers::list_oauth_links,
        super::handlers::get_oauth_link,
        super::handlers::create_oauth_link,
        super::handlers::delete_oauth_link,
        super::handlers::list_auth_tokens,
        super::handlers::get_auth_token,
        super::handlers::create_auth_token,
        super::handlers::delete_auth_token,
        super::handlers::list_instances,
        super::handlers::get_instance,
        super::handlers::create_instance,
        super::handlers::update_instance,
        super::handlers::delete_instance,
        super::handlers::list_missions,
        super::handlers::get_mission,
        super::handlers::create_mission,
        super::handlers::update_mission,
        super::handlers::delete_mission,
        super::handlers::list_mission_relationships,
        super::handlers::get_mission_relationship,
        super::handlers::create_mission_relationship,
        super::handlers::delete_mission_relationship,
        super::handlers::list_progressions,
        super::handlers::get_progression,
        super::handlers::create_progression,
        super::handlers::update_progression,
        super::handlers::delete_progression,
    ),
    components(
        schemas(
            HealthResponse,
            ApiResponseSchema,
            StatusResponse,
            ApiVersionsResponse,
            ErrorResponse,
            ErrorDetail,
            AccountCreateRequest,
            OAuthPayload,
            OAuthLinkCreateRequest,
            AuthTokenCreateRequest,
            InstanceCreateRequest,
            MissionCreateRequest,
            MissionRelationshipCreateRequest,
            ProgressionCreateRequest,
        )
    ),
    tags(
        (name = "API", description = "API version information"),
        (name = "Health", description = "Health check endpoints"),
        (name = "Accounts", description = "Player account management"),
        (name = "OAuth links", description = "OAuth provider identities"),
        (name = "Auth tokens", description = "API auth tokens"),
        (name = "Instances", description = "Game instance management"),
        (name = "Missions", description = "Mission management"),
        (name = "Mission relationships", description = "Mission dependency edges"),
        (name = "Progressions", description = "Per-account mission progress"),
    ),
    info(
        title = "Questline Server API",
        version = "1.0.0",
        description = "Questline Server REST API v1.\n\nQuestline serves the resource layer of a gamified learning platform: accounts, game instances, missions, mission dependency edges and per-account progressions.\n\n## API Versioning\n\nThis API uses URL-based versioning. All endpoints are prefixed with `/api/v1/`.\n\n## Projections\n\nList endpoints return the base field set of each resource. Requesting an object at its canonical URI additionally projects its detail fields (an account's progressions, an instance's missions).",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    )
)]
pub struct ApiDocV1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_builds() {
        let doc = ApiDocV1::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/api/v1/account"));
        assert!(paths.contains_key("/api/v1/account/{id}"));
        assert!(paths.contains_key("/api/v1/mission_relationship"));
        assert!(paths.contains_key("/health"));
    }
}

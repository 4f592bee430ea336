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

//! REST API implementation for the Questline server.
//!
//! The API uses URL-based versioning with all resource endpoints prefixed
//! with `/api/v1/`.
//!
//! ```text
//! /health                          - Health check (unversioned)
//! /api/versions                    - List available API versions
//! /api/v1/account                  - Player accounts
//! /api/v1/oauth_link               - OAuth provider identities
//! /api/v1/auth_token               - API auth tokens
//! /api/v1/instance                 - Game instances
//! /api/v1/mission                  - Missions
//! /api/v1/mission_relationship     - Mission dependency edges
//! /api/v1/progression              - Per-account mission progress
//! ```
//!
//! ## Module Organization
//!
//! - `shared` - Common types shared across API versions
//! - `v1` - API version 1 implementation
//! - `version` - Version constants and utilities
//! - `models` - Request DTOs
//! - `mappings` - Conversion between DTOs and domain entities
//! - `resources` - Projection specs for every published resource

pub mod mappings;
pub mod models;
pub mod resources;
pub mod shared;
pub mod v1;
pub mod version;

// Re-export commonly used types from shared module
pub use shared::error::*;
pub use shared::responses::*;

// Re-export v1 handlers and types for convenience
pub use v1::handlers::*;
pub use v1::openapi::ApiDocV1;
pub use v1::routes::build_v1_router;

// Re-export version utilities
pub use version::{ApiVersion, API_CURRENT_VERSION};

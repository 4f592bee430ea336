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

//! Configuration management for the Questline server.
//!
//! Configuration covers the bind address, API credentials and optional
//! seed data, loaded from YAML or JSON. All loading functions interpolate
//! environment variables using POSIX-style syntax:
//! - `${VAR_NAME}` - required variable
//! - `${VAR_NAME:-default}` - variable with a default value
//!
//! ```yaml
//! server:
//!   host: "${QUESTLINE_HOST:-0.0.0.0}"
//!   port: "${QUESTLINE_PORT:-8080}"
//!   auth:
//!     username: "${QUESTLINE_API_USER}"
//!     password: "${QUESTLINE_API_PASSWORD}"
//! ```

pub mod env_interpolation;
pub mod loader;
pub mod types;

// Re-export commonly used types
pub use loader::{from_json_str, from_yaml_str, load_config_file, ConfigError};
pub use types::{
    AuthSettings, InstanceSeed, MissionSeed, RelationshipSeed, SeedConfig, ServerConfig,
    ServerSettings,
};

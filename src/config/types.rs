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

//! Typed configuration structures for the Questline server.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::Id;

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Top-level server configuration: bind settings, API credentials and
/// optional seed data loaded into the store at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub auth: AuthSettings,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            auth: AuthSettings::default(),
        }
    }
}

/// Basic-credential pair checked on every resource request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthSettings {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Seed records loaded into the in-memory store at startup, the same way
/// the API would create them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedConfig {
    #[serde(default)]
    pub instances: Vec<InstanceSeed>,
    #[serde(default)]
    pub missions: Vec<MissionSeed>,
    #[serde(default)]
    pub mission_relationships: Vec<RelationshipSeed>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceSeed {
    pub id: Id,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MissionSeed {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub instance: Id,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipSeed {
    pub parent: Id,
    pub mission: Id,
}

impl ServerConfig {
    /// Validate settings and seed-data referential integrity before the
    /// server starts.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.server.auth.username.is_empty() {
            bail!("server.auth.username must be set");
        }
        if self.server.auth.password.is_empty() {
            bail!("server.auth.password must be set");
        }

        let mut instance_ids = HashSet::new();
        let mut slugs = HashSet::new();
        for instance in &self.seed.instances {
            if !instance_ids.insert(instance.id) {
                bail!("duplicate seed instance id {}", instance.id);
            }
            if !slugs.insert(instance.slug.as_str()) {
                bail!("duplicate seed instance slug '{}'", instance.slug);
            }
        }

        let mut mission_ids = HashSet::new();
        for mission in &self.seed.missions {
            if !mission_ids.insert(mission.id) {
                bail!("duplicate seed mission id {}", mission.id);
            }
            if !instance_ids.contains(&mission.instance) {
                bail!(
                    "seed mission '{}' references unknown instance {}",
                    mission.name,
                    mission.instance
                );
            }
        }

        for rel in &self.seed.mission_relationships {
            if !mission_ids.contains(&rel.parent) || !mission_ids.contains(&rel.mission) {
                bail!(
                    "seed mission relationship {} -> {} references an unknown mission",
                    rel.parent,
                    rel.mission
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ServerConfig {
        let mut config = ServerConfig::default();
        config.server.auth.username = "admin".to_string();
        config.server.auth.password = "secret".to_string();
        config
    }

    #[test]
    fn default_settings_fill_in() {
        let settings = ServerSettings::default();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn validate_requires_credentials() {
        let config = ServerConfig::default();
        assert!(config.validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_dangling_seed_mission() {
        let mut config = valid_config();
        config.seed.missions.push(MissionSeed {
            id: 1,
            name: "orphan".to_string(),
            description: String::new(),
            image: None,
            instance: 99,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_dangling_relationship() {
        let mut config = valid_config();
        config.seed.instances.push(InstanceSeed {
            id: 1,
            slug: "demo".to_string(),
            name: "Demo".to_string(),
            host: String::new(),
        });
        config.seed.missions.push(MissionSeed {
            id: 1,
            name: "intro".to_string(),
            description: String::new(),
            image: None,
            instance: 1,
        });
        config.seed.mission_relationships.push(RelationshipSeed {
            parent: 1,
            mission: 2,
        });
        assert!(config.validate().is_err());
    }
}

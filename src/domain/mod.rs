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

//! Domain entities for the questline gamified-learning domain.
//!
//! Each entity carries a static schema describing its published fields.
//! The `blank` marker on a schema field means the field is optional on
//! write; resource construction propagates it onto field descriptors
//! (see `projection::ResourceSpec::from_schema`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier type shared by all entities. `0` means "not yet persisted";
/// the store allocates a real id on first save.
pub type Id = i64;

/// One field of an entity's published schema.
#[derive(Debug, Clone, Copy)]
pub struct SchemaField {
    pub name: &'static str,
    /// Whether the field is blank-allowed (optional on write).
    pub blank: bool,
}

const fn field(name: &'static str) -> SchemaField {
    SchemaField { name, blank: false }
}

const fn blank_field(name: &'static str) -> SchemaField {
    SchemaField { name, blank: true }
}

/// A storable domain object with a static schema.
pub trait Entity: Serialize + Clone {
    /// Lowercase entity name, also used as the resource name in URIs.
    const NAME: &'static str;

    fn schema() -> &'static [SchemaField];
    fn id(&self) -> Id;
    fn set_id(&mut self, id: Id);
}

fn default_true() -> bool {
    true
}

/// Identity entity. Owns OAuth links, auth tokens and progressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: Id,
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
    pub date_joined: DateTime<Utc>,
}

impl Entity for Account {
    const NAME: &'static str = "account";

    fn schema() -> &'static [SchemaField] {
        const SCHEMA: &[SchemaField] = &[
            field("id"),
            field("username"),
            blank_field("first_name"),
            blank_field("last_name"),
            blank_field("email"),
            field("password"),
            field("is_active"),
            field("date_joined"),
        ];
        SCHEMA
    }

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// A (consumer, consumer_user_id) pair owned by exactly one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthLink {
    #[serde(default)]
    pub id: Id,
    pub consumer: String,
    pub consumer_user_id: String,
    pub account_id: Id,
}

impl Entity for OAuthLink {
    const NAME: &'static str = "oauth_link";

    fn schema() -> &'static [SchemaField] {
        const SCHEMA: &[SchemaField] = &[
            field("id"),
            field("consumer"),
            field("consumer_user_id"),
            field("account_id"),
        ];
        SCHEMA
    }

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Opaque token owned by exactly one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    #[serde(default)]
    pub id: Id,
    pub token: String,
    pub account_id: Id,
    pub created_at: DateTime<Utc>,
}

impl Entity for AuthToken {
    const NAME: &'static str = "auth_token";

    fn schema() -> &'static [SchemaField] {
        const SCHEMA: &[SchemaField] = &[
            field("id"),
            field("token"),
            field("account_id"),
            field("created_at"),
        ];
        SCHEMA
    }

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Named deployment/grouping entity. Owns missions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    #[serde(default)]
    pub id: Id,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub host: String,
}

impl Entity for Instance {
    const NAME: &'static str = "instance";

    fn schema() -> &'static [SchemaField] {
        const SCHEMA: &[SchemaField] = &[
            field("id"),
            field("slug"),
            field("name"),
            blank_field("host"),
        ];
        SCHEMA
    }

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Belongs to exactly one instance; may carry an image reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mission {
    #[serde(default)]
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub instance_id: Id,
}

impl Entity for Mission {
    const NAME: &'static str = "mission";

    fn schema() -> &'static [SchemaField] {
        const SCHEMA: &[SchemaField] = &[
            field("id"),
            field("name"),
            blank_field("description"),
            blank_field("image"),
            field("instance_id"),
        ];
        SCHEMA
    }

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Directed edge (parent -> mission) between two missions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionRelationship {
    #[serde(default)]
    pub id: Id,
    pub parent_id: Id,
    pub mission_id: Id,
}

impl Entity for MissionRelationship {
    const NAME: &'static str = "mission_relationship";

    fn schema() -> &'static [SchemaField] {
        const SCHEMA: &[SchemaField] = &[field("id"), field("parent_id"), field("mission_id")];
        SCHEMA
    }

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Join record tracking an account's advancement state through a mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    #[serde(default)]
    pub id: Id,
    pub account_id: Id,
    pub mission_id: Id,
    pub state: String,
    #[serde(default)]
    pub points: Option<i64>,
}

impl Entity for Progression {
    const NAME: &'static str = "progression";

    fn schema() -> &'static [SchemaField] {
        const SCHEMA: &[SchemaField] = &[
            field("id"),
            field("account_id"),
            field("mission_id"),
            field("state"),
            blank_field("points"),
        ];
        SCHEMA
    }

    fn id(&self) -> Id {
        self.id
    }

    fn set_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Fixed enumeration of progression states as (code, display label) pairs.
pub const PROGRESSION_STATES: &[(&str, &str)] = &[
    ("offered", "Offered"),
    ("started", "Started"),
    ("succeeded", "Succeeded"),
    ("failed", "Failed"),
];

/// Translate a progression state code to its display label.
///
/// Returns `None` for unknown codes; callers decide how to render the
/// missing label (the projection layer renders it as JSON null).
pub fn state_label(code: &str) -> Option<&'static str> {
    match code {
        "offered" => Some("Offered"),
        "started" => Some("Started"),
        "succeeded" => Some("Succeeded"),
        "failed" => Some("Failed"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_label_matches_enumeration_table() {
        for (code, label) in PROGRESSION_STATES {
            assert_eq!(state_label(code), Some(*label));
        }
    }

    #[test]
    fn state_label_unknown_code_is_none() {
        assert_eq!(state_label("abandoned"), None);
        assert_eq!(state_label(""), None);
    }

    #[test]
    fn every_entity_schema_publishes_id_first() {
        assert_eq!(Account::schema()[0].name, "id");
        assert_eq!(OAuthLink::schema()[0].name, "id");
        assert_eq!(AuthToken::schema()[0].name, "id");
        assert_eq!(Instance::schema()[0].name, "id");
        assert_eq!(Mission::schema()[0].name, "id");
        assert_eq!(MissionRelationship::schema()[0].name, "id");
        assert_eq!(Progression::schema()[0].name, "id");
    }

    #[test]
    fn account_schema_marks_optional_fields_blank() {
        let blanks: Vec<&str> = Account::schema()
            .iter()
            .filter(|f| f.blank)
            .map(|f| f.name)
            .collect();
        assert_eq!(blanks, vec!["first_name", "last_name", "email"]);
    }
}

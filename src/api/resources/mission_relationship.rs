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

use serde_json::Value;
use std::sync::Arc;

use super::API_NAME;
use crate::domain::MissionRelationship;
use crate::projection::{FieldKind, ProjectionError, ResourceSpec};

/// Dependency edge between two missions. Both endpoints project as
/// canonical mission URIs. Writes answer with a plain status message.
pub(super) fn spec() -> ResourceSpec<MissionRelationship> {
    ResourceSpec::from_schema(API_NAME, "mission_relationship", &["parent_id", "mission_id"])
        .with_base_field(
            "parent",
            FieldKind::Related,
            Arc::new(|obj: &MissionRelationship, _raw, env| {
                if !env.store.missions().contains(obj.parent_id) {
                    return Err(ProjectionError::MissingRelation {
                        entity: "mission",
                        id: obj.parent_id,
                    });
                }
                Ok(Value::String(env.ns.related_uri("mission", obj.parent_id)))
            }),
        )
        .with_base_field(
            "mission",
            FieldKind::Related,
            Arc::new(|obj: &MissionRelationship, _raw, env| {
                if !env.store.missions().contains(obj.mission_id) {
                    return Err(ProjectionError::MissingRelation {
                        entity: "mission",
                        id: obj.mission_id,
                    });
                }
                Ok(Value::String(env.ns.related_uri("mission", obj.mission_id)))
            }),
        )
}

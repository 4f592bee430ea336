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

use super::{resolve_account, resolve_mission, API_NAME};
use crate::domain::{state_label, Progression};
use crate::projection::{FieldKind, FilterKind, ProjectionError, ResourceSpec};

/// Progression resource. The stored state code projects as its display
/// label; codes outside the known table project as null rather than
/// leaking the raw value.
pub(super) fn spec() -> ResourceSpec<Progression> {
    ResourceSpec::from_schema(API_NAME, "progression", &["account_id", "mission_id"])
        .with_base_field(
            "account",
            FieldKind::Related,
            Arc::new(|obj: &Progression, _raw, env| {
                if !env.store.accounts().contains(obj.account_id) {
                    return Err(ProjectionError::MissingRelation {
                        entity: "account",
                        id: obj.account_id,
                    });
                }
                Ok(Value::String(env.ns.related_uri("account", obj.account_id)))
            }),
        )
        .with_base_field(
            "mission",
            FieldKind::Related,
            Arc::new(|obj: &Progression, _raw, env| {
                if !env.store.missions().contains(obj.mission_id) {
                    return Err(ProjectionError::MissingRelation {
                        entity: "mission",
                        id: obj.mission_id,
                    });
                }
                Ok(Value::String(env.ns.related_uri("mission", obj.mission_id)))
            }),
        )
        .with_override(
            "state",
            Arc::new(|_obj: &Progression, data, _env| {
                let label = data
                    .get("state")
                    .and_then(Value::as_str)
                    .and_then(state_label);
                Ok(match label {
                    Some(label) => Value::String(label.to_string()),
                    None => Value::Null,
                })
            }),
        )
        .with_filter("state", FilterKind::Exact)
        .with_related_filter("account", resolve_account)
        .with_related_filter("mission", resolve_mission)
        .returning_full_data()
}

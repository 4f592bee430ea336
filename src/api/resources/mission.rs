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

use super::{resolve_instance, API_NAME};
use crate::domain::{Mission, MissionRelationship};
use crate::projection::{FieldKind, FilterKind, ProjectionError, ResourceSpec};

/// Mission resource. The owning instance projects as a URI, the edges
/// targeting this mission embed in full, and the image path is rewritten
/// to an absolute URL anchored at the request host.
pub(super) fn spec(
    relationship: Arc<ResourceSpec<MissionRelationship>>,
) -> ResourceSpec<Mission> {
    ResourceSpec::from_schema(API_NAME, "mission", &["instance_id"])
        .with_base_field(
            "instance",
            FieldKind::Related,
            Arc::new(|obj: &Mission, _raw, env| {
                if !env.store.instances().contains(obj.instance_id) {
                    return Err(ProjectionError::MissingRelation {
                        entity: "instance",
                        id: obj.instance_id,
                    });
                }
                Ok(Value::String(env.ns.related_uri("instance", obj.instance_id)))
            }),
        )
        .with_base_field(
            "relationships",
            FieldKind::Related,
            Arc::new(move |obj: &Mission, _raw, env| {
                let edges = env
                    .store
                    .mission_relationships()
                    .filter(|r| r.mission_id == obj.id);
                let mut nested = Vec::with_capacity(edges.len());
                for edge in edges {
                    nested.push(Value::Object(relationship.project(
                        &edge,
                        env.ctx,
                        env.store,
                    )?));
                }
                Ok(Value::Array(nested))
            }),
        )
        // The stored path is site-relative; clients get a dereferenceable URL
        .with_override(
            "image",
            Arc::new(|_obj: &Mission, data, env| {
                match data.get("image") {
                    Some(Value::String(path)) if !path.is_empty() => {
                        Ok(Value::String(env.ctx.absolute_uri(path)))
                    }
                    _ => Ok(Value::Null),
                }
            }),
        )
        .with_filter("name", FilterKind::Exact)
        .with_related_filter("instance", resolve_instance)
        .returning_full_data()
}

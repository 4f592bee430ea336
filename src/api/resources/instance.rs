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

use super::{resolve_instance_missions, API_NAME};
use crate::domain::{Instance, Mission};
use crate::projection::{FieldKind, FilterKind, ResourceSpec};

/// Game instance resource. Detail requests embed the instance's missions
/// in full; list requests stay shallow.
pub(super) fn spec(mission: Arc<ResourceSpec<Mission>>) -> ResourceSpec<Instance> {
    ResourceSpec::from_schema(API_NAME, "instance", &[])
        .with_detail_field(
            "missions",
            FieldKind::Related,
            Arc::new(move |obj: &Instance, _raw, env| {
                let rows = env.store.missions().filter(|m| m.instance_id == obj.id);
                let mut nested = Vec::with_capacity(rows.len());
                for row in rows {
                    nested.push(Value::Object(mission.project(&row, env.ctx, env.store)?));
                }
                Ok(Value::Array(nested))
            }),
        )
        .with_filter("slug", FilterKind::Exact)
        .with_filter("name", FilterKind::Exact)
        .with_filter("host", FilterKind::Exact)
        .with_reverse_filter("missions", resolve_instance_missions)
        .returning_full_data()
}

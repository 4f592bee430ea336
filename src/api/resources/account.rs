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
use crate::domain::{Account, Progression};
use crate::projection::{FieldKind, FilterKind, ResourceSpec};

/// Account resource. Credentials never leave the server; the account's
/// progressions are embedded in full on detail requests only.
pub(super) fn spec(progression: Arc<ResourceSpec<Progression>>) -> ResourceSpec<Account> {
    ResourceSpec::from_schema(API_NAME, "account", &["password", "email"])
        .with_detail_field(
            "progressions",
            FieldKind::Related,
            Arc::new(move |obj: &Account, _raw, env| {
                let rows = env.store.progressions().filter(|p| p.account_id == obj.id);
                let mut nested = Vec::with_capacity(rows.len());
                for row in rows {
                    nested.push(Value::Object(progression.project(&row, env.ctx, env.store)?));
                }
                Ok(Value::Array(nested))
            }),
        )
        .with_filter("id", FilterKind::Exact)
        .with_filter("username", FilterKind::Exact)
        .with_filter("first_name", FilterKind::Exact)
        .with_filter("last_name", FilterKind::Exact)
        .with_filter("is_active", FilterKind::Exact)
        .with_filter("date_joined", FilterKind::Exact)
        .returning_full_data()
}

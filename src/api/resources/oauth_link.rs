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

use super::{resolve_account, API_NAME};
use crate::domain::{Account, OAuthLink};
use crate::projection::{FieldKind, FilterKind, ProjectionError, ResourceSpec};

/// OAuth provider link. The owning account embeds in full so consumers
/// resolve a provider identity to a user in one request.
pub(super) fn spec(account: Arc<ResourceSpec<Account>>) -> ResourceSpec<OAuthLink> {
    ResourceSpec::from_schema(API_NAME, "oauth_link", &["account_id"])
        .with_base_field(
            "account",
            FieldKind::Related,
            Arc::new(move |obj: &OAuthLink, _raw, env| {
                let owner = env.store.accounts().get(obj.account_id).map_err(|_| {
                    ProjectionError::MissingRelation {
                        entity: "account",
                        id: obj.account_id,
                    }
                })?;
                Ok(Value::Object(account.project(&owner, env.ctx, env.store)?))
            }),
        )
        .with_filter("consumer", FilterKind::Exact)
        .with_filter("consumer_user_id", FilterKind::Exact)
        .with_related_filter("account", resolve_account)
        .returning_full_data()
}

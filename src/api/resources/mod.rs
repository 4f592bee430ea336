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

//! Projection specs for every published resource.
//!
//! Specs that embed full nested objects capture the sibling spec behind
//! an `Arc`, so construction runs in dependency order: relationship and
//! progression specs first, then the specs that embed them.

mod account;
mod auth_token;
mod instance;
mod mission;
mod mission_relationship;
mod oauth_link;
mod progression;

use serde_json::Value;
use std::sync::Arc;

use crate::domain::{
    Account, AuthToken, Id, Instance, Mission, MissionRelationship, OAuthLink, Progression,
};
use crate::projection::ResourceSpec;
use crate::store::Store;

/// Name of the API version these resources are published under.
pub const API_NAME: &str = "v1";

/// All resource specs for one API version, built once at startup.
pub struct Resources {
    account: Arc<ResourceSpec<Account>>,
    oauth_link: Arc<ResourceSpec<OAuthLink>>,
    auth_token: Arc<ResourceSpec<AuthToken>>,
    instance: Arc<ResourceSpec<Instance>>,
    mission: Arc<ResourceSpec<Mission>>,
    mission_relationship: Arc<ResourceSpec<MissionRelationship>>,
    progression: Arc<ResourceSpec<Progression>>,
}

impl Default for Resources {
    fn default() -> Self {
        Self::new()
    }
}

impl Resources {
    pub fn new() -> Self {
        let mission_relationship = Arc::new(mission_relationship::spec());
        let mission = Arc::new(mission::spec(Arc::clone(&mission_relationship)));
        let instance = Arc::new(instance::spec(Arc::clone(&mission)));
        let progression = Arc::new(progression::spec());
        let account = Arc::new(account::spec(Arc::clone(&progression)));
        let oauth_link = Arc::new(oauth_link::spec(Arc::clone(&account)));
        let auth_token = Arc::new(auth_token::spec(Arc::clone(&account)));

        Self {
            account,
            oauth_link,
            auth_token,
            instance,
            mission,
            mission_relationship,
            progression,
        }
    }

    pub fn account(&self) -> &ResourceSpec<Account> {
        &self.account
    }

    pub fn oauth_link(&self) -> &ResourceSpec<OAuthLink> {
        &self.oauth_link
    }

    pub fn auth_token(&self) -> &ResourceSpec<AuthToken> {
        &self.auth_token
    }

    pub fn instance(&self) -> &ResourceSpec<Instance> {
        &self.instance
    }

    pub fn mission(&self) -> &ResourceSpec<Mission> {
        &self.mission
    }

    pub fn mission_relationship(&self) -> &ResourceSpec<MissionRelationship> {
        &self.mission_relationship
    }

    pub fn progression(&self) -> &ResourceSpec<Progression> {
        &self.progression
    }
}

/// Serialize a related account for `account__field` filters.
pub(crate) fn resolve_account(store: &Store, id: Id) -> Option<Value> {
    let account = store.accounts().get(id).ok()?;
    serde_json::to_value(account).ok()
}

/// Serialize a related instance for `instance__field` filters.
pub(crate) fn resolve_instance(store: &Store, id: Id) -> Option<Value> {
    let instance = store.instances().get(id).ok()?;
    serde_json::to_value(instance).ok()
}

/// Serialize a related mission for `mission__field` filters.
pub(crate) fn resolve_mission(store: &Store, id: Id) -> Option<Value> {
    let mission = store.missions().get(id).ok()?;
    serde_json::to_value(mission).ok()
}

/// Serialize an instance's missions for reverse `missions__field` filters.
pub(crate) fn resolve_instance_missions(store: &Store, id: Id) -> Vec<Value> {
    store
        .missions()
        .filter(|m| m.instance_id == id)
        .into_iter()
        .filter_map(|m| serde_json::to_value(m).ok())
        .collect()
}

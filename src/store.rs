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

//! In-memory persistence collaborator.
//!
//! Provides the minimal surface the resource layer requires: `get(id)`,
//! `filter(predicate)`, `save(object)` and `delete(id)` per entity table.
//! Referential integrity is enforced here, not in the projection layer:
//! saving an object with a dangling foreign key fails, and deleting an
//! owner cascades to its dependents.
//!
//! Locks are std `RwLock`s; nothing is held across await points since
//! every operation clones data in or out synchronously.

use indexmap::IndexMap;
use std::sync::RwLock;
use thiserror::Error;

use crate::domain::{
    Account, AuthToken, Entity, Id, Instance, Mission, MissionRelationship, OAuthLink, Progression,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: Id },
}

impl StoreError {
    pub fn not_found<T: Entity>(id: Id) -> Self {
        StoreError::NotFound {
            entity: T::NAME,
            id,
        }
    }
}

struct TableInner<T> {
    rows: IndexMap<Id, T>,
    next_id: Id,
}

/// One entity table with insertion-ordered rows and id allocation.
pub struct Table<T: Entity> {
    inner: RwLock<TableInner<T>>,
}

impl<T: Entity> Table<T> {
    fn new() -> Self {
        Self {
            inner: RwLock::new(TableInner {
                rows: IndexMap::new(),
                next_id: 1,
            }),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, TableInner<T>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, TableInner<T>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, id: Id) -> Result<T, StoreError> {
        self.read()
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found::<T>(id))
    }

    pub fn contains(&self, id: Id) -> bool {
        self.read().rows.contains_key(&id)
    }

    pub fn all(&self) -> Vec<T> {
        self.read().rows.values().cloned().collect()
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.read()
            .rows
            .values()
            .filter(|row| predicate(row))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().rows.is_empty()
    }

    /// Insert or replace. Allocates an id when the object carries `0`.
    fn upsert(&self, mut obj: T) -> T {
        let mut inner = self.write();
        if obj.id() == 0 {
            let id = inner.next_id;
            inner.next_id += 1;
            obj.set_id(id);
        } else if obj.id() >= inner.next_id {
            // Seeded or client-chosen ids must not collide with allocation
            inner.next_id = obj.id() + 1;
        }
        inner.rows.insert(obj.id(), obj.clone());
        obj
    }

    fn remove(&self, id: Id) -> Result<T, StoreError> {
        self.write()
            .rows
            .shift_remove(&id)
            .ok_or_else(|| StoreError::not_found::<T>(id))
    }

    fn retain(&self, keep: impl Fn(&T) -> bool) {
        self.write().rows.retain(|_, row| keep(row));
    }
}

/// The full domain store: one table per entity, with foreign-key checks
/// at save time and cascading deletes for owned records.
pub struct Store {
    accounts: Table<Account>,
    oauth_links: Table<OAuthLink>,
    auth_tokens: Table<AuthToken>,
    instances: Table<Instance>,
    missions: Table<Mission>,
    mission_relationships: Table<MissionRelationship>,
    progressions: Table<Progression>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            accounts: Table::new(),
            oauth_links: Table::new(),
            auth_tokens: Table::new(),
            instances: Table::new(),
            missions: Table::new(),
            mission_relationships: Table::new(),
            progressions: Table::new(),
        }
    }

    pub fn accounts(&self) -> &Table<Account> {
        &self.accounts
    }

    pub fn oauth_links(&self) -> &Table<OAuthLink> {
        &self.oauth_links
    }

    pub fn auth_tokens(&self) -> &Table<AuthToken> {
        &self.auth_tokens
    }

    pub fn instances(&self) -> &Table<Instance> {
        &self.instances
    }

    pub fn missions(&self) -> &Table<Mission> {
        &self.missions
    }

    pub fn mission_relationships(&self) -> &Table<MissionRelationship> {
        &self.mission_relationships
    }

    pub fn progressions(&self) -> &Table<Progression> {
        &self.progressions
    }

    fn require<T: Entity>(table: &Table<T>, id: Id) -> Result<(), StoreError> {
        if table.contains(id) {
            Ok(())
        } else {
            Err(StoreError::not_found::<T>(id))
        }
    }

    pub fn save_account(&self, account: Account) -> Result<Account, StoreError> {
        Ok(self.accounts.upsert(account))
    }

    pub fn save_oauth_link(&self, link: OAuthLink) -> Result<OAuthLink, StoreError> {
        Self::require(&self.accounts, link.account_id)?;
        Ok(self.oauth_links.upsert(link))
    }

    pub fn save_auth_token(&self, token: AuthToken) -> Result<AuthToken, StoreError> {
        Self::require(&self.accounts, token.account_id)?;
        Ok(self.auth_tokens.upsert(token))
    }

    pub fn save_instance(&self, instance: Instance) -> Result<Instance, StoreError> {
        Ok(self.instances.upsert(instance))
    }

    pub fn save_mission(&self, mission: Mission) -> Result<Mission, StoreError> {
        Self::require(&self.instances, mission.instance_id)?;
        Ok(self.missions.upsert(mission))
    }

    pub fn save_mission_relationship(
        &self,
        rel: MissionRelationship,
    ) -> Result<MissionRelationship, StoreError> {
        Self::require(&self.missions, rel.parent_id)?;
        Self::require(&self.missions, rel.mission_id)?;
        Ok(self.mission_relationships.upsert(rel))
    }

    pub fn save_progression(&self, progression: Progression) -> Result<Progression, StoreError> {
        Self::require(&self.accounts, progression.account_id)?;
        Self::require(&self.missions, progression.mission_id)?;
        Ok(self.progressions.upsert(progression))
    }

    /// Delete an account and everything it owns.
    pub fn delete_account(&self, id: Id) -> Result<(), StoreError> {
        self.accounts.remove(id)?;
        self.oauth_links.retain(|l| l.account_id != id);
        self.auth_tokens.retain(|t| t.account_id != id);
        self.progressions.retain(|p| p.account_id != id);
        Ok(())
    }

    pub fn delete_oauth_link(&self, id: Id) -> Result<(), StoreError> {
        self.oauth_links.remove(id).map(|_| ())
    }

    pub fn delete_auth_token(&self, id: Id) -> Result<(), StoreError> {
        self.auth_tokens.remove(id).map(|_| ())
    }

    /// Delete an instance and its missions (with their edges and progressions).
    pub fn delete_instance(&self, id: Id) -> Result<(), StoreError> {
        self.instances.remove(id)?;
        let orphaned = self.missions.filter(|m| m.instance_id == id);
        for mission in orphaned {
            // Already checked existence via the filter above
            let _ = self.delete_mission(mission.id);
        }
        Ok(())
    }

    /// Delete a mission, its relationship edges and its progressions.
    pub fn delete_mission(&self, id: Id) -> Result<(), StoreError> {
        self.missions.remove(id)?;
        self.mission_relationships
            .retain(|r| r.parent_id != id && r.mission_id != id);
        self.progressions.retain(|p| p.mission_id != id);
        Ok(())
    }

    pub fn delete_mission_relationship(&self, id: Id) -> Result<(), StoreError> {
        self.mission_relationships.remove(id).map(|_| ())
    }

    pub fn delete_progression(&self, id: Id) -> Result<(), StoreError> {
        self.progressions.remove(id).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn account(username: &str) -> Account {
        Account {
            id: 0,
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            is_active: true,
            date_joined: Utc::now(),
        }
    }

    fn instance(slug: &str) -> Instance {
        Instance {
            id: 0,
            slug: slug.to_string(),
            name: slug.to_string(),
            host: String::new(),
        }
    }

    fn mission(name: &str, instance_id: Id) -> Mission {
        Mission {
            id: 0,
            name: name.to_string(),
            description: String::new(),
            image: None,
            instance_id,
        }
    }

    #[test]
    fn save_allocates_sequential_ids() {
        let store = Store::new();
        let a = store.save_account(account("ada")).unwrap();
        let b = store.save_account(account("grace")).unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[test]
    fn save_with_preset_id_advances_allocation() {
        let store = Store::new();
        let mut seeded = account("seeded");
        seeded.id = 10;
        store.save_account(seeded).unwrap();
        let next = store.save_account(account("next")).unwrap();
        assert_eq!(next.id, 11);
    }

    #[test]
    fn save_replaces_existing_row() {
        let store = Store::new();
        let mut a = store.save_account(account("ada")).unwrap();
        a.first_name = "Ada".to_string();
        store.save_account(a.clone()).unwrap();
        assert_eq!(store.accounts().len(), 1);
        assert_eq!(store.accounts().get(a.id).unwrap().first_name, "Ada");
    }

    #[test]
    fn oauth_link_requires_existing_account() {
        let store = Store::new();
        let err = store
            .save_oauth_link(OAuthLink {
                id: 0,
                consumer: "twitter".to_string(),
                consumer_user_id: "42".to_string(),
                account_id: 99,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound {
                entity: "account",
                id: 99
            }
        ));
    }

    #[test]
    fn progression_requires_account_and_mission() {
        let store = Store::new();
        let a = store.save_account(account("ada")).unwrap();
        let err = store
            .save_progression(Progression {
                id: 0,
                account_id: a.id,
                mission_id: 7,
                state: "started".to_string(),
                points: None,
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { entity: "mission", .. }));
    }

    #[test]
    fn delete_account_cascades_owned_records() {
        let store = Store::new();
        let a = store.save_account(account("ada")).unwrap();
        let inst = store.save_instance(instance("demo")).unwrap();
        let m = store.save_mission(mission("intro", inst.id)).unwrap();
        store
            .save_oauth_link(OAuthLink {
                id: 0,
                consumer: "twitter".to_string(),
                consumer_user_id: "42".to_string(),
                account_id: a.id,
            })
            .unwrap();
        store
            .save_progression(Progression {
                id: 0,
                account_id: a.id,
                mission_id: m.id,
                state: "started".to_string(),
                points: None,
            })
            .unwrap();

        store.delete_account(a.id).unwrap();
        assert!(store.oauth_links().is_empty());
        assert!(store.progressions().is_empty());
    }

    #[test]
    fn delete_mission_cascades_edges_and_progressions() {
        let store = Store::new();
        let inst = store.save_instance(instance("demo")).unwrap();
        let parent = store.save_mission(mission("parent", inst.id)).unwrap();
        let child = store.save_mission(mission("child", inst.id)).unwrap();
        store
            .save_mission_relationship(MissionRelationship {
                id: 0,
                parent_id: parent.id,
                mission_id: child.id,
            })
            .unwrap();

        store.delete_mission(child.id).unwrap();
        assert!(store.mission_relationships().is_empty());
        assert!(store.missions().contains(parent.id));
    }

    #[test]
    fn delete_missing_row_is_not_found() {
        let store = Store::new();
        assert!(matches!(
            store.delete_mission(5),
            Err(StoreError::NotFound { entity: "mission", id: 5 })
        ));
    }
}

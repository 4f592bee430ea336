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

//! Conversion between request DTOs and domain entities.
//!
//! Create requests become unsaved entities (id 0, the store allocates on
//! save). Updates are applied field-by-field from a validated payload map.

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use super::models::{
    AccountCreateRequest, AuthTokenCreateRequest, InstanceCreateRequest, MissionCreateRequest,
    MissionRelationshipCreateRequest, OAuthLinkCreateRequest, OAuthPayload,
    ProgressionCreateRequest,
};
use crate::domain::{
    Account, AuthToken, Instance, Mission, MissionRelationship, OAuthLink, Progression,
};
use crate::projection::FieldMap;

impl From<AccountCreateRequest> for Account {
    fn from(request: AccountCreateRequest) -> Self {
        Account {
            id: 0,
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
            is_active: request.is_active,
            date_joined: Utc::now(),
        }
    }
}

impl From<OAuthLinkCreateRequest> for OAuthLink {
    fn from(request: OAuthLinkCreateRequest) -> Self {
        OAuthLink {
            id: 0,
            consumer: request.consumer,
            consumer_user_id: request.consumer_user_id,
            account_id: request.account,
        }
    }
}

impl From<AuthTokenCreateRequest> for AuthToken {
    fn from(request: AuthTokenCreateRequest) -> Self {
        AuthToken {
            id: 0,
            token: request
                .token
                .unwrap_or_else(|| Uuid::new_v4().simple().to_string()),
            account_id: request.account,
            created_at: Utc::now(),
        }
    }
}

impl From<InstanceCreateRequest> for Instance {
    fn from(request: InstanceCreateRequest) -> Self {
        Instance {
            id: 0,
            slug: request.slug,
            name: request.name,
            host: request.host,
        }
    }
}

impl From<MissionCreateRequest> for Mission {
    fn from(request: MissionCreateRequest) -> Self {
        Mission {
            id: 0,
            name: request.name,
            description: request.description,
            image: request.image,
            instance_id: request.instance,
        }
    }
}

impl From<MissionRelationshipCreateRequest> for MissionRelationship {
    fn from(request: MissionRelationshipCreateRequest) -> Self {
        MissionRelationship {
            id: 0,
            parent_id: request.parent,
            mission_id: request.mission,
        }
    }
}

impl From<ProgressionCreateRequest> for Progression {
    fn from(request: ProgressionCreateRequest) -> Self {
        Progression {
            id: 0,
            account_id: request.account,
            mission_id: request.mission,
            state: request.state,
            points: request.points,
        }
    }
}

/// Parse the `oauths` value of an account create request.
///
/// A single object yields one payload, an array yields one per element.
/// Any other shape is a validation error.
pub fn parse_oauth_payloads(value: &Value) -> Result<Vec<OAuthPayload>, String> {
    match value {
        Value::Object(_) => {
            let payload: OAuthPayload = serde_json::from_value(value.clone())
                .map_err(|e| format!("Invalid oauths entry: {e}"))?;
            Ok(vec![payload])
        }
        Value::Array(entries) => entries
            .iter()
            .map(|entry| {
                serde_json::from_value(entry.clone())
                    .map_err(|e| format!("Invalid oauths entry: {e}"))
            })
            .collect(),
        _ => Err("Field 'oauths' must be an object or an array of objects".to_string()),
    }
}

fn take_string(payload: &FieldMap, name: &str) -> Option<Result<String, String>> {
    payload.get(name).map(|value| match value.as_str() {
        Some(s) => Ok(s.to_string()),
        None => Err(format!("Field '{name}' must be a string")),
    })
}

fn take_bool(payload: &FieldMap, name: &str) -> Option<Result<bool, String>> {
    payload.get(name).map(|value| match value.as_bool() {
        Some(b) => Ok(b),
        None => Err(format!("Field '{name}' must be a boolean")),
    })
}

/// Apply a validated update payload to an account.
pub fn apply_account_update(account: &mut Account, payload: &FieldMap) -> Result<(), String> {
    if let Some(value) = take_string(payload, "username") {
        account.username = value?;
    }
    if let Some(value) = take_string(payload, "first_name") {
        account.first_name = value?;
    }
    if let Some(value) = take_string(payload, "last_name") {
        account.last_name = value?;
    }
    if let Some(value) = take_bool(payload, "is_active") {
        account.is_active = value?;
    }
    if payload.contains_key("date_joined") {
        return Err("Field 'date_joined' is not writable".to_string());
    }
    Ok(())
}

/// Apply a validated update payload to an instance.
pub fn apply_instance_update(instance: &mut Instance, payload: &FieldMap) -> Result<(), String> {
    if let Some(value) = take_string(payload, "slug") {
        instance.slug = value?;
    }
    if let Some(value) = take_string(payload, "name") {
        instance.name = value?;
    }
    if let Some(value) = take_string(payload, "host") {
        instance.host = value?;
    }
    Ok(())
}

/// Apply a validated update payload to a mission.
pub fn apply_mission_update(mission: &mut Mission, payload: &FieldMap) -> Result<(), String> {
    if let Some(value) = take_string(payload, "name") {
        mission.name = value?;
    }
    if let Some(value) = take_string(payload, "description") {
        mission.description = value?;
    }
    if let Some(value) = payload.get("image") {
        mission.image = match value {
            Value::Null => None,
            Value::String(path) => Some(path.clone()),
            _ => return Err("Field 'image' must be a string or null".to_string()),
        };
    }
    Ok(())
}

/// Apply a validated update payload to a progression.
pub fn apply_progression_update(
    progression: &mut Progression,
    payload: &FieldMap,
) -> Result<(), String> {
    if let Some(value) = take_string(payload, "state") {
        progression.state = value?;
    }
    if let Some(value) = payload.get("points") {
        progression.points = match value {
            Value::Null => None,
            Value::Number(n) => Some(
                n.as_i64()
                    .ok_or_else(|| "Field 'points' must be an integer".to_string())?,
            ),
            _ => return Err("Field 'points' must be an integer or null".to_string()),
        };
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn account_request_becomes_unsaved_entity() {
        let request: AccountCreateRequest =
            serde_json::from_value(json!({"username": "ariane", "email": "a@example.org"}))
                .unwrap();
        let account = Account::from(request);
        assert_eq!(account.id, 0);
        assert_eq!(account.username, "ariane");
        assert!(account.is_active);
    }

    #[test]
    fn missing_token_is_generated() {
        let request = AuthTokenCreateRequest {
            account: 1,
            token: None,
        };
        let token = AuthToken::from(request);
        assert_eq!(token.token.len(), 32);
    }

    #[test]
    fn oauths_object_yields_one_payload() {
        let value = json!({"consumer": "github", "consumer_user_id": "42"});
        let payloads = parse_oauth_payloads(&value).unwrap();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].consumer, "github");
    }

    #[test]
    fn oauths_array_yields_many_payloads() {
        let value = json!([
            {"consumer": "github", "consumer_user_id": "42"},
            {"consumer": "twitter", "consumer_user_id": "jquest"}
        ]);
        let payloads = parse_oauth_payloads(&value).unwrap();
        assert_eq!(payloads.len(), 2);
    }

    #[test]
    fn oauths_scalar_is_rejected() {
        assert!(parse_oauth_payloads(&json!("github")).is_err());
        assert!(parse_oauth_payloads(&json!(42)).is_err());
        assert!(parse_oauth_payloads(&json!([{"consumer": "github"}])).is_err());
    }

    #[test]
    fn account_update_applies_known_fields() {
        let mut account = Account {
            id: 1,
            username: "old".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: String::new(),
            is_active: true,
            date_joined: Utc::now(),
        };
        let payload = json!({"username": "new", "is_active": false});
        let payload = payload.as_object().unwrap();
        apply_account_update(&mut account, payload).unwrap();
        assert_eq!(account.username, "new");
        assert!(!account.is_active);
    }

    #[test]
    fn progression_points_accepts_null() {
        let mut progression = Progression {
            id: 1,
            account_id: 1,
            mission_id: 1,
            state: "started".to_string(),
            points: Some(10),
        };
        let payload = json!({"points": null});
        apply_progression_update(&mut progression, payload.as_object().unwrap()).unwrap();
        assert!(progression.points.is_none());
    }

    #[test]
    fn type_mismatch_is_an_error() {
        let mut mission = Mission {
            id: 1,
            name: "intro".to_string(),
            description: String::new(),
            image: None,
            instance_id: 1,
        };
        let payload = json!({"image": 42});
        assert!(apply_mission_update(&mut mission, payload.as_object().unwrap()).is_err());
    }
}

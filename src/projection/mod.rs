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

//! Resource projection layer.
//!
//! Given a domain object and a request context, a [`ResourceSpec`]
//! produces a serializable field-name -> value mapping. A base set of
//! fields is always projected; an additional-detail set is projected only
//! when the request is a detail request.
//!
//! ## Detail classification
//!
//! A request is a detail request iff the canonical single-object URI of
//! the projected object equals the request path — an exact string
//! comparison, never a result-count heuristic. Listing exactly one object
//! is still a list request.
//!
//! ## Overrides
//!
//! Each field value is produced in two steps: the field's extractor runs
//! first, its output is inserted into the in-progress mapping, then an
//! optional per-field override replaces it. Overrides are registered in an
//! explicit table at spec-construction time and receive the in-progress
//! mapping so they can reference sibling fields.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::{Entity, Id, SchemaField};
use crate::store::Store;

/// A projected object: field name -> JSON value.
pub type FieldMap = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("{entity} '{id}' referenced during projection does not exist")]
    MissingRelation { entity: &'static str, id: Id },

    #[error("failed to serialize {entity} for projection: {source}")]
    Serialize {
        entity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("field '{field}' is not present on the serialized object")]
    MissingField { field: &'static str },
}

/// Request-scoped transport facts the projection needs: the path drives
/// detail classification, the host anchors absolute URL construction.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub host: &'a str,
    pub scheme: &'a str,
}

impl<'a> RequestContext<'a> {
    pub fn new(path: &'a str, host: &'a str) -> Self {
        Self {
            path,
            host,
            scheme: "http",
        }
    }

    /// Rewrite a site-relative path to an absolute URL anchored at the
    /// request host. Already-absolute URLs pass through unchanged.
    pub fn absolute_uri(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}://{}{}", self.scheme, self.host, path)
        } else {
            format!("{}://{}/{}", self.scheme, self.host, path)
        }
    }
}

/// The (api name, resource name) pair a related extractor is bound to, so
/// nested object references resolve to URIs under the owning resource's
/// namespace.
#[derive(Debug, Clone, Copy)]
pub struct Namespace {
    pub api_name: &'static str,
    pub resource_name: &'static str,
}

impl Namespace {
    /// Canonical single-object URI for this resource.
    pub fn resource_uri(&self, id: Id) -> String {
        format!("/api/{}/{}/{}", self.api_name, self.resource_name, id)
    }

    /// Canonical URI of a related resource under the same api namespace.
    pub fn related_uri(&self, resource_name: &str, id: Id) -> String {
        format!("/api/{}/{}/{}", self.api_name, resource_name, id)
    }
}

/// Everything an extractor may consult: the request, the bound namespace
/// and the read side of the persistence collaborator.
pub struct ProjectionEnv<'a> {
    pub ctx: &'a RequestContext<'a>,
    pub ns: Namespace,
    pub store: &'a Store,
}

/// Marks whether a field is a plain value copy or derives from related
/// objects. Related fields resolve URIs through the bound [`Namespace`]
/// and are never writable through update payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Plain,
    Related,
}

pub type ExtractFn<T> =
    Arc<dyn Fn(&T, &FieldMap, &ProjectionEnv) -> Result<Value, ProjectionError> + Send + Sync>;

/// Override functions receive the in-progress output mapping (raw value
/// already inserted) and replace the field's value.
pub type DehydrateFn<T> =
    Arc<dyn Fn(&T, &FieldMap, &ProjectionEnv) -> Result<Value, ProjectionError> + Send + Sync>;

pub struct FieldDef<T> {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Blank-allowed marker propagated from the entity schema.
    pub blank: bool,
    extract: ExtractFn<T>,
}

/// Declared filter semantics for a publishable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Exact match on the object's own field.
    Exact,
    /// Exact match on the foreign key, or on a field of the related
    /// object via `name__field=value`.
    Related,
}

/// Resolves a related object (serialized) for `Related` filters.
pub type ResolveFn = fn(&Store, Id) -> Option<Value>;

/// Resolves the serialized objects on the many side of a reverse
/// relationship, keyed by the owning object's id.
pub type ResolveManyFn = fn(&Store, Id) -> Vec<Value>;

pub struct FilterDef {
    pub name: &'static str,
    pub kind: FilterKind,
    resolve: Option<ResolveFn>,
    resolve_many: Option<ResolveManyFn>,
}

/// Declarative projection spec for one resource type.
pub struct ResourceSpec<T: Entity> {
    api_name: &'static str,
    resource_name: &'static str,
    always_return_data: bool,
    base_fields: Vec<FieldDef<T>>,
    detail_fields: Vec<FieldDef<T>>,
    overrides: IndexMap<&'static str, DehydrateFn<T>>,
    filters: Vec<FilterDef>,
}

impl<T: Entity> ResourceSpec<T> {
    /// Build a spec from the entity's static schema. Every schema field
    /// not listed in `excludes` becomes a plain base field copying the
    /// serialized value, plus the implicit `resource_uri` field.
    ///
    /// Default construction ignores the schema's `blank` marker; the
    /// `propagate_blank` hook runs once afterwards and patches the flag
    /// onto matching descriptors.
    pub fn from_schema(
        api_name: &'static str,
        resource_name: &'static str,
        excludes: &[&str],
    ) -> Self {
        let mut base_fields: Vec<FieldDef<T>> = Vec::new();

        base_fields.push(FieldDef {
            name: "resource_uri",
            kind: FieldKind::Related,
            blank: false,
            extract: Arc::new(|obj, _raw, env| Ok(Value::String(env.ns.resource_uri(obj.id())))),
        });

        for schema_field in T::schema() {
            if excludes.contains(&schema_field.name) {
                continue;
            }
            let name = schema_field.name;
            base_fields.push(FieldDef {
                name,
                kind: FieldKind::Plain,
                blank: false,
                extract: Arc::new(move |_obj, raw, _env| {
                    raw.get(name)
                        .cloned()
                        .ok_or(ProjectionError::MissingField { field: name })
                }),
            });
        }

        propagate_blank(T::schema(), &mut base_fields);

        Self {
            api_name,
            resource_name,
            always_return_data: false,
            base_fields,
            detail_fields: Vec::new(),
            overrides: IndexMap::new(),
            filters: Vec::new(),
        }
    }

    pub fn with_base_field(mut self, name: &'static str, kind: FieldKind, extract: ExtractFn<T>) -> Self {
        self.base_fields.push(FieldDef {
            name,
            kind,
            blank: false,
            extract,
        });
        self
    }

    /// Register an additional-detail field, projected only on detail
    /// requests.
    pub fn with_detail_field(
        mut self,
        name: &'static str,
        kind: FieldKind,
        extract: ExtractFn<T>,
    ) -> Self {
        self.detail_fields.push(FieldDef {
            name,
            kind,
            blank: false,
            extract,
        });
        self
    }

    /// Register a per-field override. Replaces the convention-based
    /// `dehydrate_<field>` name lookup with an explicit table.
    pub fn with_override(mut self, name: &'static str, dehydrate: DehydrateFn<T>) -> Self {
        self.overrides.insert(name, dehydrate);
        self
    }

    pub fn with_filter(mut self, name: &'static str, kind: FilterKind) -> Self {
        self.filters.push(FilterDef {
            name,
            kind,
            resolve: None,
            resolve_many: None,
        });
        self
    }

    /// Declare a relationship filter with a resolver for `name__field`
    /// lookups across the relationship.
    pub fn with_related_filter(mut self, name: &'static str, resolve: ResolveFn) -> Self {
        self.filters.push(FilterDef {
            name,
            kind: FilterKind::Related,
            resolve: Some(resolve),
            resolve_many: None,
        });
        self
    }

    /// Declare a reverse-relationship filter: the related objects hang
    /// off this resource, so `name=id` and `name__field=value` match when
    /// any of them does.
    pub fn with_reverse_filter(mut self, name: &'static str, resolve: ResolveManyFn) -> Self {
        self.filters.push(FilterDef {
            name,
            kind: FilterKind::Related,
            resolve: None,
            resolve_many: Some(resolve),
        });
        self
    }

    pub fn returning_full_data(mut self) -> Self {
        self.always_return_data = true;
        self
    }

    pub fn api_name(&self) -> &'static str {
        self.api_name
    }

    pub fn resource_name(&self) -> &'static str {
        self.resource_name
    }

    /// Whether writes echo the full projected object back to the caller.
    pub fn always_return_data(&self) -> bool {
        self.always_return_data
    }

    pub fn namespace(&self) -> Namespace {
        Namespace {
            api_name: self.api_name,
            resource_name: self.resource_name,
        }
    }

    /// Canonical single-object URI for an id under this resource.
    pub fn resource_uri(&self, id: Id) -> String {
        self.namespace().resource_uri(id)
    }

    /// Look up a field descriptor by name (base fields only).
    pub fn field(&self, name: &str) -> Option<&FieldDef<T>> {
        self.base_fields.iter().find(|f| f.name == name)
    }

    /// Detail iff the object's canonical URI equals the request path.
    pub fn is_detail(&self, obj: &T, ctx: &RequestContext) -> bool {
        self.resource_uri(obj.id()) == ctx.path
    }

    /// Project `obj` into a field mapping for the given request.
    pub fn project(
        &self,
        obj: &T,
        ctx: &RequestContext,
        store: &Store,
    ) -> Result<FieldMap, ProjectionError> {
        let raw = serialize_entity(obj)?;
        // Bind this resource's namespace before any related extractor runs
        let env = ProjectionEnv {
            ctx,
            ns: self.namespace(),
            store,
        };

        let mut data = FieldMap::new();
        for field in &self.base_fields {
            self.apply_field(obj, &raw, field, &env, &mut data)?;
        }
        if self.is_detail(obj, ctx) {
            for field in &self.detail_fields {
                self.apply_field(obj, &raw, field, &env, &mut data)?;
            }
        }
        Ok(data)
    }

    fn apply_field(
        &self,
        obj: &T,
        raw: &FieldMap,
        field: &FieldDef<T>,
        env: &ProjectionEnv,
        data: &mut FieldMap,
    ) -> Result<(), ProjectionError> {
        let value = (field.extract)(obj, raw, env)?;
        data.insert(field.name.to_string(), value);

        if let Some(dehydrate) = self.overrides.get(field.name) {
            let replaced = dehydrate(obj, data, env)?;
            data.insert(field.name.to_string(), replaced);
        }
        Ok(())
    }

    /// Validate an update payload against the field descriptors: only
    /// plain published fields are writable, `id` is immutable, and a
    /// non-blank field may not be nulled or emptied.
    pub fn validate_payload(&self, payload: &FieldMap) -> Result<(), String> {
        for (key, value) in payload {
            let field = self
                .field(key)
                .ok_or_else(|| format!("unknown field '{key}' for {}", self.resource_name))?;
            if field.kind == FieldKind::Related || field.name == "id" {
                return Err(format!("field '{key}' is not writable"));
            }
            let is_blanked = value.is_null() || matches!(value, Value::String(s) if s.is_empty());
            if is_blanked && !field.blank {
                return Err(format!("field '{key}' may not be blank"));
            }
        }
        Ok(())
    }

    /// Check an object against declared query-string filters.
    ///
    /// `Exact` filters compare the object's own serialized field;
    /// `Related` filters compare the foreign key (`name=id`) or a field
    /// of the related object (`name__field=value`).
    pub fn matches_filters(
        &self,
        obj: &T,
        params: &HashMap<String, String>,
        store: &Store,
    ) -> Result<bool, String> {
        if params.is_empty() {
            return Ok(true);
        }
        let raw = serialize_entity(obj).map_err(|e| e.to_string())?;

        for (key, expected) in params {
            let (name, related_field) = match key.split_once("__") {
                Some((name, sub)) => (name, Some(sub)),
                None => (key.as_str(), None),
            };
            let filter = self
                .filters
                .iter()
                .find(|f| f.name == name)
                .ok_or_else(|| format!("unsupported filter '{key}' for {}", self.resource_name))?;

            let matched = match (filter.kind, related_field) {
                (FilterKind::Exact, None) => raw
                    .get(name)
                    .map(|v| value_matches(v, expected))
                    .unwrap_or(false),
                (FilterKind::Exact, Some(_)) => {
                    return Err(format!("filter '{name}' does not span relationships"));
                }
                (FilterKind::Related, sub) => {
                    if let Some(resolve_many) = filter.resolve_many {
                        let target = sub.unwrap_or("id");
                        resolve_many(store, obj.id()).iter().any(|related| {
                            related
                                .get(target)
                                .map(|v| value_matches(v, expected))
                                .unwrap_or(false)
                        })
                    } else {
                        let fk_field = format!("{name}_id");
                        let fk = raw.get(&fk_field).and_then(Value::as_i64);
                        match (fk, sub) {
                            (Some(fk), None) => value_matches(&Value::from(fk), expected),
                            (Some(fk), Some(sub)) => {
                                let resolve = filter.resolve.ok_or_else(|| {
                                    format!("filter '{name}' does not span relationships")
                                })?;
                                resolve(store, fk)
                                    .as_ref()
                                    .and_then(|related| related.get(sub))
                                    .map(|v| value_matches(v, expected))
                                    .unwrap_or(false)
                            }
                            (None, _) => false,
                        }
                    }
                }
            };
            if !matched {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Post-construction hook: default field construction ignores the
/// schema's blank marker, so re-scan the schema and patch matching
/// descriptors' optionality flag.
fn propagate_blank<T>(schema: &'static [SchemaField], fields: &mut [FieldDef<T>]) {
    for schema_field in schema {
        if !schema_field.blank {
            continue;
        }
        if let Some(field) = fields.iter_mut().find(|f| f.name == schema_field.name) {
            field.blank = true;
        }
    }
}

fn serialize_entity<T: Entity>(obj: &T) -> Result<FieldMap, ProjectionError> {
    match serde_json::to_value(obj) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ProjectionError::MissingField { field: "id" }),
        Err(source) => Err(ProjectionError::Serialize {
            entity: T::NAME,
            source,
        }),
    }
}

/// Compare a serialized JSON value against a query-string literal.
fn value_matches(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Number(n) => n.to_string() == expected,
        Value::Bool(b) => b.to_string() == expected,
        Value::Null => expected.is_empty() || expected == "null",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mission;

    fn sample_spec() -> ResourceSpec<Mission> {
        ResourceSpec::<Mission>::from_schema("v1", "mission", &["instance_id"])
    }

    #[test]
    fn from_schema_publishes_resource_uri_first() {
        let spec = sample_spec();
        assert_eq!(spec.base_fields[0].name, "resource_uri");
        assert_eq!(spec.base_fields[0].kind, FieldKind::Related);
    }

    #[test]
    fn from_schema_honors_excludes() {
        let spec = sample_spec();
        assert!(spec.field("instance_id").is_none());
        assert!(spec.field("name").is_some());
    }

    #[test]
    fn blank_flag_propagates_from_schema() {
        let spec = sample_spec();
        // Default construction leaves blank=false; the hook patches it
        assert!(spec.field("image").map(|f| f.blank).unwrap_or(false));
        assert!(spec.field("description").map(|f| f.blank).unwrap_or(false));
        assert!(!spec.field("name").map(|f| f.blank).unwrap_or(true));
    }

    #[test]
    fn validate_payload_rejects_blanking_required_field() {
        let spec = sample_spec();
        let mut payload = FieldMap::new();
        payload.insert("name".to_string(), Value::Null);
        assert!(spec.validate_payload(&payload).is_err());

        let mut ok = FieldMap::new();
        ok.insert("description".to_string(), Value::String(String::new()));
        assert!(spec.validate_payload(&ok).is_ok());
    }

    #[test]
    fn validate_payload_rejects_unknown_and_readonly_fields() {
        let spec = sample_spec();
        let mut unknown = FieldMap::new();
        unknown.insert("bogus".to_string(), Value::Bool(true));
        assert!(spec.validate_payload(&unknown).is_err());

        let mut readonly = FieldMap::new();
        readonly.insert("resource_uri".to_string(), Value::String("/x".into()));
        assert!(spec.validate_payload(&readonly).is_err());
    }

    #[test]
    fn absolute_uri_anchors_at_request_host() {
        let ctx = RequestContext::new("/api/v1/mission", "api.example.com");
        assert_eq!(
            ctx.absolute_uri("/img/x.png"),
            "http://api.example.com/img/x.png"
        );
        assert_eq!(
            ctx.absolute_uri("https://cdn.example.com/x.png"),
            "https://cdn.example.com/x.png"
        );
    }

    #[test]
    fn value_matches_compares_scalar_forms() {
        assert!(value_matches(&Value::from("demo"), "demo"));
        assert!(value_matches(&Value::from(42), "42"));
        assert!(value_matches(&Value::from(true), "true"));
        assert!(!value_matches(&Value::from(42), "41"));
    }
}

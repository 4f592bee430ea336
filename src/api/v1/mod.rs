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

//! API Version 1 (v1) implementation.
//!
//! All v1 endpoints live under the `/api/v1/` prefix. Each resource
//! publishes the same surface:
//!
//! - `GET /api/v1/{resource}` - List, with optional query-string filters
//! - `POST /api/v1/{resource}` - Create
//! - `GET /api/v1/{resource}/{id}` - Detail projection
//! - `DELETE /api/v1/{resource}/{id}` - Delete (cascades to owned records)
//!
//! Accounts, instances, missions and progressions additionally accept
//! `PUT /api/v1/{resource}/{id}` updates.

pub mod handlers;
pub mod openapi;
pub mod routes;

pub use handlers::*;
pub use openapi::ApiDocV1;
pub use routes::build_v1_router;

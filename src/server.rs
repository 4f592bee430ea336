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

use anyhow::Result;
use axum::{extract::Extension, middleware, routing::get, Router};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api::resources::Resources;
use crate::auth::require_basic_auth;
use crate::config::{AuthSettings, SeedConfig, ServerConfig};
use crate::domain::{Instance, Mission, MissionRelationship};
use crate::load_config_file;
use crate::store::Store;

pub struct QuestlineServer {
    config: ServerConfig,
}

impl QuestlineServer {
    /// Create a server from a configuration file.
    pub fn new(config_path: PathBuf, port: Option<u16>) -> Result<Self> {
        let mut config = load_config_file(&config_path)?;
        if let Some(port) = port {
            config.server.port = port;
        }
        Ok(Self::from_config(config))
    }

    /// Create a server from an already-validated configuration.
    pub fn from_config(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Seed the store, bind, and serve until interrupted.
    pub async fn run(self) -> Result<()> {
        let store = Arc::new(Store::new());
        seed_store(&store, &self.config.seed)?;
        if !self.config.seed.instances.is_empty() {
            info!(
                "Seeded {} instance(s), {} mission(s), {} relationship(s)",
                store.instances().len(),
                store.missions().len(),
                store.mission_relationships().len()
            );
        }

        let resources = Arc::new(Resources::new());
        let auth = Arc::new(self.config.server.auth.clone());
        let app = build_app_router(store, resources, auth);

        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Questline server listening on {addr}");
        info!(
            "Swagger UI available at http://{addr}/api/v1/docs/"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

/// Load configured seed records through the same save paths the API uses,
/// so referential integrity holds for seeded data too.
pub fn seed_store(store: &Store, seed: &SeedConfig) -> Result<()> {
    for instance in &seed.instances {
        store.save_instance(Instance {
            id: instance.id,
            slug: instance.slug.clone(),
            name: instance.name.clone(),
            host: instance.host.clone(),
        })?;
    }
    for mission in &seed.missions {
        store.save_mission(Mission {
            id: mission.id,
            name: mission.name.clone(),
            description: mission.description.clone(),
            image: mission.image.clone(),
            instance_id: mission.instance,
        })?;
    }
    for rel in &seed.mission_relationships {
        store.save_mission_relationship(MissionRelationship {
            id: 0,
            parent_id: rel.parent,
            mission_id: rel.mission,
        })?;
    }
    Ok(())
}

/// Assemble the full application router: protected v1 resources plus the
/// open health, version and docs endpoints.
pub fn build_app_router(
    store: Arc<Store>,
    resources: Arc<Resources>,
    auth: Arc<AuthSettings>,
) -> Router {
    let v1_router = api::build_v1_router(store, resources)
        .layer(middleware::from_fn(require_basic_auth))
        .layer(Extension(auth));

    Router::new()
        .route("/health", get(api::health_check))
        .route("/api/versions", get(api::list_api_versions))
        .nest("/api/v1", v1_router)
        .merge(
            SwaggerUi::new("/api/v1/docs")
                .url("/api/v1/openapi.json", api::ApiDocV1::openapi()),
        )
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InstanceSeed, MissionSeed, RelationshipSeed};

    fn sample_seed() -> SeedConfig {
        SeedConfig {
            instances: vec![InstanceSeed {
                id: 1,
                slug: "jquest".to_string(),
                name: "JQuest".to_string(),
                host: String::new(),
            }],
            missions: vec![
                MissionSeed {
                    id: 1,
                    name: "First steps".to_string(),
                    description: String::new(),
                    image: None,
                    instance: 1,
                },
                MissionSeed {
                    id: 2,
                    name: "Deep dive".to_string(),
                    description: String::new(),
                    image: None,
                    instance: 1,
                },
            ],
            mission_relationships: vec![RelationshipSeed {
                parent: 1,
                mission: 2,
            }],
        }
    }

    #[test]
    fn seed_populates_store_in_order() {
        let store = Store::new();
        seed_store(&store, &sample_seed()).unwrap();
        assert_eq!(store.instances().len(), 1);
        assert_eq!(store.missions().len(), 2);
        assert_eq!(store.mission_relationships().len(), 1);
    }

    #[test]
    fn seeded_ids_do_not_collide_with_allocation() {
        let store = Store::new();
        seed_store(&store, &sample_seed()).unwrap();
        let created = store
            .save_mission(Mission {
                id: 0,
                name: "Fresh".to_string(),
                description: String::new(),
                image: None,
                instance_id: 1,
            })
            .unwrap();
        assert_eq!(created.id, 3);
    }
}

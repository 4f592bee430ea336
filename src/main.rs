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

// Allow println! in main.rs for CLI user-facing output (validate command)
#![allow(clippy::print_stdout)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use questline_server::{load_config_file, QuestlineServer};

#[derive(Parser)]
#[command(name = "questline-server")]
#[command(about = "REST resource server for the Questline gamified learning platform")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config/server.yaml", global = true)]
    config: PathBuf,

    /// Override the server port
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the server (default if no subcommand specified)
    Run {
        /// Path to the configuration file
        #[arg(short, long, default_value = "config/server.yaml")]
        config: PathBuf,

        /// Override the server port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Validate a configuration file without starting the server
    Validate {
        /// Path to the configuration file to validate
        #[arg(short, long, default_value = "config/server.yaml")]
        config: PathBuf,

        /// Show resolved configuration with environment variables expanded
        #[arg(long)]
        show_resolved: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Validate {
            config,
            show_resolved,
        }) => validate_config(config, show_resolved),
        Some(Commands::Run { config, port }) => run_server(config, port).await,
        None => run_server(cli.config, cli.port).await,
    }
}

async fn run_server(config_path: PathBuf, port: Option<u16>) -> Result<()> {
    let mut config = load_config_file(&config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.server.log_level),
    )
    .init();

    info!("Loaded configuration from {}", config_path.display());

    QuestlineServer::from_config(config).run().await
}

fn validate_config(config_path: PathBuf, show_resolved: bool) -> Result<()> {
    match load_config_file(&config_path) {
        Ok(config) => {
            println!("Configuration file '{}' is valid", config_path.display());
            println!(
                "  server: {}:{} (log level {})",
                config.server.host, config.server.port, config.server.log_level
            );
            println!(
                "  seed: {} instance(s), {} mission(s), {} relationship(s)",
                config.seed.instances.len(),
                config.seed.missions.len(),
                config.seed.mission_relationships.len()
            );
            if show_resolved {
                println!("{}", serde_yaml::to_string(&config)?);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("Configuration file '{}' is invalid:", config_path.display());
            eprintln!("  {e}");
            std::process::exit(1);
        }
    }
}

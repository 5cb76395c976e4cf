//! Cache Hunt - Unified CLI
//!
//! Scavenger hunt game server with migration tooling.

#![warn(missing_docs)]

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use cache_hunt::{HuntService, ServerConfig, SqliteRepository, router};
use clap::Parser;
use cli::{Cli, Command};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,cache_hunt=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
        } => {
            let config = load_config(config)?.with_overrides(host, port, db_path)?;
            run_http_server(config).await
        }
        Command::Migrate { config, db_path } => {
            let config = load_config(config)?.with_overrides(None, None, db_path)?;
            migrate(&config).map(|_| ())
        }
    }
}

/// Layers the config file, if any, under the environment.
#[instrument]
fn load_config(path: Option<PathBuf>) -> Result<ServerConfig> {
    let base = match path {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    Ok(base.with_env(|key| std::env::var(key).ok())?)
}

/// Opens the database and applies pending migrations.
#[instrument(skip(config), fields(db_path = %config.db_path()))]
fn migrate(config: &ServerConfig) -> Result<SqliteRepository> {
    let repository = SqliteRepository::new(config.db_path().clone())?;
    repository.run_migrations()?;
    Ok(repository)
}

/// Run the HTTP game server
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
async fn run_http_server(config: ServerConfig) -> Result<()> {
    let repository = migrate(&config)?;
    let service = HuntService::with_limits(repository, config.page_limits());
    let app = router(service);

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());

    axum::serve(listener, app).await?;
    Ok(())
}

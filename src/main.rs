//! Ping Pong Server - Unified CLI
//!
//! Serves the game client and records match results, or prints the
//! leaderboard from an existing database.

#![warn(missing_docs)]

mod cli;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use pingpong_server::{AppState, GameRepository, ServerConfig, StatsService, leaderboard, router};
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            port,
            host,
            db_path,
            static_dir,
        } => {
            let config = ServerConfig::load_or_default(&config)?
                .with_overrides(host, port, db_path, static_dir);
            run_http_server(config).await
        }
        Command::Leaderboard { db_path, json } => print_leaderboard(db_path, json),
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pingpong_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the HTTP server until Ctrl+C
#[instrument(skip_all, fields(addr = %config.bind_addr(), db = %config.database_path()))]
async fn run_http_server(config: ServerConfig) -> Result<()> {
    let repository = GameRepository::new(config.database_path().clone())?;
    repository.run_migrations()?;

    let index = config.static_dir().join("index.html");
    if !index.exists() {
        warn!(path = %index.display(), "Game client page not found; GET / will return 404");
    }

    let state = AppState::new(StatsService::new(repository), config.static_dir());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("✅ Ping Pong server running at http://{}/", config.bind_addr());
    info!("🏆 Leaderboard at http://{}/leaderboard", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Print the leaderboard as a table or JSON
#[instrument]
fn print_leaderboard(db_path: String, json: bool) -> Result<()> {
    if !PathBuf::from(&db_path).exists() {
        anyhow::bail!("Database '{}' does not exist", db_path);
    }

    let service = StatsService::new(GameRepository::new(db_path)?);
    if json {
        let entries = service.leaderboard()?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        let players = service.ranked_players()?;
        print!("{}", leaderboard::render_text(&players));
    }
    Ok(())
}

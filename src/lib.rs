//! Ping-pong match results and leaderboard backend.
//!
//! The browser game posts finished matches to the server, which stores them
//! in SQLite and keeps per-player win, loss, and sats totals. Rankings are
//! served as JSON and as an HTML page.
//!
//! # Architecture
//!
//! - **Db**: Diesel models and a [`GameRepository`] that opens one connection per operation
//! - **Submission**: the loosely-typed match payload sent by the game client
//! - **Service**: [`StatsService`] turning submissions into records and players into rankings
//! - **Server**: the axum [`router`] and its handlers
//!
//! # Example
//!
//! ```no_run
//! use pingpong_server::{AppState, GameRepository, StatsService, router};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let repository = GameRepository::new("db.sqlite".to_string())?;
//! repository.run_migrations()?;
//!
//! let app = router(AppState::new(StatsService::new(repository), "static"));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod db;
pub mod leaderboard;
mod server;
mod stats_service;
mod submission;

pub use config::{ConfigError, ServerConfig};

pub use db::{DbError, DbErrorKind, GameRepository, Match, NewMatch, NewPlayer, Player};

pub use leaderboard::LeaderboardEntry;

pub use server::{
    AppState, EndMatchResponse, ErrorPayload, HandlerError, LeaderboardResponse, MatchSaved,
    router,
};

pub use stats_service::StatsService;

pub use submission::{
    DEFAULT_PLAYER1_ID, DEFAULT_PLAYER1_NAME, DEFAULT_PLAYER2_ID, DEFAULT_PLAYER2_NAME,
    MatchSubmission,
};

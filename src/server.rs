//! HTTP routes for the game client, match ingestion, and the leaderboard.

use std::path::{Path, PathBuf};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{debug, error, info, instrument};

use crate::leaderboard::{render_error_html, render_html};
use crate::{DbError, LeaderboardEntry, MatchSubmission, StatsService};

/// Shared state handed to every request handler.
#[derive(Debug, Clone, Getters)]
pub struct AppState {
    service: StatsService,
    static_dir: PathBuf,
}

impl AppState {
    /// Creates handler state serving client assets from `static_dir`.
    #[instrument(skip(service, static_dir), fields(static_dir = %static_dir.as_ref().display()))]
    pub fn new(service: StatsService, static_dir: impl AsRef<Path>) -> Self {
        Self {
            service,
            static_dir: static_dir.as_ref().to_path_buf(),
        }
    }
}

/// Failure while handling a request, reported back as an error payload.
#[derive(Debug, Display, Error, From)]
pub enum HandlerError {
    /// The request body was not a usable match object.
    #[display("Invalid match payload: {_0}")]
    Payload(serde_json::Error),
    /// The database operation failed.
    #[display("{_0}")]
    Database(DbError),
    /// The blocking database task panicked or was cancelled.
    #[display("Database task failed: {_0}")]
    Task(tokio::task::JoinError),
}

impl HandlerError {
    /// Description safe to send to clients.
    ///
    /// Database failures report their kind and message but not the source
    /// location recorded in [`DbError`].
    pub fn client_details(&self) -> String {
        match self {
            Self::Database(e) => format!("Database {} error: {}", e.kind, e.message),
            other => other.to_string(),
        }
    }
}

/// Body returned when a handler fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ErrorPayload {
    error: String,
    details: String,
}

impl ErrorPayload {
    /// Creates a payload with a fixed summary and the error's description.
    pub fn new(error: &str, cause: &HandlerError) -> Self {
        Self {
            error: error.to_string(),
            details: cause.client_details(),
        }
    }
}

/// Body returned after a match is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MatchSaved {
    message: String,
    match_id: i64,
}

/// Response of `POST /api/match/end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EndMatchResponse {
    /// The match was recorded.
    Saved(MatchSaved),
    /// Something went wrong.
    Failed(ErrorPayload),
}

/// Response of `GET /api/leaderboard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeaderboardResponse {
    /// Players ranked by wins.
    Entries(Vec<LeaderboardEntry>),
    /// Something went wrong.
    Failed(ErrorPayload),
}

/// Builds the application router.
#[instrument(skip(state))]
pub fn router(state: AppState) -> Router {
    let index = state.static_dir.join("index.html");
    let assets = state.static_dir.clone();
    debug!(index = %index.display(), "Building router");

    Router::new()
        .route_service("/", ServeFile::new(index))
        .route("/api/match/end", post(end_match))
        .route("/api/leaderboard", get(leaderboard_json))
        .route("/leaderboard", get(leaderboard_page))
        .nest_service("/static", ServeDir::new(assets))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs a synchronous database call on the blocking thread pool.
async fn run_blocking<T, F>(work: F) -> Result<T, HandlerError>
where
    F: FnOnce() -> Result<T, DbError> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(work).await??)
}

#[instrument(skip(state, body), fields(bytes = body.len()))]
async fn end_match(State(state): State<AppState>, body: Bytes) -> Json<EndMatchResponse> {
    match save_match(&state, &body).await {
        Ok(match_id) => {
            info!(match_id, "Match saved");
            Json(EndMatchResponse::Saved(MatchSaved {
                message: "Match saved".to_string(),
                match_id,
            }))
        }
        Err(e) => {
            error!(error = %e, "Error saving match");
            Json(EndMatchResponse::Failed(ErrorPayload::new(
                "Failed to save match",
                &e,
            )))
        }
    }
}

async fn save_match(state: &AppState, body: &[u8]) -> Result<i64, HandlerError> {
    let submission = MatchSubmission::from_json(body)?;
    let service = state.service.clone();
    let saved = run_blocking(move || service.submit_match(&submission)).await?;
    Ok(*saved.id())
}

#[instrument(skip(state))]
async fn leaderboard_json(State(state): State<AppState>) -> Json<LeaderboardResponse> {
    let service = state.service.clone();
    match run_blocking(move || service.leaderboard()).await {
        Ok(entries) => Json(LeaderboardResponse::Entries(entries)),
        Err(e) => {
            error!(error = %e, "Error fetching leaderboard");
            Json(LeaderboardResponse::Failed(ErrorPayload::new(
                "Failed to fetch leaderboard",
                &e,
            )))
        }
    }
}

#[instrument(skip(state))]
async fn leaderboard_page(State(state): State<AppState>) -> Response {
    let service = state.service.clone();
    match run_blocking(move || service.ranked_players()).await {
        Ok(players) => Html(render_html(&players)).into_response(),
        Err(e) => {
            error!(error = %e, "Error rendering leaderboard page");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_html(&e.client_details())),
            )
                .into_response()
        }
    }
}

//! Tests for the HTTP routes, driven through the router without a socket.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use tempfile::{NamedTempFile, TempDir};
use tower::ServiceExt;

use pingpong_server::{
    AppState, EndMatchResponse, GameRepository, LeaderboardEntry, LeaderboardResponse,
    MatchSubmission, StatsService, router,
};

/// Test fixture keeping the temporary database and asset directory alive.
struct TestApp {
    _db: NamedTempFile,
    static_dir: TempDir,
    repo: GameRepository,
}

impl TestApp {
    fn new() -> Self {
        let db = NamedTempFile::new().expect("Failed to create temp file");
        let repo = GameRepository::new(db.path().to_str().expect("Invalid path").to_string())
            .expect("Failed to create repository");
        repo.run_migrations().expect("Migrations failed");

        let static_dir = TempDir::new().expect("Failed to create static dir");
        std::fs::write(
            static_dir.path().join("index.html"),
            "<html><body>pong</body></html>",
        )
        .expect("Failed to write index");

        Self {
            _db: db,
            static_dir,
            repo,
        }
    }

    fn router(&self) -> Router {
        router(AppState::new(
            StatsService::new(self.repo.clone()),
            self.static_dir.path(),
        ))
    }

    async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        (status, String::from_utf8(bytes.to_vec()).expect("utf8"))
    }

    async fn post_match(&self, body: impl Into<String>) -> (StatusCode, EndMatchResponse) {
        let request = Request::post("/api/match/end")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.into()))
            .expect("request");
        let response = self.router().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let (status, body) = self.get("/api/leaderboard").await;
        assert_eq!(status, StatusCode::OK);
        match serde_json::from_str(&body).expect("json") {
            LeaderboardResponse::Entries(entries) => entries,
            LeaderboardResponse::Failed(e) => panic!("leaderboard failed: {:?}", e),
        }
    }
}

fn submission_json(sub: &MatchSubmission) -> String {
    serde_json::to_string(sub).expect("serialize")
}

#[tokio::test]
async fn test_index_serves_game_client() {
    let app = TestApp::new();
    let (status, body) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("pong"));
}

#[tokio::test]
async fn test_static_assets_served() {
    let app = TestApp::new();
    std::fs::write(app.static_dir.path().join("app.js"), "console.log('hi');")
        .expect("Failed to write asset");
    let (status, body) = app.get("/static/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("console.log"));
}

#[tokio::test]
async fn test_end_match_saves_and_updates_stats() {
    let app = TestApp::new();
    let body = r#"{"winner_id": 1, "player1_id": 1, "player2_id": 2,
        "points_p1": 11, "points_p2": 7, "sats_reward": 100,
        "player1_name": "Alice", "player2_name": "Bob"}"#;

    let (status, response) = app.post_match(body).await;
    assert_eq!(status, StatusCode::OK);
    let saved = match response {
        EndMatchResponse::Saved(saved) => saved,
        EndMatchResponse::Failed(e) => panic!("save failed: {:?}", e),
    };
    assert_eq!(saved.message(), "Match saved");

    let matches = app.repo.list_matches().expect("List failed");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id(), saved.match_id());
    assert_eq!(*matches[0].total_points_p1(), 11);
    assert_eq!(*matches[0].total_points_p2(), 7);

    let alice = app.repo.get_player(1).expect("Query failed").expect("Alice missing");
    assert_eq!((*alice.total_wins(), *alice.total_sats_won()), (1, 100));
    let bob = app.repo.get_player(2).expect("Query failed").expect("Bob missing");
    assert_eq!(*bob.total_losses(), 1);
}

#[tokio::test]
async fn test_end_match_with_empty_object_uses_defaults() {
    let app = TestApp::new();
    let (_, response) = app.post_match("{}").await;
    assert!(matches!(response, EndMatchResponse::Saved(_)));

    let p1 = app.repo.get_player(1).expect("Query failed").expect("Player1 missing");
    let p2 = app.repo.get_player(2).expect("Query failed").expect("AI missing");
    assert_eq!(p1.username(), "Player1");
    assert_eq!(p2.username(), "AI");
    assert_eq!(p1.games_played() + p2.games_played(), 0);
}

#[tokio::test]
async fn test_malformed_body_returns_error_payload_with_ok_status() {
    let app = TestApp::new();
    let (status, response) = app.post_match("{not json").await;
    assert_eq!(status, StatusCode::OK);
    match response {
        EndMatchResponse::Failed(e) => {
            assert_eq!(e.error(), "Failed to save match");
            assert!(!e.details().is_empty());
        }
        EndMatchResponse::Saved(s) => panic!("unexpected save: {:?}", s),
    }
    assert!(app.repo.list_matches().expect("List failed").is_empty());
}

#[tokio::test]
async fn test_storage_failure_returns_error_payload() {
    let db = NamedTempFile::new().expect("Failed to create temp file");
    let repo = GameRepository::new(db.path().to_str().expect("Invalid path").to_string())
        .expect("Failed to create repository");
    let static_dir = TempDir::new().expect("Failed to create static dir");
    let app = router(AppState::new(StatsService::new(repo), static_dir.path()));

    let request = Request::post("/api/match/end")
        .body(Body::from("{}"))
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let parsed: EndMatchResponse = serde_json::from_slice(&bytes).expect("json");
    match parsed {
        EndMatchResponse::Failed(e) => {
            assert!(e.details().contains("no such table"));
            assert!(!e.details().contains(".rs:"));
        }
        EndMatchResponse::Saved(s) => panic!("unexpected save: {:?}", s),
    }

    let request = Request::get("/leaderboard").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let html = String::from_utf8(bytes.to_vec()).expect("utf8");
    assert!(html.contains("Error loading leaderboard"));
    assert!(!html.contains(".rs:"));
}

#[tokio::test]
async fn test_leaderboard_json_sorted_by_wins() {
    let app = TestApp::new();
    let results = [
        MatchSubmission::decided(2, (1, "Alice"), (2, "Bob"), (5, 11), 20),
        MatchSubmission::decided(2, (1, "Alice"), (2, "Bob"), (9, 11), 30),
        MatchSubmission::decided(1, (1, "Alice"), (3, "Cleo"), (11, 1), 40),
    ];
    for sub in &results {
        let (_, response) = app.post_match(submission_json(sub)).await;
        assert!(matches!(response, EndMatchResponse::Saved(_)));
    }

    let entries = app.leaderboard().await;
    let names: Vec<&str> = entries.iter().map(|e| e.username().as_str()).collect();
    assert_eq!(names, vec!["Bob", "Alice", "Cleo"]);
    assert_eq!((*entries[0].wins(), *entries[0].losses(), *entries[0].sats()), (2, 0, 50));
    assert_eq!((*entries[1].wins(), *entries[1].losses(), *entries[1].sats()), (1, 2, 40));
    assert_eq!((*entries[2].wins(), *entries[2].losses()), (0, 1));
}

#[tokio::test]
async fn test_leaderboard_json_empty() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/leaderboard").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[tokio::test]
async fn test_leaderboard_page_shows_win_rates() {
    let app = TestApp::new();
    let results = [
        MatchSubmission::decided(1, (1, "Alice"), (2, "<b>Bob</b>"), (11, 3), 10),
        MatchSubmission::decided(1, (1, "Alice"), (2, "<b>Bob</b>"), (11, 4), 10),
        MatchSubmission::decided(2, (1, "Alice"), (2, "<b>Bob</b>"), (6, 11), 10),
    ];
    for sub in &results {
        app.post_match(submission_json(sub)).await;
    }
    app.post_match(r#"{"player1_id": 7, "player1_name": "Newbie", "player2_id": 8, "player2_name": "Idle"}"#)
        .await;

    let (status, html) = app.get("/leaderboard").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Ping Pong Leaderboard"));
    assert!(html.contains("<td>66.7%</td>"));
    assert!(html.contains("<td>33.3%</td>"));
    assert!(html.contains("<td>0.0%</td>"));
    assert!(html.contains("&lt;b&gt;Bob&lt;/b&gt;"));
    assert!(!html.contains("<b>Bob</b>"));

    let alice_row = html.find("Alice").expect("Alice row");
    let bob_row = html.find("&lt;b&gt;Bob").expect("Bob row");
    assert!(alice_row < bob_row);
}

#[tokio::test]
async fn test_end_match_accepts_64_bit_ids() {
    let app = TestApp::new();
    let body = r#"{"winner_id": 3000000000, "player1_id": 3000000000,
        "player2_id": 4000000000, "points_p1": 11, "points_p2": 9,
        "sats_reward": 21, "player1_name": "Big", "player2_name": "Bigger"}"#;

    let (status, response) = app.post_match(body).await;
    assert_eq!(status, StatusCode::OK);
    assert!(matches!(response, EndMatchResponse::Saved(_)));

    let winner = app
        .repo
        .get_player(3_000_000_000)
        .expect("Query failed")
        .expect("Winner missing");
    assert_eq!((*winner.total_wins(), *winner.total_sats_won()), (1, 21));
    let loser = app
        .repo
        .get_player(4_000_000_000)
        .expect("Query failed")
        .expect("Loser missing");
    assert_eq!(*loser.total_losses(), 1);
}

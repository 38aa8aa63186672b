//! Leaderboard renderings: JSON entries, the HTML page, and a plain-text table.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::Player;

/// One leaderboard row in the JSON API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LeaderboardEntry {
    username: String,
    wins: i32,
    losses: i32,
    sats: i64,
}

impl From<&Player> for LeaderboardEntry {
    fn from(player: &Player) -> Self {
        Self {
            username: player.username().clone(),
            wins: *player.total_wins(),
            losses: *player.total_losses(),
            sats: *player.total_sats_won(),
        }
    }
}

/// Formats a win rate percentage with one decimal place.
pub fn format_win_rate(rate: f64) -> String {
    format!("{:.1}%", rate)
}

/// Escapes text for safe inclusion in HTML element content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Ping Pong Leaderboard</title>
    <style>
        body { background: #1a1a1a; color: white; font-family: Arial, sans-serif; padding: 20px; }
        h1 { color: #e63946; text-align: center; }
        table { width: 100%; max-width: 800px; margin: 0 auto; border-collapse: collapse; }
        th, td { padding: 15px; text-align: left; border-bottom: 1px solid #333; }
        th { background: #457b9d; color: white; }
        tr:hover { background: #333; }
        .rank { font-weight: bold; color: #e63946; }
        .wins { color: #51cf66; }
        .losses { color: #ff6b6b; }
        .sats { color: #ffd43b; }
        .nav { text-align: center; }
        a { color: #457b9d; text-decoration: none; }
        a:hover { color: #6c9bd1; }
    </style>
</head>
<body>
    <h1>🏆 Ping Pong Leaderboard</h1>
    <p class="nav"><a href="/">← Back to Game</a></p>
    <table>
        <tr>
            <th>Rank</th>
            <th>Player</th>
            <th>Wins</th>
            <th>Losses</th>
            <th>Win Rate</th>
            <th>Sats Won</th>
        </tr>
"#;

const PAGE_FOOT: &str = r#"    </table>
    <p class="nav" style="margin-top: 30px;">
        <a href="/">Play Ping Pong</a> |
        <a href="/api/leaderboard">JSON Data</a>
    </p>
</body>
</html>
"#;

/// Renders the leaderboard page for players already sorted by rank.
#[instrument(skip(players), fields(count = players.len()))]
pub fn render_html(players: &[Player]) -> String {
    let mut html = String::from(PAGE_HEAD);
    for (rank, player) in players.iter().enumerate() {
        html.push_str(&format!(
            r#"        <tr>
            <td class="rank">#{rank}</td>
            <td>{name}</td>
            <td class="wins">{wins}</td>
            <td class="losses">{losses}</td>
            <td>{rate}</td>
            <td class="sats">{sats}</td>
        </tr>
"#,
            rank = rank + 1,
            name = escape_html(player.username()),
            wins = player.total_wins(),
            losses = player.total_losses(),
            rate = format_win_rate(player.win_rate()),
            sats = player.total_sats_won(),
        ));
    }
    html.push_str(PAGE_FOOT);
    html
}

/// Renders the page shown when the leaderboard cannot be loaded.
pub fn render_error_html(details: &str) -> String {
    format!(
        "<h1>Error loading leaderboard</h1><p>{}</p>",
        escape_html(details)
    )
}

/// Renders an aligned plain-text table for terminal output.
#[instrument(skip(players), fields(count = players.len()))]
pub fn render_text(players: &[Player]) -> String {
    let name_width = players
        .iter()
        .map(|p| p.username().chars().count())
        .chain(std::iter::once("Player".len()))
        .max()
        .unwrap_or_default();

    let mut out = format!(
        "{:<5} {:<name_width$} {:>6} {:>6} {:>9} {:>10}\n",
        "Rank", "Player", "Wins", "Losses", "Win Rate", "Sats Won"
    );
    for (rank, player) in players.iter().enumerate() {
        out.push_str(&format!(
            "{:<5} {:<name_width$} {:>6} {:>6} {:>9} {:>10}\n",
            format!("#{}", rank + 1),
            player.username(),
            player.total_wins(),
            player.total_losses(),
            format_win_rate(player.win_rate()),
            player.total_sats_won(),
        ));
    }
    out
}

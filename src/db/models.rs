//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::schema;

/// Player database model with cumulative match statistics.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::players)]
pub struct Player {
    id: i64,
    username: String,
    total_wins: i32,
    total_losses: i32,
    total_sats_won: i64,
}

impl Player {
    /// Number of decided matches this player took part in.
    pub fn games_played(&self) -> i32 {
        self.total_wins + self.total_losses
    }

    /// Calculates win rate as a percentage (0.0–100.0).
    ///
    /// Players without any decided match have a win rate of `0.0`.
    #[instrument(skip(self), fields(player_id = self.id))]
    pub fn win_rate(&self) -> f64 {
        let played = self.games_played();
        if played == 0 {
            0.0
        } else {
            (self.total_wins as f64 / played as f64) * 100.0
        }
    }
}

/// Insertable player model. Counters start at zero via column defaults.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::players)]
pub struct NewPlayer {
    id: i64,
    username: String,
}

/// Match result database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::matches)]
pub struct Match {
    id: i64,
    player1_id: i64,
    player2_id: i64,
    winner_id: Option<i64>,
    start_time: NaiveDateTime,
    end_time: Option<NaiveDateTime>,
    total_points_p1: i64,
    total_points_p2: i64,
    sats_reward: i64,
}

/// Insertable match model.
///
/// `start_time` is stamped when the value is constructed; call
/// [`NewMatch::ended_now`] to stamp `end_time` before recording.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::matches)]
pub struct NewMatch {
    player1_id: i64,
    player2_id: i64,
    winner_id: Option<i64>,
    total_points_p1: i64,
    total_points_p2: i64,
    sats_reward: i64,
    #[new(value = "chrono::Utc::now().naive_utc()")]
    start_time: NaiveDateTime,
    #[new(default)]
    end_time: Option<NaiveDateTime>,
}

impl NewMatch {
    /// Marks the match as finished at the current UTC time.
    pub fn ended_now(mut self) -> Self {
        self.end_time = Some(chrono::Utc::now().naive_utc());
        self
    }

    /// Resolves the `(winner, loser)` ids whose statistics this match updates.
    ///
    /// The loser is player 1 only when the winner is player 2; any other
    /// winner id makes player 2 the loser. Returns `None` without a winner.
    #[instrument(skip(self), fields(winner_id = ?self.winner_id))]
    pub fn winner_and_loser(&self) -> Option<(i64, i64)> {
        let winner = self.winner_id?;
        let loser = if winner == self.player2_id {
            self.player1_id
        } else {
            self.player2_id
        };
        Some((winner, loser))
    }
}

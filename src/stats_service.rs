//! Match ingestion and leaderboard business logic layer.

use tracing::{debug, info, instrument};

use crate::{DbError, GameRepository, LeaderboardEntry, Match, MatchSubmission, Player};

/// Service layer for match results and player rankings.
///
/// Wraps [`GameRepository`], turning client submissions into database
/// records and players into leaderboard entries.
#[derive(Debug, Clone)]
pub struct StatsService {
    repository: GameRepository,
}

impl StatsService {
    /// Creates a new stats service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!(path = %repository.db_path(), "Creating StatsService");
        Self { repository }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &GameRepository {
        &self.repository
    }

    /// Saves a finished match and applies it to both players' statistics.
    #[instrument(skip(self, submission))]
    pub fn submit_match(&self, submission: &MatchSubmission) -> Result<Match, DbError> {
        let players = submission.players();
        let new_match = submission.to_new_match();
        debug!(
            player1 = %players[0].username(),
            player2 = %players[1].username(),
            winner_id = ?new_match.winner_id(),
            "Submitting match"
        );

        let saved = self.repository.record_match(&players, new_match)?;
        info!(match_id = saved.id(), "Match saved");
        Ok(saved)
    }

    /// Returns every player ranked by wins, highest first.
    #[instrument(skip(self))]
    pub fn ranked_players(&self) -> Result<Vec<Player>, DbError> {
        self.repository.leaderboard()
    }

    /// Returns the ranked players as JSON leaderboard entries.
    #[instrument(skip(self))]
    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, DbError> {
        let entries = self
            .ranked_players()?
            .iter()
            .map(LeaderboardEntry::from)
            .collect::<Vec<_>>();
        debug!(count = entries.len(), "Leaderboard entries built");
        Ok(entries)
    }
}

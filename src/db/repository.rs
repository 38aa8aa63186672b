//! Database repository for players and match results.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, DbErrorKind, Match, NewMatch, NewPlayer, Player, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Database repository for player and match operations.
///
/// Holds only the database path; every operation opens its own connection
/// and drops it before returning.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a new repository for the database at the given path.
    ///
    /// The file is created on first connection if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(
                DbErrorKind::Connection,
                "Database path must not be empty",
            ));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Returns the database path this repository connects to.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))?;
        Ok(conn)
    }

    /// Creates the `players` and `matches` tables if they are missing.
    ///
    /// Returns the number of migrations applied.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if connecting or migrating fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, e.to_string()))?
            .len();
        info!(applied, "Schema migrations complete");
        Ok(applied)
    }

    /// Records a finished match and updates both players' statistics.
    ///
    /// Within a single transaction: each listed player is created if missing
    /// and otherwise has its username overwritten, the match row is
    /// inserted, the winner gains a win plus the sats reward, and the loser
    /// gains a loss. Stat updates for ids without a player row are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if any statement fails; nothing is persisted then.
    #[instrument(
        skip(self, players, new_match),
        fields(player1_id = new_match.player1_id(), player2_id = new_match.player2_id(), winner_id = ?new_match.winner_id())
    )]
    pub fn record_match(
        &self,
        players: &[NewPlayer],
        new_match: NewMatch,
    ) -> Result<Match, DbError> {
        use schema::players::dsl as p;

        debug!("Recording match");
        let mut conn = self.connection()?;

        let recorded = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            for player in players {
                let existing = p::players
                    .find(*player.id())
                    .select(Player::as_select())
                    .first(conn)
                    .optional()?;

                match existing {
                    Some(current) => {
                        diesel::update(p::players.find(*player.id()))
                            .set(p::username.eq(player.username()))
                            .execute(conn)?;
                        debug!(
                            player_id = player.id(),
                            old = %current.username(),
                            new = %player.username(),
                            "Username overwritten"
                        );
                    }
                    None => {
                        diesel::insert_into(p::players)
                            .values(player)
                            .execute(conn)?;
                        info!(player_id = player.id(), username = %player.username(), "Player created");
                    }
                }
            }

            let saved = diesel::insert_into(schema::matches::table)
                .values(&new_match)
                .returning(Match::as_returning())
                .get_result(conn)?;

            if let Some((winner_id, loser_id)) = new_match.winner_and_loser() {
                let won = diesel::update(p::players.find(winner_id))
                    .set((
                        p::total_wins.eq(p::total_wins + 1),
                        p::total_sats_won.eq(p::total_sats_won + *new_match.sats_reward()),
                    ))
                    .execute(conn)?;
                if won == 0 {
                    debug!(winner_id, "Winner has no player row; win not counted");
                }

                let lost = diesel::update(p::players.find(loser_id))
                    .set(p::total_losses.eq(p::total_losses + 1))
                    .execute(conn)?;
                if lost == 0 {
                    debug!(loser_id, "Loser has no player row; loss not counted");
                }
            } else {
                debug!("No winner supplied; statistics unchanged");
            }

            Ok(saved)
        })?;

        info!(
            match_id = recorded.id(),
            points_p1 = recorded.total_points_p1(),
            points_p2 = recorded.total_points_p2(),
            sats_reward = recorded.sats_reward(),
            "Match recorded"
        );
        Ok(recorded)
    }

    /// Gets a player by id. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_player(&self, player_id: i64) -> Result<Option<Player>, DbError> {
        debug!(player_id, "Looking up player");
        let mut conn = self.connection()?;

        let player = schema::players::table
            .find(player_id)
            .select(Player::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(player)
    }

    /// Lists all players ordered by wins, highest first.
    ///
    /// Players with equal wins are ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn leaderboard(&self) -> Result<Vec<Player>, DbError> {
        use schema::players::dsl as p;

        debug!("Loading leaderboard");
        let mut conn = self.connection()?;

        let players = p::players
            .order((p::total_wins.desc(), p::id.asc()))
            .select(Player::as_select())
            .load(&mut conn)?;

        info!(count = players.len(), "Leaderboard loaded");
        Ok(players)
    }

    /// Lists all recorded matches, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_matches(&self) -> Result<Vec<Match>, DbError> {
        debug!("Listing matches");
        let mut conn = self.connection()?;

        let matches = schema::matches::table
            .order(schema::matches::id.desc())
            .select(Match::as_select())
            .load(&mut conn)?;

        info!(count = matches.len(), "Matches loaded");
        Ok(matches)
    }
}

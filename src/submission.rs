//! Match result payload posted by the game client.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{NewMatch, NewPlayer};

/// Player id used when `player1_id` is missing.
pub const DEFAULT_PLAYER1_ID: i64 = 1;
/// Player id used when `player2_id` is missing.
pub const DEFAULT_PLAYER2_ID: i64 = 2;
/// Username used when `player1_name` is missing.
pub const DEFAULT_PLAYER1_NAME: &str = "Player1";
/// Username used when `player2_name` is missing.
pub const DEFAULT_PLAYER2_NAME: &str = "AI";

/// A finished match as reported by the client.
///
/// Every field is optional and nothing is validated. Missing values fall
/// back to defaults when the submission is turned into database records,
/// and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct MatchSubmission {
    winner_id: Option<i64>,
    player1_id: Option<i64>,
    player2_id: Option<i64>,
    points_p1: Option<i64>,
    points_p2: Option<i64>,
    sats_reward: Option<i64>,
    player1_name: Option<String>,
    player2_name: Option<String>,
}

impl MatchSubmission {
    /// Parses a submission from a raw JSON request body.
    ///
    /// # Errors
    ///
    /// Returns the [`serde_json::Error`] if the body is not a JSON object or
    /// a known key holds a value of the wrong type.
    #[instrument(skip(body), fields(len = body.as_ref().len()))]
    pub fn from_json(body: impl AsRef<[u8]>) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body.as_ref())
    }

    /// Describes a match with every field present.
    pub fn decided(
        winner_id: i64,
        player1: (i64, &str),
        player2: (i64, &str),
        points: (i64, i64),
        sats_reward: i64,
    ) -> Self {
        Self {
            winner_id: Some(winner_id),
            player1_id: Some(player1.0),
            player2_id: Some(player2.0),
            points_p1: Some(points.0),
            points_p2: Some(points.1),
            sats_reward: Some(sats_reward),
            player1_name: Some(player1.1.to_string()),
            player2_name: Some(player2.1.to_string()),
        }
    }

    /// The two player records referenced by this match, with their
    /// submitted usernames.
    pub fn players(&self) -> [NewPlayer; 2] {
        [
            NewPlayer::new(
                self.player1_id.unwrap_or(DEFAULT_PLAYER1_ID),
                self.player1_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PLAYER1_NAME.to_string()),
            ),
            NewPlayer::new(
                self.player2_id.unwrap_or(DEFAULT_PLAYER2_ID),
                self.player2_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PLAYER2_NAME.to_string()),
            ),
        ]
    }

    /// The match row to insert, finished as of now.
    pub fn to_new_match(&self) -> NewMatch {
        NewMatch::new(
            self.player1_id.unwrap_or(DEFAULT_PLAYER1_ID),
            self.player2_id.unwrap_or(DEFAULT_PLAYER2_ID),
            self.winner_id,
            self.points_p1.unwrap_or_default(),
            self.points_p2.unwrap_or_default(),
            self.sats_reward.unwrap_or_default(),
        )
        .ended_now()
    }
}

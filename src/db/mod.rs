//! Database persistence layer for players and match results.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, DbErrorKind};
pub use models::{Match, NewMatch, NewPlayer, Player};
pub use repository::GameRepository;

//! Player and match storage.
//!
//! The pairing engine never touches storage directly. It is fed by a
//! `TournamentStore`, which hands out consistent snapshots of:
//! - Registered players
//! - Reported match results and awarded byes
//! - Standings and match history derived from the two above

pub mod jsonl;
pub mod memory;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{
    compute_standings, ByeRecord, MatchHistory, MatchResult, Player, PlayerId, StandingEntry,
};

pub use jsonl::{EntityType, JsonlReader, JsonlStore, JsonlWriter};
pub use memory::MemoryStore;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No player ids left after {0}")]
    IdsExhausted(PlayerId),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn tournament_dir(&self) -> PathBuf {
        self.data_dir.join("tournament")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Data-access interface for one tournament.
///
/// Mutations take `&mut self`; the derived readers recompute from the raw
/// records on every call so standings can never go stale.
pub trait TournamentStore {
    fn players(&self) -> Result<Vec<Player>, StorageError>;

    fn matches(&self) -> Result<Vec<MatchResult>, StorageError>;

    fn byes(&self) -> Result<Vec<ByeRecord>, StorageError>;

    /// Store a new player under the next serial id. `name` is stored as given.
    fn register_player(&mut self, name: String) -> Result<Player, StorageError>;

    fn report_match(
        &mut self,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<MatchResult, StorageError>;

    fn record_bye(&mut self, player: PlayerId, round: u32) -> Result<ByeRecord, StorageError>;

    /// Remove every match result and bye.
    fn delete_matches(&mut self) -> Result<(), StorageError>;

    /// Remove every player, together with their results and byes.
    fn delete_players(&mut self) -> Result<(), StorageError>;

    /// Standings, wins descending then player id ascending.
    fn get_standings(&self) -> Result<Vec<StandingEntry>, StorageError> {
        Ok(compute_standings(
            &self.players()?,
            &self.matches()?,
            &self.byes()?,
        ))
    }

    fn get_match_history(&self) -> Result<MatchHistory, StorageError> {
        Ok(MatchHistory::from_records(&self.matches()?, &self.byes()?))
    }

    fn get_player_count(&self) -> Result<usize, StorageError> {
        Ok(self.players()?.len())
    }
}

/// Next serial id after the highest one in use.
pub(crate) fn next_player_id(players: &[Player]) -> Result<PlayerId, StorageError> {
    match players.iter().map(|p| p.id).max() {
        Some(last) => last.next().ok_or(StorageError::IdsExhausted(last)),
        None => Ok(PlayerId::new(1)),
    }
}

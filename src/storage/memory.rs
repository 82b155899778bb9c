//! In-memory tournament store, for tests and embedding.

use super::{next_player_id, StorageError, TournamentStore};
use crate::models::{ByeRecord, MatchResult, Player, PlayerId};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    players: Vec<Player>,
    matches: Vec<MatchResult>,
    byes: Vec<ByeRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentStore for MemoryStore {
    fn players(&self) -> Result<Vec<Player>, StorageError> {
        Ok(self.players.clone())
    }

    fn matches(&self) -> Result<Vec<MatchResult>, StorageError> {
        Ok(self.matches.clone())
    }

    fn byes(&self) -> Result<Vec<ByeRecord>, StorageError> {
        Ok(self.byes.clone())
    }

    fn register_player(&mut self, name: String) -> Result<Player, StorageError> {
        let player = Player::new(next_player_id(&self.players)?, name);
        self.players.push(player.clone());
        Ok(player)
    }

    fn report_match(
        &mut self,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<MatchResult, StorageError> {
        let result = MatchResult::new(winner, loser, self.matches.len());
        self.matches.push(result.clone());
        Ok(result)
    }

    fn record_bye(&mut self, player: PlayerId, round: u32) -> Result<ByeRecord, StorageError> {
        let bye = ByeRecord::new(player, round);
        self.byes.push(bye.clone());
        Ok(bye)
    }

    fn delete_matches(&mut self) -> Result<(), StorageError> {
        self.matches.clear();
        self.byes.clear();
        Ok(())
    }

    fn delete_players(&mut self) -> Result<(), StorageError> {
        self.delete_matches()?;
        self.players.clear();
        Ok(())
    }

    fn get_player_count(&self) -> Result<usize, StorageError> {
        Ok(self.players.len())
    }
}

//! Tournament bookkeeping.
//!
//! Wraps a `TournamentStore` with the operations a tournament director needs:
//! 1. Register players and report results
//! 2. Read standings
//! 3. Pair the next round with the Swiss engine
//! 4. Reset matches or the whole field

use thiserror::Error;
use tracing::info;

use crate::config::PairingConfig;
use crate::models::{
    sanitize_name, ByeRecord, MatchResult, Player, PlayerId, RoundPairings, StandingEntry,
};
use crate::pairing::{PairingEngine, PairingError};
use crate::storage::{StorageError, TournamentStore};

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Pairing error: {0}")]
    Pairing(#[from] PairingError),

    #[error("Player name is empty after sanitizing: {0:?}")]
    InvalidName(String),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player {0} cannot play against themselves")]
    SelfMatch(PlayerId),

    #[error("Round {round} is still in progress (bye already awarded to player {player})")]
    RoundInProgress { round: u32, player: PlayerId },
}

/// A Swiss tournament over some store.
pub struct Tournament<S> {
    store: S,
    engine: PairingEngine,
}

impl<S: TournamentStore> Tournament<S> {
    pub fn new(store: S, config: PairingConfig) -> Self {
        Self {
            store,
            engine: PairingEngine::new(config),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a player. The name is sanitized before it is stored.
    pub fn register_player(&mut self, name: &str) -> Result<Player, TournamentError> {
        let clean = sanitize_name(name)
            .ok_or_else(|| TournamentError::InvalidName(name.to_string()))?;
        let player = self.store.register_player(clean)?;
        info!("Registered player {} ({})", player.id, player.name);
        Ok(player)
    }

    /// Record the outcome of a single match.
    pub fn report_match(
        &mut self,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<MatchResult, TournamentError> {
        if winner == loser {
            return Err(TournamentError::SelfMatch(winner));
        }

        let players = self.store.players()?;
        for id in [winner, loser] {
            if !players.iter().any(|p| p.id == id) {
                return Err(TournamentError::UnknownPlayer(id));
            }
        }

        let result = self.store.report_match(winner, loser)?;
        info!("Reported match {}: {} beat {}", result.id, winner, loser);
        Ok(result)
    }

    pub fn count_players(&self) -> Result<usize, TournamentError> {
        Ok(self.store.get_player_count()?)
    }

    pub fn standings(&self) -> Result<Vec<StandingEntry>, TournamentError> {
        Ok(self.store.get_standings()?)
    }

    /// Compute the next round without recording anything.
    pub fn preview_pairings(&self) -> Result<RoundPairings, TournamentError> {
        let standings = self.store.get_standings()?;
        let history = self.store.get_match_history()?;
        Ok(self.engine.pair(&standings, &history)?)
    }

    /// Compute the next round and record its bye, if any.
    ///
    /// Refused while the round of the last recorded bye has no reported
    /// result yet.
    pub fn pair_next_round(&mut self) -> Result<RoundPairings, TournamentError> {
        let standings = self.store.get_standings()?;
        if let Some(bye) = self.unfinished_bye(&standings)? {
            return Err(TournamentError::RoundInProgress {
                round: bye.round,
                player: bye.player_id,
            });
        }
        let history = self.store.get_match_history()?;
        let round = self.engine.pair(&standings, &history)?;

        if let Some(bye) = &round.bye {
            let round_no = standings.iter().map(|s| s.matches).max().unwrap_or(0) + 1;
            self.store.record_bye(bye.player_id, round_no)?;
            info!("Recorded round {} bye for player {}", round_no, bye.player_id);
        }

        Ok(round)
    }

    /// The latest bye, if nobody else has played its round yet.
    fn unfinished_bye(
        &self,
        standings: &[StandingEntry],
    ) -> Result<Option<ByeRecord>, TournamentError> {
        let Some(last) = self.store.byes()?.into_iter().max_by_key(|b| b.round) else {
            return Ok(None);
        };
        let started = standings
            .iter()
            .any(|s| s.player_id != last.player_id && s.matches >= last.round);
        Ok((!started).then_some(last))
    }

    /// Remove all match results and byes; players stay registered.
    pub fn delete_matches(&mut self) -> Result<(), TournamentError> {
        self.store.delete_matches()?;
        info!("Deleted all matches");
        Ok(())
    }

    /// Remove all players along with their results.
    pub fn delete_players(&mut self) -> Result<(), TournamentError> {
        self.store.delete_players()?;
        info!("Deleted all players");
        Ok(())
    }
}

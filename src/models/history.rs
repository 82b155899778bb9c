//! Match history: which pairs already met and who already sat out.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{ByeRecord, MatchResult, PlayerId};

/// An unordered pair of players. `(a, b)` and `(b, a)` are the same pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerPair {
    low: PlayerId,
    high: PlayerId,
}

impl PlayerPair {
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}

/// Snapshot of everything the pairing engine needs to know about past rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchHistory {
    played: HashSet<PlayerPair>,
    byes: HashSet<PlayerId>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the history from stored results and byes.
    pub fn from_records(results: &[MatchResult], byes: &[ByeRecord]) -> Self {
        let mut history = Self::new();
        for result in results {
            history.record_match(result.winner_id, result.loser_id);
        }
        for bye in byes {
            history.record_bye(bye.player_id);
        }
        history
    }

    pub fn record_match(&mut self, a: PlayerId, b: PlayerId) {
        self.played.insert(PlayerPair::new(a, b));
    }

    pub fn record_bye(&mut self, player: PlayerId) {
        self.byes.insert(player);
    }

    /// Whether `a` and `b` have met before, in either seat.
    pub fn have_played(&self, a: PlayerId, b: PlayerId) -> bool {
        self.played.contains(&PlayerPair::new(a, b))
    }

    pub fn had_bye(&self, player: PlayerId) -> bool {
        self.byes.contains(&player)
    }

    /// Number of distinct pairs that have met.
    pub fn pair_count(&self) -> usize {
        self.played.len()
    }

    pub fn bye_count(&self) -> usize {
        self.byes.len()
    }
}

//! Derived standings. Always recomputed from stored results, never persisted.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ByeRecord, MatchResult, Player, PlayerId};

/// A player's record at a point in the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub player_id: PlayerId,
    pub name: String,
    pub wins: u32,
    pub matches: u32,
}

impl StandingEntry {
    pub fn new(player_id: PlayerId, name: impl Into<String>, wins: u32, matches: u32) -> Self {
        Self {
            player_id,
            name: name.into(),
            wins,
            matches,
        }
    }

    pub fn losses(&self) -> u32 {
        self.matches.saturating_sub(self.wins)
    }

    /// Win rate as a fraction (0.0 to 1.0).
    pub fn win_rate(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            self.wins as f64 / self.matches as f64
        }
    }

    /// `wins <= matches`
    pub fn is_consistent(&self) -> bool {
        self.wins <= self.matches
    }
}

/// Standings order: wins descending, then player id ascending.
pub fn rank_order(a: &StandingEntry, b: &StandingEntry) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| a.player_id.cmp(&b.player_id))
}

/// Sort entries into standings order in place.
pub fn sort_standings(entries: &mut [StandingEntry]) {
    entries.sort_by(rank_order);
}

/// Compute standings for every registered player.
///
/// A bye counts as one win and one match. Results or byes that reference a
/// player who is not registered are skipped.
pub fn compute_standings(
    players: &[Player],
    results: &[MatchResult],
    byes: &[ByeRecord],
) -> Vec<StandingEntry> {
    let mut by_id: HashMap<PlayerId, StandingEntry> = players
        .iter()
        .map(|p| (p.id, StandingEntry::new(p.id, p.name.clone(), 0, 0)))
        .collect();

    for result in results {
        if !by_id.contains_key(&result.winner_id) || !by_id.contains_key(&result.loser_id) {
            warn!(
                "Skipping match {} referencing unregistered player ({} vs {})",
                result.id, result.winner_id, result.loser_id
            );
            continue;
        }
        if let Some(winner) = by_id.get_mut(&result.winner_id) {
            winner.wins += 1;
            winner.matches += 1;
        }
        if let Some(loser) = by_id.get_mut(&result.loser_id) {
            loser.matches += 1;
        }
    }

    for bye in byes {
        match by_id.get_mut(&bye.player_id) {
            Some(entry) => {
                entry.wins += 1;
                entry.matches += 1;
            }
            None => warn!("Skipping bye for unregistered player {}", bye.player_id),
        }
    }

    let mut standings: Vec<StandingEntry> = by_id.into_values().collect();
    sort_standings(&mut standings);
    standings
}

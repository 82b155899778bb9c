//! Pairing model — the next round's matchups produced by the engine.

use serde::{Deserialize, Serialize};

use super::{PlayerId, StandingEntry};

/// A single pairing between two players for the upcoming round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    /// Higher-ranked player of the pair
    pub player1_id: PlayerId,

    pub player1_name: String,

    /// Lower-ranked player of the pair
    pub player2_id: PlayerId,

    pub player2_name: String,

    /// True when the two already met and the pair was only accepted because
    /// no rematch-free bracket existed
    #[serde(default)]
    pub forced_rematch: bool,
}

impl Pairing {
    /// Build a pairing from two standings entries, higher-ranked first.
    pub fn new(player1: &StandingEntry, player2: &StandingEntry) -> Self {
        Self {
            player1_id: player1.player_id,
            player1_name: player1.name.clone(),
            player2_id: player2.player_id,
            player2_name: player2.name.clone(),
            forced_rematch: false,
        }
    }

    /// Builder method to flag a forced rematch.
    pub fn forced(mut self) -> Self {
        self.forced_rematch = true;
        self
    }

    /// The `(id1, name1, id2, name2)` tuple form.
    pub fn as_tuple(&self) -> (PlayerId, &str, PlayerId, &str) {
        (
            self.player1_id,
            &self.player1_name,
            self.player2_id,
            &self.player2_name,
        )
    }
}

/// The player who sits out an odd-sized round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bye {
    pub player_id: PlayerId,
    pub name: String,
}

/// Everything the engine decided for one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundPairings {
    /// Pairings in rank order of their higher-ranked player
    pub pairings: Vec<Pairing>,

    /// Present only when the field size is odd
    pub bye: Option<Bye>,
}

impl RoundPairings {
    /// Number of pairings that had to accept a rematch.
    pub fn forced_rematches(&self) -> usize {
        self.pairings.iter().filter(|p| p.forced_rematch).count()
    }

    /// Every player scheduled this round, in output order, bye last.
    pub fn scheduled_players(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self
            .pairings
            .iter()
            .flat_map(|p| [p.player1_id, p.player2_id])
            .collect();
        if let Some(bye) = &self.bye {
            ids.push(bye.player_id);
        }
        ids
    }
}

//! Reported match outcomes and awarded byes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityId, MatchId, PlayerId};

/// One completed match. Every match has exactly one winner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Deterministic identifier (winner, loser, sequence number)
    pub id: MatchId,

    pub winner_id: PlayerId,

    pub loser_id: PlayerId,

    /// When the result was reported
    pub reported_at: DateTime<Utc>,
}

impl MatchResult {
    /// Create a new result. `sequence` is the number of results already
    /// stored, so reporting the same two players twice yields distinct IDs.
    pub fn new(winner_id: PlayerId, loser_id: PlayerId, sequence: usize) -> Self {
        let id = EntityId::generate(&[
            &winner_id.to_string(),
            &loser_id.to_string(),
            &sequence.to_string(),
        ]);

        Self {
            id,
            winner_id,
            loser_id,
            reported_at: Utc::now(),
        }
    }
}

/// A bye awarded to the player left over in an odd-sized round.
/// Counts as a win and a match played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByeRecord {
    pub player_id: PlayerId,

    /// Round (1-based) in which the bye was awarded
    pub round: u32,

    pub awarded_at: DateTime<Utc>,
}

impl ByeRecord {
    pub fn new(player_id: PlayerId, round: u32) -> Self {
        Self {
            player_id,
            round,
            awarded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_result_creation() {
        let result = MatchResult::new(PlayerId::new(1), PlayerId::new(2), 0);
        assert_eq!(result.winner_id, PlayerId::new(1));
        assert_eq!(result.loser_id, PlayerId::new(2));
    }

    #[test]
    fn test_match_id_depends_on_sequence() {
        let first = MatchResult::new(PlayerId::new(1), PlayerId::new(2), 0);
        let again = MatchResult::new(PlayerId::new(1), PlayerId::new(2), 0);
        let later = MatchResult::new(PlayerId::new(1), PlayerId::new(2), 1);
        assert_eq!(first.id, again.id);
        assert_ne!(first.id, later.id);
    }

    #[test]
    fn test_bye_record_serialization() {
        let bye = ByeRecord::new(PlayerId::new(9), 3);
        let json = serde_json::to_string(&bye).unwrap();
        let parsed: ByeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(bye, parsed);
        assert!(json.contains("\"player_id\":9"));
    }
}

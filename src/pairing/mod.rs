//! Swiss-system pairing engine.
//!
//! Computes the next round from a standings snapshot and the match history:
//! - Players are ranked by wins, ties broken by player id ascending
//! - An odd field sends the lowest-ranked player without a previous bye to
//!   the bye
//! - Adjacent ranks are paired; rematches are resolved by swapping in the
//!   next nearest unpaired player, backtracking when a later pair gets stuck
//!
//! The engine is a pure function of its inputs and holds no state between
//! calls, so one engine can serve any number of tournaments concurrently.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{PairingConfig, RematchPolicy};
use crate::models::{
    sort_standings, Bye, MatchHistory, Pairing, RoundPairings, StandingEntry,
};

/// Errors that can occur while computing pairings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No rematch-free pairing exists for {players} players")]
    PairingImpossible { players: usize },

    #[error("Gave up pairing {players} players after {steps} candidate pairs")]
    SearchBudgetExhausted { players: usize, steps: u64 },
}

/// Compute the next round with the default configuration
/// (strict rematch policy).
pub fn compute_next_round_pairings(
    standings: &[StandingEntry],
    history: &MatchHistory,
) -> Result<RoundPairings, PairingError> {
    PairingEngine::default().pair(standings, history)
}

/// Swiss pairing engine.
#[derive(Debug, Clone, Default)]
pub struct PairingEngine {
    config: PairingConfig,
}

impl PairingEngine {
    pub fn new(config: PairingConfig) -> Self {
        Self { config }
    }

    /// Pair the next round.
    ///
    /// `standings` may arrive in any order; the engine ranks them itself.
    pub fn pair(
        &self,
        standings: &[StandingEntry],
        history: &MatchHistory,
    ) -> Result<RoundPairings, PairingError> {
        validate(standings)?;
        debug!(
            "Pairing {} players ({} pairs already met, {} byes awarded)",
            standings.len(),
            history.pair_count(),
            history.bye_count()
        );

        let mut ranked = standings.to_vec();
        sort_standings(&mut ranked);

        let bye = if ranked.len() % 2 == 1 {
            Some(take_bye(&mut ranked, history))
        } else {
            None
        };

        let pairings = match search_bracket(&ranked, history, self.config.max_search_steps) {
            SearchOutcome::Found(pairs) => pairs
                .into_iter()
                .map(|(a, b)| Pairing::new(&ranked[a], &ranked[b]))
                .collect(),
            outcome => {
                let err = match outcome {
                    SearchOutcome::BudgetSpent => PairingError::SearchBudgetExhausted {
                        players: ranked.len(),
                        steps: self.config.max_search_steps,
                    },
                    _ => PairingError::PairingImpossible {
                        players: ranked.len(),
                    },
                };
                match self.config.rematch_policy {
                    RematchPolicy::Strict => return Err(err),
                    RematchPolicy::AllowForced => {
                        warn!("{}; falling back to forced rematches", err);
                        pair_with_forced_rematches(&ranked, history)
                    }
                }
            }
        };

        let round = RoundPairings { pairings, bye };
        info!(
            "Paired {} matches (bye: {}, forced rematches: {})",
            round.pairings.len(),
            round
                .bye
                .as_ref()
                .map(|b| b.player_id.to_string())
                .unwrap_or_else(|| "none".to_string()),
            round.forced_rematches()
        );
        Ok(round)
    }
}

fn validate(standings: &[StandingEntry]) -> Result<(), PairingError> {
    if standings.is_empty() {
        return Err(PairingError::InvalidInput(
            "standings are empty".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(standings.len());
    for entry in standings {
        if !seen.insert(entry.player_id) {
            return Err(PairingError::InvalidInput(format!(
                "duplicate player id {}",
                entry.player_id
            )));
        }
        if !entry.is_consistent() {
            return Err(PairingError::InvalidInput(format!(
                "player {} has {} wins in {} matches",
                entry.player_id, entry.wins, entry.matches
            )));
        }
    }

    Ok(())
}

/// Remove the bye player from `ranked`.
///
/// Lowest-ranked player without a previous bye; once everyone has had one,
/// the lowest-ranked player overall.
fn take_bye(ranked: &mut Vec<StandingEntry>, history: &MatchHistory) -> Bye {
    let index = ranked
        .iter()
        .rposition(|entry| !history.had_bye(entry.player_id))
        .unwrap_or(ranked.len() - 1);

    let entry = ranked.remove(index);
    debug!("Bye goes to player {} ({})", entry.player_id, entry.name);
    Bye {
        player_id: entry.player_id,
        name: entry.name,
    }
}

enum SearchOutcome {
    Found(Vec<(usize, usize)>),
    Exhausted,
    BudgetSpent,
}

struct BudgetSpent;

/// Depth-first search over brackets, nearest rank first.
///
/// The highest-ranked unpaired player always takes the closest unpaired
/// candidate it has not met; the search only moves to a farther candidate
/// when the rest of the bracket cannot be completed. With no conflicts the
/// first leaf reached is the plain adjacent pairing.
///
/// After every tentative pair the search checks that each player still
/// unpaired has at least one unpaired opponent it has not met, and backs out
/// at once when someone is stranded. This keeps a low seed whose only open
/// opponent is near the top from forcing a walk through every arrangement of
/// the players in between.
struct BracketSearch<'a> {
    ranked: &'a [StandingEntry],
    history: &'a MatchHistory,
    paired: Vec<bool>,
    pairs: Vec<(usize, usize)>,
    steps: u64,
    max_steps: u64,
}

impl BracketSearch<'_> {
    fn extend(&mut self) -> Result<bool, BudgetSpent> {
        let Some(top) = self.paired.iter().position(|p| !p) else {
            return Ok(true);
        };
        self.paired[top] = true;

        for candidate in top + 1..self.ranked.len() {
            if self.paired[candidate] || self.is_rematch(top, candidate) {
                continue;
            }

            self.steps += 1;
            if self.steps > self.max_steps {
                return Err(BudgetSpent);
            }

            self.paired[candidate] = true;
            self.pairs.push((top, candidate));
            if self.every_open_player_has_opponent() && self.extend()? {
                return Ok(true);
            }
            self.pairs.pop();
            self.paired[candidate] = false;
        }

        self.paired[top] = false;
        Ok(false)
    }

    fn every_open_player_has_opponent(&self) -> bool {
        let open: Vec<usize> = (0..self.ranked.len())
            .filter(|&i| !self.paired[i])
            .collect();
        open.iter()
            .all(|&a| open.iter().any(|&b| a != b && !self.is_rematch(a, b)))
    }

    fn is_rematch(&self, a: usize, b: usize) -> bool {
        self.history
            .have_played(self.ranked[a].player_id, self.ranked[b].player_id)
    }
}

fn search_bracket(
    ranked: &[StandingEntry],
    history: &MatchHistory,
    max_steps: u64,
) -> SearchOutcome {
    let mut search = BracketSearch {
        ranked,
        history,
        paired: vec![false; ranked.len()],
        pairs: Vec::with_capacity(ranked.len() / 2),
        steps: 0,
        max_steps,
    };

    if !search.every_open_player_has_opponent() {
        return SearchOutcome::Exhausted;
    }

    match search.extend() {
        Ok(true) => {
            debug!("Bracket found after {} candidate pairs", search.steps);
            SearchOutcome::Found(search.pairs)
        }
        Ok(false) => SearchOutcome::Exhausted,
        Err(BudgetSpent) => SearchOutcome::BudgetSpent,
    }
}

/// Last-resort pass: each highest-ranked unpaired player takes the nearest
/// candidate it has not met, or the nearest candidate at all when it has met
/// everyone left. Never fails on an even field.
fn pair_with_forced_rematches(ranked: &[StandingEntry], history: &MatchHistory) -> Vec<Pairing> {
    let mut paired = vec![false; ranked.len()];
    let mut pairings = Vec::with_capacity(ranked.len() / 2);

    for top in 0..ranked.len() {
        if paired[top] {
            continue;
        }
        paired[top] = true;

        let open: Vec<usize> = (top + 1..ranked.len()).filter(|&c| !paired[c]).collect();
        let fresh = open.iter().copied().find(|&c| {
            !history.have_played(ranked[top].player_id, ranked[c].player_id)
        });

        let (candidate, forced) = match (fresh, open.first()) {
            (Some(c), _) => (c, false),
            (None, Some(&c)) => (c, true),
            (None, None) => break,
        };
        paired[candidate] = true;

        let pairing = Pairing::new(&ranked[top], &ranked[candidate]);
        if forced {
            warn!(
                "Forced rematch: {} vs {}",
                ranked[top].player_id, ranked[candidate].player_id
            );
            pairings.push(pairing.forced());
        } else {
            pairings.push(pairing);
        }
    }

    pairings
}

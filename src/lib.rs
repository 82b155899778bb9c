//! # Swiss Pairing
//!
//! Swiss-system tournament pairing with the bookkeeping around it.
//!
//! ## Architecture
//!
//! - **models**: Players, match results, byes, standings, pairings
//! - **pairing**: The pairing engine (pure, stateless)
//! - **storage**: `TournamentStore` trait with JSONL and in-memory stores
//! - **tournament**: Registration, reporting and round pairing over a store
//! - **config**: Configuration loading and validation

pub mod config;
pub mod models;
pub mod pairing;
pub mod storage;
pub mod tournament;

pub use models::*;
pub use pairing::{compute_next_round_pairings, PairingEngine, PairingError};

//! Core data models for the tournament.

mod history;
mod ids;
mod match_result;
mod pairing;
mod player;
mod standings;

pub use history::*;
pub use ids::*;
pub use match_result::*;
pub use pairing::*;
pub use player::*;
pub use standings::*;

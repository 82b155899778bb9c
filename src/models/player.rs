//! Registered tournament player.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A player registered in the tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Serial identifier assigned by the store
    pub id: PlayerId,

    /// Display name (sanitized, need not be unique)
    pub name: String,

    /// When the player registered
    pub registered_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            registered_at: Utc::now(),
        }
    }
}

fn markup_tag() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

/// Clean a free-text player name for storage.
///
/// Strips markup tags, collapses runs of whitespace and trims the ends.
/// Returns `None` when nothing printable is left.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let stripped = markup_tag().replace_all(raw, "");
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

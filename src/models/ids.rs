//! Stable identifiers
//!
//! Cards are referenced by name in older snapshots, but names can be edited or
//! repeated, so internally everything that points at a card carries its `CardId`.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const CARD_PREFIX: &str = "card-";

/// Identifier of a credit card, stable for the card's whole life
///
/// Older snapshots used free-form ids (`"{name}_{timestamp}"`), so the id is
/// kept as an opaque string rather than a parsed UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(format!("{}{}", CARD_PREFIX, Uuid::new_v4().simple()))
    }

    /// Wrap an existing id string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for terminal display
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(CARD_PREFIX.len() + 8)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Games
//!
//! Identifiers for the mini-games that can earn a discount.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The game a discount was earned in.
///
/// Unknown identifiers round-trip through [`GameType::Other`] so that records written by a
/// newer storefront still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameType {
    /// Catch falling deal tags before they hit the floor.
    CatchTheDeal,

    /// Tap targets as fast as possible.
    TapRush,

    /// Dodge incoming fees; lives-based.
    DodgeTheFees,

    /// Any identifier not known to this build.
    Other(String),
}

impl GameType {
    /// Wire identifier for this game.
    pub fn as_str(&self) -> &str {
        match self {
            GameType::CatchTheDeal => "catch-the-deal",
            GameType::TapRush => "tap-rush",
            GameType::DodgeTheFees => "dodge-the-fees",
            GameType::Other(other) => other,
        }
    }

    /// Whether this game ends early when the player runs out of lives.
    pub fn has_lives(&self) -> bool {
        matches!(self, GameType::DodgeTheFees)
    }
}

impl From<String> for GameType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "catch-the-deal" => GameType::CatchTheDeal,
            "tap-rush" => GameType::TapRush,
            "dodge-the-fees" => GameType::DodgeTheFees,
            _ => GameType::Other(value),
        }
    }
}

impl From<&str> for GameType {
    fn from(value: &str) -> Self {
        GameType::from(value.to_string())
    }
}

impl From<GameType> for String {
    fn from(value: GameType) -> Self {
        match value {
            GameType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

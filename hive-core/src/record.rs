//! Serializable game records
//!
//! A record is the feature set plus the committed actions. Replaying it feeds
//! every action back through the rules, so a record is only as trustworthy as
//! its replay.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::action::Action;
use crate::error::GameError;
use crate::features::Features;
use crate::game::Game;

/// Everything needed to rebuild a game
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(default)]
    pub features: Features,
    pub actions: Vec<Action>,
}

/// The first recorded action the rules rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("action {index} ({action}) was rejected: {source}")]
pub struct ReplayError {
    /// Zero-based position in the record
    pub index: usize,
    pub action: Action,
    #[source]
    pub source: GameError,
}

impl GameRecord {
    pub fn new(features: Features) -> Self {
        Self {
            features,
            actions: Vec::new(),
        }
    }

    pub fn from_game(game: &Game) -> Self {
        Self {
            features: game.features(),
            actions: game.history(),
        }
    }

    /// Rebuild the game one action at a time
    pub fn replay(&self) -> Result<Game, ReplayError> {
        let mut game = Game::new(self.features);
        for (index, &action) in self.actions.iter().enumerate() {
            game.apply(action).map_err(|source| ReplayError {
                index,
                action,
                source,
            })?;
        }
        tracing::debug!(actions = self.actions.len(), turn = game.turn(), "replayed record");
        Ok(game)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

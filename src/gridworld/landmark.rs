//! Named points of interest placed on the grid

use serde::{Deserialize, Serialize};

use crate::types::Cell;

/// A rewarding or penalising point of interest at a fixed cell.
///
/// The name is not part of the struct; layouts key landmarks by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub position: Cell,
    pub reward: f64,
    #[serde(default)]
    pub glyph: String,
    #[serde(default)]
    pub is_target: bool,
    #[serde(default)]
    pub is_start: bool,
}

impl Landmark {
    pub fn new(position: impl Into<Cell>, reward: f64, glyph: impl Into<String>) -> Self {
        Self {
            position: position.into(),
            reward,
            glyph: glyph.into(),
            is_target: false,
            is_start: false,
        }
    }

    /// Mark this landmark as the training goal.
    pub fn as_target(mut self) -> Self {
        self.is_target = true;
        self
    }

    /// Mark this landmark as the agent's home cell.
    pub fn as_start(mut self) -> Self {
        self.is_start = true;
        self
    }
}

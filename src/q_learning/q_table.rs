//! Q-table implementation for temporal difference learning

use serde::{Deserialize, Serialize};

use super::{policy, policy::ActionValues, trainer::TdParams};
use crate::types::{Action, Cell};

/// Dense Q-table mapping (cell, action) pairs to Q-values
///
/// One row of four values per grid cell, indexed by `row * width + col`.
/// Every entry starts at zero, walls included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    height: usize,
    width: usize,
    values: Vec<[f64; 4]>,
}

impl QTable {
    /// Create a zeroed Q-table for a `height x width` grid
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            values: vec![[0.0; 4]; height * width],
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Get Q-value for a cell-action pair
    pub fn get(&self, cell: Cell, action: Action) -> f64 {
        self.values[cell.index(self.width)][action.index()]
    }

    /// Set Q-value for a cell-action pair
    pub fn set(&mut self, cell: Cell, action: Action, value: f64) {
        self.values[cell.index(self.width)][action.index()] = value;
    }

    /// All four Q-values at a cell, in [`Action::ALL`] order
    pub fn row(&self, cell: Cell) -> &[f64; 4] {
        &self.values[cell.index(self.width)]
    }

    /// Iterate over every cell with its Q-values
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &[f64; 4])> {
        let width = self.width;
        self.values
            .iter()
            .enumerate()
            .map(move |(idx, row)| (Cell::from_index(idx, width), row))
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn q_learning_update(
        &mut self,
        state: Cell,
        action: Action,
        reward: f64,
        next_state: Cell,
        params: TdParams,
    ) {
        let max_next_q = policy::max_value(&*self, next_state);
        self.apply_td(state, action, reward, max_next_q, params);
    }

    /// SARSA update: on-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ Q(s',a') - Q(s,a)]
    pub fn sarsa_update(
        &mut self,
        state: Cell,
        action: Action,
        reward: f64,
        next_state: Cell,
        next_action: Action,
        params: TdParams,
    ) {
        let next_q = self.get(next_state, next_action);
        self.apply_td(state, action, reward, next_q, params);
    }

    fn apply_td(
        &mut self,
        state: Cell,
        action: Action,
        reward: f64,
        bootstrap: f64,
        params: TdParams,
    ) {
        let current_q = self.get(state, action);
        let td_target = reward + params.discount_factor * bootstrap;
        let td_error = td_target - current_q;
        self.set(state, action, current_q + params.learning_rate * td_error);
    }

    /// Reset all Q-values to zero
    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|row| *row = [0.0; 4]);
    }

    /// Number of cells covered by the table
    pub fn size(&self) -> usize {
        self.values.len()
    }
}

impl ActionValues for QTable {
    fn value(&self, cell: Cell, action: Action) -> f64 {
        self.get(cell, action)
    }
}

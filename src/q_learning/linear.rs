//! Linear action-value approximation (the sandbox's "DQN")
//!
//! Each action owns three weights and
//! `Q(s, a) = w_row * (row / 10) + w_col * (col / 10) + bias`.
//! There is no network, replay buffer or target model.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{policy, policy::ActionValues, trainer::TdParams};
use crate::types::{Action, Cell};

/// Coordinates are divided by this before entering the model.
pub const FEATURE_SCALE: f64 = 10.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearWeights {
    pub w_row: f64,
    pub w_col: f64,
    pub bias: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    weights: [LinearWeights; 4],
}

fn features(cell: Cell) -> (f64, f64) {
    (
        cell.row as f64 / FEATURE_SCALE,
        cell.col as f64 / FEATURE_SCALE,
    )
}

impl LinearModel {
    /// Small random row/column weights in `[0, 0.1)` and zero bias.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut weights = [LinearWeights::default(); 4];
        for w in &mut weights {
            w.w_row = rng.random::<f64>() * 0.1;
            w.w_col = rng.random::<f64>() * 0.1;
        }
        Self { weights }
    }

    pub fn from_weights(weights: [LinearWeights; 4]) -> Self {
        Self { weights }
    }

    pub fn weights(&self, action: Action) -> LinearWeights {
        self.weights[action.index()]
    }

    /// Semi-gradient Q-learning step on the weights of `action`.
    ///
    /// Returns the TD error that drove the update.
    pub fn td_update(
        &mut self,
        state: Cell,
        action: Action,
        reward: f64,
        next_state: Cell,
        params: TdParams,
    ) -> f64 {
        let target = reward + params.discount_factor * policy::max_value(&*self, next_state);
        let error = target - self.value(state, action);

        let (nr, nc) = features(state);
        let step = params.learning_rate * error;
        let w = &mut self.weights[action.index()];
        w.w_row += step * nr;
        w.w_col += step * nc;
        w.bias += step;
        error
    }
}

impl ActionValues for LinearModel {
    fn value(&self, cell: Cell, action: Action) -> f64 {
        let (nr, nc) = features(cell);
        let w = &self.weights[action.index()];
        w.w_row * nr + w.w_col * nc + w.bias
    }
}

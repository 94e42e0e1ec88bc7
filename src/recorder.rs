//! Trajectories of manually driven moves

use serde::{Deserialize, Serialize};

use crate::types::Transition;

/// A finished (or in-progress) sequence of manual transitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub transitions: Vec<Transition>,
}

impl Episode {
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn total_reward(&self) -> f64 {
        self.transitions.iter().map(|t| t.reward).sum()
    }
}

/// Collects manual transitions; training never writes here.
#[derive(Debug, Clone, Default)]
pub struct EpisodeRecorder {
    current: Episode,
    completed: Vec<Episode>,
}

impl EpisodeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, transition: Transition) {
        self.current.transitions.push(transition);
    }

    /// Move the in-progress buffer into the completed list and start afresh.
    ///
    /// Sealing an empty buffer is a no-op.
    pub fn seal(&mut self) {
        if self.current.is_empty() {
            return;
        }
        self.completed.push(std::mem::take(&mut self.current));
    }

    pub fn current(&self) -> &Episode {
        &self.current
    }

    pub fn completed(&self) -> &[Episode] {
        &self.completed
    }

    pub fn clear(&mut self) {
        self.current = Episode::default();
        self.completed.clear();
    }
}

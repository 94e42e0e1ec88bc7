//! Configuration types for sandbox creation.

use std::time::Duration;

use crate::{
    Result,
    gridworld::GridLayout,
    q_learning::{DEFAULT_MAX_PATH_STEPS, TrainerConfig},
    sandbox::DEFAULT_LOG_CAPACITY,
};

/// Pause between replay frames unless configured otherwise.
pub const DEFAULT_REPLAY_DELAY: Duration = Duration::from_millis(350);

/// Configuration for creating a [`Sandbox`](crate::sandbox::Sandbox).
///
/// Builder-style: start from [`SandboxConfig::default`] (the campus map with
/// the stock training schedule) or [`SandboxConfig::new`] with a custom
/// layout, then override what you need.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use campusquest::app::SandboxConfig;
/// use campusquest::q_learning::TrainerConfig;
///
/// let config = SandboxConfig::default()
///     .with_seed(42)
///     .with_trainer(TrainerConfig::default().with_episodes(500))
///     .with_replay_delay(Duration::ZERO);
/// ```
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    /// Grid, landmarks and walls
    pub layout: GridLayout,
    /// Hyper-parameters for every training run
    pub trainer: TrainerConfig,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
    /// Pause after each replayed cell
    pub replay_delay: Duration,
    /// Maximum number of event log entries kept
    pub log_capacity: usize,
    /// Iteration cap for learned-path extraction
    pub path_max_steps: usize,
}

impl SandboxConfig {
    /// Create a configuration for `layout` with default values elsewhere:
    /// - Trainer: `TrainerConfig::default()` (2500 episodes, α 0.5, γ 0.99)
    /// - Seed: None (non-deterministic)
    /// - Replay delay: 350 ms
    /// - Log capacity: 200 entries
    /// - Path cap: 300 steps
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            trainer: TrainerConfig::default(),
            seed: None,
            replay_delay: DEFAULT_REPLAY_DELAY,
            log_capacity: DEFAULT_LOG_CAPACITY,
            path_max_steps: DEFAULT_MAX_PATH_STEPS,
        }
    }

    /// Set the training hyper-parameters.
    pub fn with_trainer(mut self, trainer: TrainerConfig) -> Self {
        self.trainer = trainer;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_replay_delay(mut self, delay: Duration) -> Self {
        self.replay_delay = delay;
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn with_path_max_steps(mut self, max_steps: usize) -> Self {
        self.path_max_steps = max_steps;
        self
    }

    /// Check the layout and trainer settings.
    pub fn validate(&self) -> Result<()> {
        self.layout.validate()?;
        self.trainer.validate()
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self::new(GridLayout::campus())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_schedule() {
        let config = SandboxConfig::default();
        assert_eq!(config.replay_delay, Duration::from_millis(350));
        assert_eq!(config.log_capacity, 200);
        assert_eq!(config.path_max_steps, 300);
        assert_eq!(config.trainer.episodes, 2500);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = SandboxConfig::default()
            .with_seed(7)
            .with_log_capacity(10)
            .with_trainer(TrainerConfig::default().with_max_steps(0));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.log_capacity, 10);
        assert!(config.validate().is_err());
    }
}

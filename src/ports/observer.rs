//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training runs, allowing
//! composable data collection without coupling the trainers to specific
//! output formats or metrics.

use crate::{
    Result,
    q_learning::{Algorithm, EpisodeSummary, TrainingSummary},
    types::Transition,
};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during
/// training. Examples include:
/// - Progress bars for user feedback
/// - JSONL export for analysis
/// - Metrics tracking for evaluation
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(algorithm, total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each transition the agent takes
///    - `on_episode_end(summary)`
/// 3. `on_training_end(summary)` - Once at the end
///
/// Returning an error from any hook aborts the run; nothing is committed.
///
/// # Examples
///
/// ```no_run
/// use campusquest::{ports::Observer, q_learning::EpisodeSummary};
///
/// struct GoalCounter {
///     reached: usize,
/// }
///
/// impl Observer for GoalCounter {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> campusquest::Result<()> {
///         if summary.reached_target {
///             self.reached += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Parameters
    ///
    /// * `algorithm` - Which update rule is being trained
    /// * `total_episodes` - Total number of episodes that will be run
    fn on_training_start(&mut self, _algorithm: Algorithm, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts (0-based index).
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every transition, once the value model has been updated.
    ///
    /// # Parameters
    ///
    /// * `episode` - Index of the current episode
    /// * `step` - Step number within the episode (0-based)
    /// * `transition` - State, action, next state and reward of the step
    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called when an episode reaches the target or the step cap.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called when the whole episode budget has been spent.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        Ok(())
    }
}

//! Observer adapters for training runs
//!
//! Observers allow composable data collection during training without coupling
//! the trainers to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::Observer,
    q_learning::{Algorithm, EpisodeSummary, TrainingSummary},
    types::Transition,
};

/// Complete observation of a training episode, one JSON line each
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeObservation {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    pub reached_target: bool,
    pub epsilon: f64,
    /// Only filled when step recording is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<Transition>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    reached: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            reached: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, algorithm: Algorithm, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:>5} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        pb.set_prefix(algorithm.label());
        self.reached = 0;
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        if summary.reached_target {
            self.reached += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(format!("goal:{} ε:{:.3}", self.reached, summary.epsilon));
        }
        Ok(())
    }

    fn on_training_end(&mut self, summary: &TrainingSummary) -> Result<()> {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_with_message(format!(
                "goal:{} ε:{:.3}",
                summary.episodes_reached_target, summary.final_epsilon
            ));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    episodes: usize,
    reached: usize,
    step_counts: Vec<usize>,
    returns: Vec<f64>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of episodes that reached the target
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.reached as f64 / self.episodes as f64
        }
    }

    pub fn avg_episode_length(&self) -> f64 {
        mean(self.step_counts.iter().map(|&s| s as f64))
    }

    pub fn avg_return(&self) -> f64 {
        mean(self.returns.iter().copied())
    }

    /// Average return over the last `window` episodes.
    pub fn recent_return(&self, window: usize) -> f64 {
        let skip = self.returns.len().saturating_sub(window);
        mean(self.returns[skip..].iter().copied())
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            episodes_reached_target: self.reached,
            success_rate: self.success_rate(),
            avg_episode_length: self.avg_episode_length(),
            avg_return: self.avg_return(),
            recent_return: self.recent_return(100),
        }
    }
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let len = values.len();
    if len == 0 {
        0.0
    } else {
        values.sum::<f64>() / len as f64
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub episodes_reached_target: usize,
    pub success_rate: f64,
    pub avg_episode_length: f64,
    pub avg_return: f64,
    /// Mean return of the last 100 episodes
    pub recent_return: f64,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        if summary.reached_target {
            self.reached += 1;
        }
        self.step_counts.push(summary.steps);
        self.returns.push(summary.total_reward);
        Ok(())
    }
}

/// JSONL observer - Exports episode observations to JSON Lines format
pub struct JsonlObserver {
    writer: BufWriter<File>,
    record_steps: bool,
    current_steps: Vec<Transition>,
}

impl JsonlObserver {
    /// Create a new JSONL observer writing one summary line per episode
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create observations file {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            record_steps: false,
            current_steps: Vec::new(),
        })
    }

    /// Also embed every transition of each episode.
    pub fn with_steps(mut self, record_steps: bool) -> Self {
        self.record_steps = record_steps;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _step: usize, transition: &Transition) -> Result<()> {
        if self.record_steps {
            self.current_steps.push(*transition);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let observation = EpisodeObservation {
            episode: summary.episode,
            steps: summary.steps,
            total_reward: summary.total_reward,
            reached_target: summary.reached_target,
            epsilon: summary.epsilon,
            transitions: std::mem::take(&mut self.current_steps),
        };

        // Write as JSONL (one JSON object per line)
        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self, _summary: &TrainingSummary) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Milestone observer - Tracks key learning achievements
///
/// Records the first episode that reached the target and the last one that
/// did not. Once `last_failure < first_success` the greedy policy has been
/// hitting the goal consistently since its first success.
#[derive(Debug, Default)]
pub struct MilestoneObserver {
    first_success: Option<usize>,
    last_failure: Option<usize>,
    episodes: usize,
}

impl MilestoneObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the first episode that reached the target (if any)
    pub fn first_success(&self) -> Option<usize> {
        self.first_success
    }

    /// Get the last episode that hit the step cap (if any)
    pub fn last_failure(&self) -> Option<usize> {
        self.last_failure
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Display milestone summary
    pub fn display_summary(&self) {
        println!("\n=== Learning Milestones ===");
        match self.first_success {
            Some(episode) => println!("  First goal reached: episode #{}", episode + 1),
            None => println!("  First goal reached: not achieved"),
        }
        match self.last_failure {
            Some(episode) => println!("  Last missed episode: #{}", episode + 1),
            None => println!("  Last missed episode: none"),
        }
        if let (Some(success), Some(failure)) = (self.first_success, self.last_failure) {
            if failure < success {
                println!("  ✓ Reached the goal in every episode since the first success");
            } else {
                println!("  Episodes since last miss: {}", self.episodes - failure - 1);
            }
        }
    }
}

impl Observer for MilestoneObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        if summary.reached_target {
            self.first_success.get_or_insert(summary.episode);
        } else {
            self.last_failure = Some(summary.episode);
        }
        Ok(())
    }
}

/// Share an observer with the caller so its data can be read after the
/// trainer (which owns its observers) is done.
impl<O: Observer> Observer for Arc<Mutex<O>> {
    fn on_training_start(&mut self, algorithm: Algorithm, total_episodes: usize) -> Result<()> {
        lock(self).on_training_start(algorithm, total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        lock(self).on_episode_start(episode)
    }

    fn on_step(&mut self, episode: usize, step: usize, transition: &Transition) -> Result<()> {
        lock(self).on_step(episode, step, transition)
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        lock(self).on_episode_end(summary)
    }

    fn on_training_end(&mut self, summary: &TrainingSummary) -> Result<()> {
        lock(self).on_training_end(summary)
    }
}

fn lock<O>(shared: &Mutex<O>) -> std::sync::MutexGuard<'_, O> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

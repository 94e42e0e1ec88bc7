//! Q-learning, SARSA and linear-approximation training loops
//!
//! A [`Trainer`] never touches shared state: it takes ownership of a
//! [`ValueModels`] snapshot, evolves it for the whole episode budget and hands
//! the result back. The caller decides whether to commit it.

use std::{fmt, str::FromStr};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    linear::LinearModel,
    policy::{self, ActionValues},
    q_table::QTable,
};
use crate::{
    Error, Result,
    gridworld::{Environment, StepCost},
    ports::Observer,
    types::Transition,
};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Which update rule to train with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Off-policy tabular TD control
    QLearning,
    /// On-policy tabular TD control
    Sarsa,
    /// Q-learning over the three-weight linear model ("DQN")
    Linear,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::QLearning, Algorithm::Sarsa, Algorithm::Linear];

    /// Short identifier used by the front end (`Q`, `SARSA`, `DQN`).
    pub fn label(self) -> &'static str {
        match self {
            Algorithm::QLearning => "Q",
            Algorithm::Sarsa => "SARSA",
            Algorithm::Linear => "DQN",
        }
    }

    /// Whether the algorithm trains the tabular store (as opposed to the
    /// linear weights).
    pub fn is_tabular(self) -> bool {
        !matches!(self, Algorithm::Linear)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q" | "q-learning" | "qlearning" | "q_learning" => Ok(Algorithm::QLearning),
            "sarsa" => Ok(Algorithm::Sarsa),
            "dqn" | "linear" => Ok(Algorithm::Linear),
            other => Err(Error::ParseAlgorithm {
                input: other.to_string(),
                expected: "q, sarsa, dqn".to_string(),
            }),
        }
    }
}

/// Learning rate and discount factor for a TD update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdParams {
    /// α parameter (0.0 to 1.0)
    pub learning_rate: f64,
    /// γ parameter (0.0 to 1.0)
    pub discount_factor: f64,
}

/// Hyper-parameters shared by all three trainers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// α
    pub learning_rate: f64,
    /// γ
    pub discount_factor: f64,
    /// Initial exploration rate
    pub epsilon: f64,
    /// Multiplicative decay per episode
    pub epsilon_decay: f64,
    /// Minimum exploration rate
    pub min_epsilon: f64,
    /// Number of training episodes
    pub episodes: usize,
    /// Step cap per episode
    pub max_steps: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount_factor: 0.99,
            epsilon: 1.0,
            epsilon_decay: 0.995,
            min_epsilon: 0.01,
            episodes: 2500,
            max_steps: 500,
        }
    }
}

impl TrainerConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the exploration schedule.
    pub fn with_exploration(mut self, epsilon: f64, decay: f64, min_epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self.epsilon_decay = decay;
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn td_params(&self) -> TdParams {
        TdParams {
            learning_rate: self.learning_rate,
            discount_factor: self.discount_factor,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let unit = 0.0..=1.0;
        let checks = [
            (unit.contains(&self.learning_rate), "learning_rate must be in [0, 1]"),
            (unit.contains(&self.discount_factor), "discount_factor must be in [0, 1]"),
            (unit.contains(&self.epsilon), "epsilon must be in [0, 1]"),
            (unit.contains(&self.epsilon_decay), "epsilon_decay must be in [0, 1]"),
            (unit.contains(&self.min_epsilon), "min_epsilon must be in [0, 1]"),
            (self.max_steps > 0, "max_steps must be positive"),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, message)) => Err(Error::InvalidConfiguration {
                message: message.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Both value representations, trained independently.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueModels {
    pub table: QTable,
    pub linear: LinearModel,
}

impl ValueModels {
    /// Zeroed table and freshly randomised linear weights.
    pub fn new<R: Rng + ?Sized>(height: usize, width: usize, rng: &mut R) -> Self {
        Self {
            table: QTable::new(height, width),
            linear: LinearModel::new(rng),
        }
    }

    /// The representation `algorithm` trains and acts on.
    pub fn for_algorithm(&self, algorithm: Algorithm) -> &dyn ActionValues {
        if algorithm.is_tabular() {
            &self.table
        } else {
            &self.linear
        }
    }
}

/// What happened during one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub steps: usize,
    pub total_reward: f64,
    pub reached_target: bool,
    /// Exploration rate the episode was played with
    pub epsilon: f64,
}

/// Totals for a completed training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub algorithm: Algorithm,
    pub episodes: usize,
    pub episodes_reached_target: usize,
    pub total_steps: usize,
    pub final_epsilon: f64,
}

impl TrainingSummary {
    pub fn success_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.episodes_reached_target as f64 / self.episodes as f64
        }
    }
}

/// The evolved models plus run statistics.
#[derive(Debug, Clone)]
pub struct TrainingRun {
    pub models: ValueModels,
    pub summary: TrainingSummary,
}

#[derive(Debug, Clone, Copy)]
struct Exploration {
    epsilon: f64,
    decay: f64,
    min: f64,
}

impl Exploration {
    /// Decay epsilon after episode
    fn decay(&mut self) {
        if self.epsilon > self.min {
            self.epsilon = (self.epsilon * self.decay).max(self.min);
        }
    }
}

/// Runs training episodes and notifies observers along the way.
pub struct Trainer {
    config: TrainerConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TrainerConfig) {
        self.config = config;
    }

    /// Train `algorithm` from the environment's start cell.
    ///
    /// Consumes `models` and returns the evolved copy; only the
    /// representation the algorithm uses is modified.
    ///
    /// # Errors
    ///
    /// [`Error::MissingTarget`] if the environment has no target landmark,
    /// [`Error::InvalidConfiguration`] for out-of-range hyper-parameters, or
    /// whatever an observer reports.
    pub fn train<R: Rng + ?Sized>(
        &mut self,
        algorithm: Algorithm,
        env: &Environment,
        mut models: ValueModels,
        rng: &mut R,
    ) -> Result<TrainingRun> {
        let target = env.target().ok_or(Error::MissingTarget)?;
        self.config.validate()?;

        let params = self.config.td_params();
        let mut exploration = Exploration {
            epsilon: self.config.epsilon,
            decay: self.config.epsilon_decay,
            min: self.config.min_epsilon,
        };
        let mut episodes_reached_target = 0;
        let mut total_steps = 0;

        for observer in &mut self.observers {
            observer.on_training_start(algorithm, self.config.episodes)?;
        }

        for episode in 0..self.config.episodes {
            for observer in &mut self.observers {
                observer.on_episode_start(episode)?;
            }

            let epsilon = exploration.epsilon;
            let mut pos = env.start();
            let mut action =
                policy::select_action(models.for_algorithm(algorithm), pos, epsilon, rng);
            let mut steps = 0;
            let mut total_reward = 0.0;
            let mut reached_target = false;

            for step in 0..self.config.max_steps {
                let next = env.transition(pos, action);
                let reward = env.reward(next, StepCost::Training);

                let next_action = match algorithm {
                    Algorithm::QLearning => {
                        // Off-policy: bootstrap from max Q(s'), then choose afresh
                        models
                            .table
                            .q_learning_update(pos, action, reward, next, params);
                        policy::select_action(&models.table, next, epsilon, rng)
                    }
                    Algorithm::Sarsa => {
                        // On-policy: commit to a' first and bootstrap from it
                        let next_action = policy::select_action(&models.table, next, epsilon, rng);
                        models
                            .table
                            .sarsa_update(pos, action, reward, next, next_action, params);
                        next_action
                    }
                    Algorithm::Linear => {
                        models.linear.td_update(pos, action, reward, next, params);
                        policy::select_action(&models.linear, next, epsilon, rng)
                    }
                };

                let transition = Transition {
                    state: pos,
                    action,
                    next,
                    reward,
                };
                for observer in &mut self.observers {
                    observer.on_step(episode, step, &transition)?;
                }

                steps += 1;
                total_reward += reward;
                pos = next;
                action = next_action;

                if next == target {
                    reached_target = true;
                    break;
                }
            }

            total_steps += steps;
            if reached_target {
                episodes_reached_target += 1;
            }
            exploration.decay();

            let summary = EpisodeSummary {
                episode,
                steps,
                total_reward,
                reached_target,
                epsilon,
            };
            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
        }

        let summary = TrainingSummary {
            algorithm,
            episodes: self.config.episodes,
            episodes_reached_target,
            total_steps,
            final_epsilon: exploration.epsilon,
        };
        for observer in &mut self.observers {
            observer.on_training_end(&summary)?;
        }

        Ok(TrainingRun { models, summary })
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(TrainerConfig::default())
    }
}

//! CampusQuest grid-world reinforcement learning sandbox
//!
//! This crate provides:
//! - An editable grid world with reward landmarks, walls and a default campus map
//! - Tabular Q-learning and SARSA, plus a linear-approximation "DQN"
//! - Greedy path extraction with stuck-state fallback and cycle detection
//! - A stateful sandbox with busy guards, manual play, replay and an event log
//! - Training observers, CSV export and a command-line front end

pub mod app;
pub mod cli;
pub mod error;
pub mod export;
pub mod gridworld;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod recorder;
pub mod sandbox;
pub mod types;

pub use app::SandboxConfig;
pub use error::{Error, Result};
pub use gridworld::{Environment, GridLayout, Landmark};
pub use q_learning::{Algorithm, QTable, Trainer, TrainerConfig};
pub use sandbox::Sandbox;
pub use types::{Action, Cell, Transition};

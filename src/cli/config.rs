//! Shared argument groups for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::{app::SandboxConfig, gridworld::GridLayout, q_learning::TrainerConfig};

/// Where the map comes from
#[derive(Args, Debug, Clone, Default)]
pub struct LayoutSource {
    /// JSON layout file (defaults to the built-in campus map)
    #[arg(long, short = 'l')]
    pub layout: Option<PathBuf>,
}

impl LayoutSource {
    pub fn load(&self) -> Result<GridLayout> {
        match &self.layout {
            Some(path) => GridLayout::load(path)
                .with_context(|| format!("failed to load layout from {}", path.display())),
            None => Ok(GridLayout::campus()),
        }
    }
}

/// Options common to every command that trains
#[derive(Args, Debug, Clone, Default)]
pub struct TrainingArgs {
    #[command(flatten)]
    pub layout: LayoutSource,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of training episodes [default: 2500]
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Step cap per episode [default: 500]
    #[arg(long)]
    pub max_steps: Option<usize>,
}

impl TrainingArgs {
    /// Build a sandbox configuration; unset flags keep the stock schedule.
    pub fn to_config(&self) -> Result<SandboxConfig> {
        let mut trainer = TrainerConfig::default();
        if let Some(episodes) = self.episodes {
            trainer = trainer.with_episodes(episodes);
        }
        if let Some(max_steps) = self.max_steps {
            trainer = trainer.with_max_steps(max_steps);
        }

        let mut config = SandboxConfig::new(self.layout.load()?).with_trainer(trainer);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config.validate().context("invalid sandbox configuration")?;
        Ok(config)
    }
}

//! CampusQuest CLI - Grid-world reinforcement learning sandbox
//!
//! This CLI provides a unified interface for:
//! - Training Q-learning, SARSA and the linear "DQN" on a campus map
//! - Replaying the learned path step by step
//! - Walking the agent manually and exporting the trajectory
//! - Printing and validating layouts

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "campusquest")]
#[command(version, about = "Grid-world reinforcement learning sandbox", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train an algorithm and report the learned path
    Train(Box<campusquest::cli::commands::train::TrainArgs>),

    /// Train, then animate the learned path
    Replay(campusquest::cli::commands::replay::ReplayArgs),

    /// Move the agent by hand
    Walk(campusquest::cli::commands::walk::WalkArgs),

    /// Print, render or save a layout
    Layout(campusquest::cli::commands::layout::LayoutArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => campusquest::cli::commands::train::execute(*args),
        Commands::Replay(args) => campusquest::cli::commands::replay::execute(args),
        Commands::Walk(args) => campusquest::cli::commands::walk::execute(args),
        Commands::Layout(args) => campusquest::cli::commands::layout::execute(args),
    }
}

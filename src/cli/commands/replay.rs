//! Replay command - Train, then animate the learned path in the terminal

use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::{
    cli::{
        config::TrainingArgs,
        output::{print_section, render_grid},
    },
    q_learning::Algorithm,
    sandbox::{LogEntry, ReplayFrame, Sandbox},
};

#[derive(Parser, Debug)]
#[command(about = "Train an algorithm and replay its learned path")]
pub struct ReplayArgs {
    /// Algorithm to train (q, sarsa, dqn)
    pub algorithm: Algorithm,

    #[command(flatten)]
    pub training: TrainingArgs,

    /// Pause between frames in milliseconds
    #[arg(long, default_value_t = 350)]
    pub delay_ms: u64,

    /// Print only the frame lines, not the grid
    #[arg(long)]
    pub quiet: bool,
}

pub fn execute(args: ReplayArgs) -> Result<()> {
    let config = args
        .training
        .to_config()?
        .with_replay_delay(Duration::from_millis(args.delay_ms));
    let mut sandbox = Sandbox::new(config)?;

    println!("Training {}...", args.algorithm);
    sandbox
        .train(args.algorithm)?
        .ok_or_else(|| anyhow!("sandbox refused to start training"))?;

    print_section(&format!("Replaying {} path", args.algorithm));
    let quiet = args.quiet;
    let delay = sandbox.replay_delay();
    sandbox.play_learned_path(delay, |sandbox, frame| {
        print_frame(sandbox, frame, quiet);
    })?;

    if sandbox.victory() {
        println!("\nVictory!");
    } else if let Some(LogEntry::ReplayFinished) = sandbox.log().latest() {
        println!("\nPath finished without reaching the target.");
    }
    Ok(())
}

fn print_frame(sandbox: &Sandbox, frame: &ReplayFrame, quiet: bool) {
    let mut line = format!("step {:>3}: {}", frame.index, frame.cell);
    if let Some(hit) = &frame.landmark {
        let sign = if hit.reward > 0.0 { "+" } else { "" };
        line.push_str(&format!("  {} {} {sign}{}", hit.glyph, hit.name, hit.reward));
    }
    println!("{line}");
    if !quiet {
        println!(
            "{}",
            render_grid(
                sandbox.environment(),
                Some(sandbox.agent()),
                sandbox.learned_path()
            )
        );
    }
}

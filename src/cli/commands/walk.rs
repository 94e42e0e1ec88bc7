//! Walk command - Drive the agent by hand and record the trajectory

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    app::SandboxConfig,
    cli::{
        config::LayoutSource,
        output::{print_kv, print_section, render_grid},
    },
    export::GridCsvExporter,
    recorder::Episode,
    sandbox::Sandbox,
    types::Action,
};

#[derive(Parser, Debug)]
#[command(about = "Move the agent manually, e.g. --moves UURRRD")]
pub struct WalkArgs {
    /// Moves as letters (U, R, D, L); separators are ignored
    #[arg(long, short = 'm')]
    pub moves: String,

    #[command(flatten)]
    pub layout: LayoutSource,

    /// Export recorded episodes to CSV
    #[arg(long)]
    pub export_episodes: Option<PathBuf>,
}

/// Split a move string into actions, skipping whitespace, commas and dashes.
pub fn parse_moves(moves: &str) -> Result<Vec<Action>> {
    moves
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, ',' | '-'))
        .map(|c| {
            c.to_string()
                .parse::<Action>()
                .with_context(|| format!("invalid move '{c}'"))
        })
        .collect()
}

pub fn execute(args: WalkArgs) -> Result<()> {
    let actions = parse_moves(&args.moves)?;
    let mut sandbox = Sandbox::new(SandboxConfig::new(args.layout.load()?))?;

    print_section("Manual walk");
    let mut total = 0.0;
    for (step, &action) in actions.iter().enumerate() {
        let Some(event) = sandbox.move_agent(action) else {
            println!(
                "Victory reached; ignoring {} remaining move(s)",
                actions.len() - step
            );
            break;
        };
        total += event.reward();
        let t = event.transition;
        let mut line = format!(
            "{:>3}. {:<5} {} -> {}  {:+.2}",
            step + 1,
            action,
            t.state,
            t.next,
            t.reward
        );
        if let Some(hit) = &event.landmark {
            line.push_str(&format!("  {} {}", hit.glyph, hit.name));
        }
        if event.victory {
            line.push_str("  VICTORY!");
        }
        println!("{line}");
    }

    println!(
        "\n{}",
        render_grid(sandbox.environment(), Some(sandbox.agent()), &[])
    );
    print_kv("Total reward", &format!("{total:.2}"));

    let recorder = sandbox.recorder();
    print_kv("Episodes completed", &recorder.completed().len().to_string());

    if let Some(path) = &args.export_episodes {
        let mut episodes: Vec<Episode> = recorder.completed().to_vec();
        if !recorder.current().is_empty() {
            episodes.push(recorder.current().clone());
        }
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        GridCsvExporter::write(file, &GridCsvExporter::episode_records(&episodes))?;
        println!("\nEpisodes written to {}", path.display());
    }
    Ok(())
}

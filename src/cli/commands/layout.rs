//! Layout command - Print, validate or save grid layouts

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        config::LayoutSource,
        output::{print_kv, render_grid},
    },
    gridworld::{Environment, GridLayout},
};

#[derive(Parser, Debug)]
#[command(about = "Print the default layout as JSON, or validate a layout file")]
pub struct LayoutArgs {
    #[command(flatten)]
    pub source: LayoutSource,

    /// Write the layout to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Draw the grid instead of printing JSON
    #[arg(long)]
    pub render: bool,
}

pub fn execute(args: LayoutArgs) -> Result<()> {
    let layout = args.source.load()?;

    if args.render {
        print_overview(&layout);
        return Ok(());
    }

    match &args.output {
        Some(path) => {
            layout
                .save(path)
                .with_context(|| format!("failed to save layout to {}", path.display()))?;
            println!("Layout written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&layout)?),
    }
    Ok(())
}

fn print_overview(layout: &GridLayout) {
    let env = Environment::from_layout(layout);
    println!("{}", render_grid(&env, None, &[]));
    print_kv("Size", &format!("{}x{}", layout.height(), layout.width()));
    print_kv("Walls", &layout.walls().count().to_string());
    for (name, lm) in layout.landmarks() {
        let role = if lm.is_start {
            " (start)"
        } else if lm.is_target {
            " (target)"
        } else {
            ""
        };
        print_kv(
            name,
            &format!("{} {} at {}{role}", lm.glyph, lm.reward, lm.position),
        );
    }
}

//! Train command - Train one algorithm on a layout and report the learned path

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    cli::{
        config::TrainingArgs,
        output::{format_number, format_path, print_kv, print_section, render_grid},
    },
    export::GridCsvExporter,
    pipeline::{JsonlObserver, MetricsObserver, MetricsSummary, MilestoneObserver, ProgressObserver},
    q_learning::{Algorithm, TrainerConfig, TrainingSummary},
    sandbox::{Sandbox, TrainingReport},
    types::Cell,
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    training: TrainingSummary,
    metrics: MetricsSummary,
    path: Vec<Cell>,
    reaches_target: bool,
    metadata: SummaryMetadata,
}

#[derive(Debug, Serialize)]
struct SummaryMetadata {
    algorithm: Algorithm,
    height: usize,
    width: usize,
    trainer: TrainerConfig,
    seed: Option<u64>,
}

fn sanitize_summary_path(raw: &Path) -> PathBuf {
    let mut normalized = raw.to_path_buf();
    let raw_str = raw.as_os_str().to_string_lossy();

    // Treat trailing separators or missing filename as a directory target.
    if raw_str.ends_with(std::path::MAIN_SEPARATOR) || normalized.file_name().is_none() {
        normalized.push("training_summary.json");
        return normalized;
    }

    match normalized.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => normalized,
        _ => {
            normalized.set_extension("json");
            normalized
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train an algorithm on a layout")]
pub struct TrainArgs {
    /// Algorithm to train (q, sarsa, dqn)
    pub algorithm: Algorithm,

    #[command(flatten)]
    pub training: TrainingArgs,

    /// Show a progress bar
    #[arg(long, short = 'p')]
    pub progress: bool,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Include every transition in the JSONL observations
    #[arg(long, requires = "observations")]
    pub observe_steps: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Export the learned action-values to CSV
    #[arg(long)]
    pub export_q: Option<PathBuf>,

    /// Report the first successful and last failed episode
    #[arg(long)]
    pub track_milestones: bool,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.training.to_config()?;
    let trainer_config = config.trainer.clone();
    let mut sandbox = Sandbox::new(config)?;

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let milestones = Arc::new(Mutex::new(MilestoneObserver::new()));
    {
        let trainer = sandbox.trainer_mut();
        trainer.add_observer(Box::new(Arc::clone(&metrics)));
        if args.track_milestones {
            trainer.add_observer(Box::new(Arc::clone(&milestones)));
        }
        if args.progress {
            trainer.add_observer(Box::new(ProgressObserver::new()));
        }
        if let Some(path) = &args.observations {
            let observer = JsonlObserver::new(path)?.with_steps(args.observe_steps);
            trainer.add_observer(Box::new(observer));
        }
    }

    let report = sandbox
        .train(args.algorithm)?
        .ok_or_else(|| anyhow!("sandbox refused to start training"))?;
    let metrics = metrics
        .lock()
        .map_err(|_| anyhow!("metrics observer poisoned"))?
        .summary();

    print_report(&sandbox, &report, &metrics);
    if args.track_milestones {
        milestones
            .lock()
            .map_err(|_| anyhow!("milestone observer poisoned"))?
            .display_summary();
    }

    if let Some(path) = &args.export_q {
        export_values(&sandbox, args.algorithm, path)?;
        println!("\nAction-values written to {}", path.display());
    }

    if let Some(raw) = &args.summary {
        let summary_path = sanitize_summary_path(raw);
        if summary_path != *raw {
            println!(
                "\n⚠️  Normalizing summary path to {}",
                summary_path.display()
            );
        }
        if let Some(parent) = summary_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let env = sandbox.environment();
        let summary = TrainingSummaryFile {
            training: report.summary.clone(),
            metrics,
            path: report.path.clone(),
            reaches_target: report.reaches_target,
            metadata: SummaryMetadata {
                algorithm: args.algorithm,
                height: env.height(),
                width: env.width(),
                trainer: trainer_config,
                seed: args.training.seed,
            },
        };

        let file = File::create(&summary_path)
            .with_context(|| format!("failed to create {}", summary_path.display()))?;
        to_writer_pretty(file, &summary)?;
        println!("\nSummary written to {}", summary_path.display());
    }

    Ok(())
}

fn print_report(sandbox: &Sandbox, report: &TrainingReport, metrics: &MetricsSummary) {
    let summary = &report.summary;
    print_section(&format!("{} training complete", report.algorithm));
    print_kv("Episodes", &format_number(summary.episodes));
    print_kv(
        "Reached target",
        &format!(
            "{} ({:.1}%)",
            format_number(summary.episodes_reached_target),
            summary.success_rate() * 100.0
        ),
    );
    print_kv("Total steps", &format_number(summary.total_steps));
    print_kv("Avg episode length", &format!("{:.1}", metrics.avg_episode_length));
    print_kv("Recent return", &format!("{:.2}", metrics.recent_return));
    print_kv("Final epsilon", &format!("{:.4}", summary.final_epsilon));

    println!();
    if report.reaches_target {
        print_kv("Learned path", &format!("{} cells", report.path.len()));
    } else {
        print_kv("Learned path", "does not reach the target; train more");
    }
    println!("  {}", format_path(&report.path));
    println!(
        "\n{}",
        render_grid(sandbox.environment(), Some(sandbox.agent()), &report.path)
    );
}

fn export_values(sandbox: &Sandbox, algorithm: Algorithm, path: &Path) -> Result<()> {
    let models = sandbox.models();
    let records = if algorithm.is_tabular() {
        GridCsvExporter::table_records(&models.table)
    } else {
        let env = sandbox.environment();
        GridCsvExporter::linear_records(&models.linear, env.height(), env.width())
    };
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    GridCsvExporter::write(file, &records)?;
    Ok(())
}

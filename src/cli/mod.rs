//! Command-line interface
//!
//! Two subcommands mirror the tool's pipeline: `generate` writes a synthetic
//! telemetry CSV, `detect` trains a forest on a telemetry CSV, scores every
//! record, flags anomalies against a threshold, and writes the scored
//! results for downstream reporting.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use crate::data::csv_io;
use crate::error::Result;
use crate::forest::{ForestConfig, IsolationForest};
use crate::scoring::{classify, ThresholdSweep};
use crate::synthetic::TelemetryGenerator;

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Isolation-forest anomaly detection for system activity telemetry")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate synthetic system activity telemetry
    Generate {
        /// Output CSV path
        #[arg(long, default_value = "data/system_activity_logs.csv")]
        output: PathBuf,
        /// Number of normal records
        #[arg(long, default_value_t = 1000)]
        normal: usize,
        /// Number of anomalous records
        #[arg(long, default_value_t = 20)]
        anomalies: usize,
        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Score a telemetry CSV and flag anomalies
    Detect {
        /// Input telemetry CSV
        input: PathBuf,
        /// Output CSV with scores and flags
        #[arg(long, default_value = "anomaly_results.csv")]
        output: PathBuf,
        /// Number of trees in the ensemble
        #[arg(long, default_value_t = 100)]
        trees: usize,
        /// Records sampled per tree (clamped to the dataset size)
        #[arg(long, default_value_t = 256)]
        subsample: usize,
        /// Depth cap per tree; defaults to ceil(log2(subsample))
        #[arg(long)]
        max_depth: Option<usize>,
        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Score cutoff; records scoring above it are flagged
        #[arg(long, default_value_t = 0.6)]
        threshold: f64,
        /// How many top-scoring records to print
        #[arg(long, default_value_t = 5)]
        top: usize,
    },
}

pub fn cmd_generate(output: &Path, normal: usize, anomalies: usize, seed: u64) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let batch = TelemetryGenerator::new()
        .with_normal_count(normal)
        .with_anomaly_count(anomalies)
        .with_seed(seed)
        .generate();
    csv_io::write_telemetry(output, &batch.records)?;

    info!(normal, anomalies, seed, "generated synthetic telemetry");
    println!(
        "  {} wrote {} records ({} normal, {} anomalous) to {}",
        "✓".green(),
        normal + anomalies,
        normal,
        anomalies,
        output.display()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_detect(
    input: &Path,
    output: &Path,
    trees: usize,
    subsample: usize,
    max_depth: Option<usize>,
    seed: u64,
    threshold: f64,
    top: usize,
) -> Result<()> {
    let dataset = csv_io::load_telemetry(input)?;
    info!(
        records = dataset.n_records(),
        features = dataset.arity(),
        "loaded telemetry"
    );

    // Small inputs get a proportionally smaller subsample; the engine itself
    // refuses oversized subsamples.
    let effective_subsample = subsample.min(dataset.n_records());
    if effective_subsample < subsample {
        info!(subsample = effective_subsample, "clamped subsample to dataset size");
    }

    let mut config = ForestConfig::new()
        .with_tree_count(trees)
        .with_subsample_size(effective_subsample)
        .with_seed(seed);
    if let Some(depth) = max_depth {
        config = config.with_max_depth(depth);
    }

    let forest = IsolationForest::train(&dataset, &config)?;
    let table = forest.score(&dataset)?;
    let flags = classify(&table, threshold);
    csv_io::write_scored(output, &dataset, table.scores(), &flags)?;

    let flagged = flags.iter().filter(|&&f| f).count();
    println!(
        "  {} scored {} records with {} trees (subsample {}, seed {})",
        "✓".green(),
        dataset.n_records(),
        forest.tree_count(),
        forest.subsample_size(),
        seed
    );
    println!(
        "  {} {} anomalies above threshold {:.2}, results in {}",
        "✓".green(),
        flagged.to_string().red().bold(),
        threshold,
        output.display()
    );

    if top > 0 {
        let sweep = ThresholdSweep::new(&table);
        println!("\n  {}", "top anomalies".bold());
        for &(score, index) in sweep.top(top) {
            let row: Vec<String> = dataset
                .record(index)
                .iter()
                .map(|v| format!("{v:.1}"))
                .collect();
            println!(
                "  {:>6}  score {:.3}  [{}]",
                format!("#{index}").dimmed(),
                score,
                row.join(", ")
            );
        }
    }

    Ok(())
}

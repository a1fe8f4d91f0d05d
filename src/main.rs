//! sentinel - CLI entry point

use clap::Parser;
use sentinel_iforest::cli::{cmd_detect, cmd_generate, Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sentinel=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            output,
            normal,
            anomalies,
            seed,
        } => {
            cmd_generate(&output, normal, anomalies, seed)?;
        }
        Commands::Detect {
            input,
            output,
            trees,
            subsample,
            max_depth,
            seed,
            threshold,
            top,
        } => {
            cmd_detect(
                &input, &output, trees, subsample, max_depth, seed, threshold, top,
            )?;
        }
    }

    Ok(())
}

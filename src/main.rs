use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use biomedia_eval::config::PathOverrides;
use biomedia_eval::{driver, EvalConfig};

#[derive(Parser)]
#[command(name = "biomedia-eval")]
#[command(about = "Score motility and morphology prediction submissions against ground truth", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score every .csv submission in a directory
    Evaluate {
        /// JSON config file; flags below override its values
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory holding <prefix>_<team>_<task>_<run>.csv files
        #[arg(short, long)]
        submissions: Option<PathBuf>,

        /// Semicolon-delimited ground-truth CSV
        #[arg(short, long)]
        ground_truth: Option<PathBuf>,

        /// Output root for <team>/<task>/<run>/ report directories
        #[arg(short, long)]
        results: Option<PathBuf>,

        /// Also write all reports as a JSON array to this file
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Check a comma-delimited id,value submission for duplicate identifiers
    Inspect {
        /// Submission file
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Evaluate {
            config,
            submissions,
            ground_truth,
            results,
            summary,
        } => {
            let overrides = PathOverrides {
                submissions_directory: submissions,
                ground_truth_path: ground_truth,
                results_directory: results,
            };
            EvalConfig::resolve(config.as_deref(), overrides)
                .context("resolving configuration")
                .and_then(|config| evaluate(&config, summary))
        }
        Commands::Inspect { file } => inspect(&file),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn evaluate(config: &EvalConfig, summary: Option<PathBuf>) -> Result<ExitCode> {
    let evaluations = driver::run(config)?;
    if let Some(path) = summary {
        driver::write_summary(&evaluations, &path)?;
    }
    log::info!("Evaluated {} submission(s)", evaluations.len());
    Ok(ExitCode::SUCCESS)
}

fn inspect(file: &Path) -> Result<ExitCode> {
    let inspection = driver::inspect(file)?;
    print!("{inspection}");
    Ok(if inspection.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

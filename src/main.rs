//! VLM extraction experiments CLI
//!
//! Runs structured-data extraction experiments on scanned Utrecht 1899
//! tax records against Gemini vision models.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;
use vlm_experiments::{
    assets::ExperimentAssets,
    config::Config,
    experiment::{self, IMAGE_FILES, MODELS, THINKING_BUDGETS},
    gemini::GeminiClient,
    persistence::scan_json_filenames,
    report::StatusReport,
    runner::{ExperimentRunner, OutputDirs},
};

/// VLM extraction experiments on scanned historical tax records
#[derive(Parser)]
#[command(name = "vlm-experiments")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full experiment grid
    Run {
        /// Directory containing images/, ground_truth/ and prompt.txt
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// Directory for predictions/ and metadata/ output
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,

        /// Fixed delay between generation calls, in seconds
        #[arg(long)]
        delay_secs: Option<u64>,

        /// Save the run summary to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the experiment grid without calling the API
    Plan,

    /// Compare the output directories against the expected grid
    Status {
        /// Directory containing predictions/ and metadata/
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
    },

    /// Test Gemini connection
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            data_dir,
            results_dir,
            delay_secs,
            output,
        } => cmd_run(data_dir, results_dir, delay_secs, output).await,
        Commands::Plan => cmd_plan(),
        Commands::Status { results_dir } => cmd_status(results_dir),
        Commands::Test => cmd_test().await,
    }
}

async fn cmd_run(
    data_dir: PathBuf,
    results_dir: PathBuf,
    delay_secs: Option<u64>,
    output: Option<PathBuf>,
) -> Result<()> {
    println!("Loading configuration...");
    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let delay = delay_secs.unwrap_or(config.gemini.request_delay_secs);

    let client = GeminiClient::new(config.gemini);

    let dirs = OutputDirs::new(&results_dir);
    dirs.ensure().context("Failed to create output directories")?;

    let assets = ExperimentAssets::load(&client, &data_dir, &IMAGE_FILES)
        .await
        .context("Failed to load experiment assets")?;

    let runner =
        ExperimentRunner::new(client, dirs.clone()).with_delay(Duration::from_secs(delay));

    let summary = runner
        .run_all(&assets)
        .await
        .context("Experiment run aborted")?;

    println!("\n{}", "=".repeat(70));
    println!("Experiments complete!");
    println!("Predictions saved to: {}", dirs.predictions.display());
    println!("Metadata saved to: {}", dirs.metadata.display());
    println!("{}", "=".repeat(70));

    summary.print_summary();

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(&output_path, json)?;
        println!("Summary saved to {:?}", output_path);
    }

    Ok(())
}

fn cmd_plan() -> Result<()> {
    let grid = experiment::full_grid();

    println!(
        "Experiment grid: {} models x {} combinations x {} budgets x 2 strategies = {} experiments\n",
        MODELS.len(),
        experiment::example_combinations(IMAGE_FILES.len()).len(),
        THINKING_BUDGETS.len(),
        grid.len()
    );

    for point in &grid {
        let examples: Vec<&str> = point
            .combination
            .examples
            .iter()
            .map(|&i| IMAGE_FILES[i])
            .collect();
        println!("{}", point.id.filename());
        println!("    examples: {}", examples.join(", "));
    }

    Ok(())
}

fn cmd_status(results_dir: PathBuf) -> Result<()> {
    let dirs = OutputDirs::new(&results_dir);

    let expected: BTreeSet<String> = experiment::expected_filenames().into_iter().collect();
    let predictions = scan_json_filenames(&dirs.predictions)?;
    let metadata = scan_json_filenames(&dirs.metadata)?;

    let report = StatusReport::compute(&expected, &predictions, &metadata);
    report.print();

    Ok(())
}

async fn cmd_test() -> Result<()> {
    println!("Testing Gemini connection...\n");

    let config = Config::load().context("Failed to load configuration")?;

    println!("Configuration:");
    println!("  API Base:  {}", config.gemini.api_base);
    println!("  Model:     {}", MODELS[0]);
    println!(
        "  API Key:   {}...",
        &config.gemini.api_key[..config.gemini.api_key.len().min(8)]
    );
    println!();

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Ok(());
    }

    let client = GeminiClient::new(config.gemini);

    println!("Sending test request...");
    match client.test_connection(MODELS[0]).await {
        Ok(()) => {
            println!("Connection successful!");
        }
        Err(e) => {
            println!("Connection failed: {}", e);
        }
    }

    Ok(())
}

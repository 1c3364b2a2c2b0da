//! Experiment execution.
//!
//! `ExperimentRunner::run` contains every per-experiment failure:
//! transport errors, API errors, and malformed model output are logged
//! and the run moves on. Only setup problems (missing assets, missing
//! ground truth) propagate and abort the whole run.

use crate::assets::ExperimentAssets;
use crate::error::{ExtractError, Result};
use crate::experiment::{self, ExperimentId, Strategy, IMAGE_FILES, MODELS, THINKING_BUDGETS};
use crate::gemini::{Content, GeminiClient, UsageMetadata};
use crate::messages;
use crate::persistence::write_pretty_json;
use crate::report::RunSummary;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// The two sibling output directories.
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub predictions: PathBuf,
    pub metadata: PathBuf,
}

impl OutputDirs {
    /// Conventional layout under a results directory.
    pub fn new(results_dir: &Path) -> Self {
        Self {
            predictions: results_dir.join("predictions"),
            metadata: results_dir.join("metadata"),
        }
    }

    /// Create both directories.
    pub fn ensure(&self) -> Result<()> {
        for dir in [&self.predictions, &self.metadata] {
            std::fs::create_dir_all(dir).map_err(|e| ExtractError::io(dir, e))?;
        }
        Ok(())
    }
}

/// Token counts persisted next to each prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageRecord {
    pub candidates_token_count: u32,
    pub thoughts_token_count: u32,
    pub prompt_token_count: u32,
    pub total_token_count: u32,
}

impl From<UsageMetadata> for UsageRecord {
    fn from(usage: UsageMetadata) -> Self {
        Self {
            candidates_token_count: usage.candidates_token_count,
            thoughts_token_count: usage.thoughts_token_count,
            prompt_token_count: usage.prompt_token_count,
            total_token_count: usage.total_token_count,
        }
    }
}

/// Outcome of a single experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Prediction and metadata files were written.
    Saved,
    /// The service returned no text; nothing was written.
    Empty,
    /// The experiment failed; nothing was written.
    Failed(String),
}

/// Runs experiments and writes their output files.
pub struct ExperimentRunner {
    client: GeminiClient,
    dirs: OutputDirs,
    delay: Duration,
}

impl ExperimentRunner {
    pub fn new(client: GeminiClient, dirs: OutputDirs) -> Self {
        Self {
            client,
            dirs,
            delay: Duration::ZERO,
        }
    }

    /// Set a fixed delay inserted after each generation call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Run a single experiment. Never propagates a per-experiment error.
    pub async fn run(&self, id: &ExperimentId, turns: Vec<Content>) -> RunOutcome {
        println!(
            "  Running {} (thinking={}) on {}...",
            id.strategy, id.thinking_budget, id.target_image
        );

        match self.execute(id, turns).await {
            Ok(outcome) => outcome,
            Err(e) => {
                println!("  ✗ Error: {}", e);
                RunOutcome::Failed(e.to_string())
            }
        }
    }

    async fn execute(&self, id: &ExperimentId, turns: Vec<Content>) -> Result<RunOutcome> {
        let generation = self
            .client
            .generate(&id.model, turns, id.thinking_budget)
            .await?;

        let Some(text) = generation.text else {
            println!("  ✗ Empty response");
            return Ok(RunOutcome::Empty);
        };

        // Model output is not schema-validated; anything that is not
        // JSON fails here and the experiment is recorded as failed.
        let prediction: Value = serde_json::from_str(&text)?;

        let filename = id.filename();
        write_pretty_json(&prediction, &self.dirs.predictions.join(&filename))?;
        write_pretty_json(
            &UsageRecord::from(generation.usage),
            &self.dirs.metadata.join(&filename),
        )?;

        println!("  ✓ Saved: {}", filename);
        Ok(RunOutcome::Saved)
    }

    /// Run the full experiment grid, strictly sequentially.
    ///
    /// Ground-truth or asset lookup failures abort the whole run; they
    /// surface while building a conversation, before any request for
    /// that configuration is sent.
    pub async fn run_all(&self, assets: &ExperimentAssets) -> Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary::new();

        for model in MODELS {
            println!("\n{}", "=".repeat(70));
            println!("Model: {}", model);
            println!("{}", "=".repeat(70));

            for combination in experiment::example_combinations(IMAGE_FILES.len()) {
                let target_image = IMAGE_FILES[combination.target];
                println!("\nTarget: {}", target_image);

                for budget in THINKING_BUDGETS {
                    let fewshot_id =
                        ExperimentId::new(target_image, model, Strategy::FewShot, budget);
                    let turns = messages::few_shot(assets, &combination.examples, target_image)?;
                    self.record(&mut summary, &fewshot_id, self.run(&fewshot_id, turns).await);
                    self.pause().await;

                    let zeroshot_id =
                        ExperimentId::new(target_image, model, Strategy::ZeroShot, budget);
                    let turns = messages::zero_shot(assets, target_image)?;
                    self.record(&mut summary, &zeroshot_id, self.run(&zeroshot_id, turns).await);
                    self.pause().await;
                }
            }
        }

        summary.total_time_secs = start.elapsed().as_secs_f64();
        Ok(summary)
    }

    fn record(&self, summary: &mut RunSummary, id: &ExperimentId, outcome: RunOutcome) {
        match outcome {
            RunOutcome::Saved => summary.record_saved(),
            RunOutcome::Empty => summary.record_empty(id.filename()),
            RunOutcome::Failed(reason) => summary.record_failure(id.filename(), reason),
        }
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

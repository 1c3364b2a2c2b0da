//! Run summaries and output-directory status.
//!
//! Output filenames are the only per-experiment record on disk; a
//! failed experiment leaves nothing behind. The run summary and the
//! status diff exist so that "failed" and "never attempted" stay
//! distinguishable without changing that output contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An experiment that failed with an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Output filename the experiment would have produced.
    pub filename: String,
    /// Error message.
    pub reason: String,
}

/// Aggregated outcome of one run over the experiment grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    /// Experiments attempted.
    pub attempted: usize,
    /// Experiments whose prediction and metadata files were written.
    pub saved: usize,
    /// Experiments that returned no text (no files written).
    pub empty_responses: Vec<String>,
    /// Experiments that failed with an error (no files written).
    pub failures: Vec<FailureRecord>,
    /// Total run time in seconds.
    pub total_time_secs: f64,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_saved(&mut self) {
        self.attempted += 1;
        self.saved += 1;
    }

    pub fn record_empty(&mut self, filename: impl Into<String>) {
        self.attempted += 1;
        self.empty_responses.push(filename.into());
    }

    pub fn record_failure(&mut self, filename: impl Into<String>, reason: impl Into<String>) {
        self.attempted += 1;
        self.failures.push(FailureRecord {
            filename: filename.into(),
            reason: reason.into(),
        });
    }

    /// Print summary to stdout.
    pub fn print_summary(&self) {
        println!("\n========== Run Summary ==========");
        println!("Attempted: {}", self.attempted);
        println!("Saved:     {}", self.saved);
        println!("Empty:     {}", self.empty_responses.len());
        println!("Failed:    {}", self.failures.len());
        println!("Time:      {:.1}s", self.total_time_secs);

        if !self.empty_responses.is_empty() {
            println!("\nEmpty responses:");
            for filename in &self.empty_responses {
                println!("  - {}", filename);
            }
        }

        if !self.failures.is_empty() {
            println!("\nFailures:");
            for failure in &self.failures {
                println!("  - {}: {}", failure.filename, failure.reason);
            }
        }

        println!("=================================");
    }
}

/// Comparison of the output directories against the expected grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    /// Size of the expected experiment grid.
    pub expected: usize,
    /// Identities with both a prediction and a metadata file.
    pub complete: Vec<String>,
    /// Identities with no file at all.
    pub missing: Vec<String>,
    /// Identities with a prediction file but no metadata file.
    pub predictions_only: Vec<String>,
    /// Identities with a metadata file but no prediction file.
    pub metadata_only: Vec<String>,
    /// Files on disk that no expected identity accounts for.
    pub unexpected: Vec<String>,
}

impl StatusReport {
    /// Diff the expected filename set against both output directories.
    pub fn compute(
        expected: &BTreeSet<String>,
        predictions: &BTreeSet<String>,
        metadata: &BTreeSet<String>,
    ) -> Self {
        let mut complete = Vec::new();
        let mut missing = Vec::new();
        let mut predictions_only = Vec::new();
        let mut metadata_only = Vec::new();

        for name in expected {
            match (predictions.contains(name), metadata.contains(name)) {
                (true, true) => complete.push(name.clone()),
                (true, false) => predictions_only.push(name.clone()),
                (false, true) => metadata_only.push(name.clone()),
                (false, false) => missing.push(name.clone()),
            }
        }

        let unexpected = predictions
            .union(metadata)
            .filter(|name| !expected.contains(*name))
            .cloned()
            .collect();

        Self {
            expected: expected.len(),
            complete,
            missing,
            predictions_only,
            metadata_only,
            unexpected,
        }
    }

    /// True when every expected identity has both output files.
    pub fn is_complete(&self) -> bool {
        self.complete.len() == self.expected
    }

    /// Print the report to stdout.
    pub fn print(&self) {
        println!("Expected experiments: {}", self.expected);
        println!("Complete:             {}", self.complete.len());
        println!("Missing:              {}", self.missing.len());

        if !self.missing.is_empty() {
            println!("\nMissing (failed or never attempted):");
            for name in &self.missing {
                println!("  - {}", name);
            }
        }

        if !self.predictions_only.is_empty() {
            println!("\nPrediction without metadata:");
            for name in &self.predictions_only {
                println!("  - {}", name);
            }
        }

        if !self.metadata_only.is_empty() {
            println!("\nMetadata without prediction:");
            for name in &self.metadata_only {
                println!("  - {}", name);
            }
        }

        if !self.unexpected.is_empty() {
            println!("\nUnexpected files:");
            for name in &self.unexpected {
                println!("  - {}", name);
            }
        }

        if self.is_complete() {
            println!("\nAll experiments complete.");
        }
    }
}

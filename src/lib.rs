//! VLM extraction experiments on scanned historical tax records.
//!
//! This crate drives a grid of extraction experiments against Gemini
//! vision models: it uploads scans of Utrecht 1899 tax registers,
//! builds few-shot and zero-shot conversations from a fixed set of
//! four images, and persists each response's structured output and
//! token usage to disk.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use vlm_experiments::{
//!     assets::ExperimentAssets,
//!     config::Config,
//!     experiment::IMAGE_FILES,
//!     gemini::GeminiClient,
//!     runner::{ExperimentRunner, OutputDirs},
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Load configuration (GEMINI_API_KEY is required)
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     let client = GeminiClient::new(config.gemini.clone());
//!
//!     // Upload images and load the prompt once
//!     let assets = ExperimentAssets::load(&client, Path::new("data"), &IMAGE_FILES).await?;
//!
//!     // Run the full grid and report
//!     let dirs = OutputDirs::new(Path::new("results"));
//!     dirs.ensure()?;
//!     let runner = ExperimentRunner::new(client, dirs);
//!     let summary = runner.run_all(&assets).await?;
//!     summary.print_summary();
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **GeminiClient**: file upload and generateContent against the API
//! - **ExperimentAssets**: one-time setup (prompt, uploads, ground truth)
//! - **experiment**: the grid, combinations, and output-filename scheme
//! - **messages**: zero-shot and few-shot conversation builders
//! - **ExperimentRunner**: sequential execution, output files, failure containment
//! - **report**: run summary and output-directory status diff

pub mod assets;
pub mod config;
pub mod error;
pub mod experiment;
pub mod gemini;
pub mod messages;
pub mod persistence;
pub mod report;
pub mod runner;

// Re-export commonly used types
pub use assets::ExperimentAssets;
pub use config::Config;
pub use error::{ExtractError, Result};
pub use experiment::{ExperimentId, Strategy};
pub use gemini::GeminiClient;
pub use report::{RunSummary, StatusReport};
pub use runner::{ExperimentRunner, OutputDirs};

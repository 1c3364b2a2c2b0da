//! Experiment assets: the shared task prompt, the source images and
//! their uploaded file handles, and per-image ground truth.
//!
//! Everything here is loaded once during setup and passed explicitly
//! into the experiment loop; nothing is re-uploaded or refreshed
//! afterwards.

use crate::error::{ExtractError, Result};
use crate::gemini::{GeminiClient, Part};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Prefix added to the task prompt before it is sent to the model.
const REASONING_PREAMBLE: &str = "Perform the following task using step-by-step reasoning.";

/// Assets shared by every experiment in a run.
#[derive(Debug, Clone)]
pub struct ExperimentAssets {
    /// The task prompt, loaded once and reused verbatim in every turn.
    pub prompt: String,
    /// Image filenames in fixed order; combination indices refer here.
    pub images: Vec<String>,
    /// Uploaded file handle per image filename.
    pub parts: HashMap<String, Part>,
    data_dir: PathBuf,
}

impl ExperimentAssets {
    /// Construct from already-prepared pieces (useful for testing).
    pub fn new(
        prompt: impl Into<String>,
        images: Vec<String>,
        parts: HashMap<String, Part>,
        data_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            images,
            parts,
            data_dir: data_dir.into(),
        }
    }

    /// Load the prompt and upload every image once.
    ///
    /// Any missing local file is fatal: setup happens before the first
    /// experiment, so nothing has been requested yet.
    pub async fn load(
        client: &GeminiClient,
        data_dir: &Path,
        image_files: &[&str],
    ) -> Result<Self> {
        let prompt = load_prompt(data_dir)?;

        println!("\nUploading images...");
        let mut parts = HashMap::new();
        for &image_file in image_files {
            let image_path = data_dir.join("images").join(image_file);
            if !image_path.is_file() {
                return Err(ExtractError::ImageNotFound(image_path));
            }

            let handle = client.upload_image(&image_path).await?;
            println!("  Uploaded: {}", image_file);
            parts.insert(image_file.to_string(), Part::file(handle));
        }

        Ok(Self {
            prompt,
            images: image_files.iter().map(|s| s.to_string()).collect(),
            parts,
            data_dir: data_dir.to_path_buf(),
        })
    }

    /// The cached uploaded-image part for a filename.
    pub fn part(&self, image_name: &str) -> Result<&Part> {
        self.parts
            .get(image_name)
            .ok_or_else(|| ExtractError::ImageNotFound(self.data_dir.join("images").join(image_name)))
    }

    /// Load the ground truth JSON for an image.
    pub fn ground_truth(&self, image_name: &str) -> Result<Value> {
        let base = image_name.strip_suffix(".jpg").unwrap_or(image_name);
        let path = self
            .data_dir
            .join("ground_truth")
            .join(format!("{}.json", base));

        if !path.is_file() {
            return Err(ExtractError::GroundTruthNotFound(path));
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ExtractError::io(&path, e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Read the task prompt and prepend the reasoning preamble.
fn load_prompt(data_dir: &Path) -> Result<String> {
    let path = data_dir.join("prompt.txt");
    if !path.is_file() {
        return Err(ExtractError::PromptNotFound(path));
    }

    let prompt = std::fs::read_to_string(&path).map_err(|e| ExtractError::io(&path, e))?;
    Ok(format!("{}{}", REASONING_PREAMBLE, prompt))
}

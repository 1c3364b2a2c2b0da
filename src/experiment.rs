//! The experiment grid.
//!
//! An experiment is identified by (target image, model, strategy,
//! thinking budget). The full grid is the Cartesian product of the
//! model list, every choose-3-of-4 example combination, the thinking
//! budget list, and both prompting strategies. Identities are encoded
//! into output filenames; the files on disk are the only record of
//! completed runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scanned tax record images, in fixed order. Combination indices
/// refer to positions in this list.
pub const IMAGE_FILES: [&str; 4] = [
    "NL-UtHUA_A376076_000033_l.jpg",
    "NL-UtHUA_A376076_000033_r.jpg",
    "NL-UtHUA_A376079_000005_l.jpg",
    "NL-UtHUA_A376079_000005_r.jpg",
];

/// Models to test.
pub const MODELS: [&str; 1] = ["models/gemini-2.5-flash-lite"];

/// Thinking budgets to test. 0 disables thinking.
pub const THINKING_BUDGETS: [u32; 2] = [0, 2000];

/// Prompting strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    FewShot,
    ZeroShot,
}

impl Strategy {
    /// Name used in output filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::FewShot => "fewshot",
            Strategy::ZeroShot => "zeroshot",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A choice of example images and the held-out prediction target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    /// Indices of the few-shot example images, in enumeration order.
    pub examples: Vec<usize>,
    /// Index of the held-out target image.
    pub target: usize,
}

/// Enumerate every (n-1)-element example subset with its complement
/// singleton as the target.
///
/// Subsets come out in lexicographic order. The complement extraction
/// assumes exactly one leftover index per subset; anything other than
/// k = n-1 is outside the design.
pub fn example_combinations(n: usize) -> Vec<Combination> {
    index_combinations(n, n.saturating_sub(1))
        .into_iter()
        .map(|examples| {
            let target = (0..n)
                .find(|i| !examples.contains(i))
                .unwrap_or(n.saturating_sub(1));
            Combination { examples, target }
        })
        .collect()
}

/// All k-element subsets of 0..n in lexicographic order.
fn index_combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    if k > n {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();

    loop {
        result.push(indices.clone());

        // Rightmost index that can still be advanced.
        let Some(i) = (0..k).rev().find(|&i| indices[i] != i + n - k) else {
            return result;
        };

        indices[i] += 1;
        for j in i + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }
}

/// Strip the service path prefix and normalize separators.
///
/// `models/gemini-2.5-flash-lite` -> `gemini-2.5-flash-lite`
pub fn model_short_name(model: &str) -> String {
    model.strip_prefix("models/").unwrap_or(model).replace(':', "-")
}

/// Build the standardized output filename for an experiment identity.
pub fn build_output_filename(
    image_name: &str,
    model: &str,
    strategy: Strategy,
    thinking_budget: u32,
) -> String {
    let image_base = image_name.strip_suffix(".jpg").unwrap_or(image_name);
    format!(
        "{}__{}__{}__thinking{}.json",
        image_base,
        model_short_name(model),
        strategy.as_str(),
        thinking_budget
    )
}

/// The tuple that uniquely determines an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentId {
    pub target_image: String,
    pub model: String,
    pub strategy: Strategy,
    pub thinking_budget: u32,
}

impl ExperimentId {
    pub fn new(
        target_image: impl Into<String>,
        model: impl Into<String>,
        strategy: Strategy,
        thinking_budget: u32,
    ) -> Self {
        Self {
            target_image: target_image.into(),
            model: model.into(),
            strategy,
            thinking_budget,
        }
    }

    /// Output filename shared by the prediction and metadata files.
    pub fn filename(&self) -> String {
        build_output_filename(
            &self.target_image,
            &self.model,
            self.strategy,
            self.thinking_budget,
        )
    }
}

/// One point in the experiment grid.
#[derive(Debug, Clone)]
pub struct GridPoint {
    pub combination: Combination,
    pub id: ExperimentId,
}

/// The full experiment grid in execution order:
/// model, then combination, then budget, then fewshot before zeroshot.
pub fn full_grid() -> Vec<GridPoint> {
    let mut grid = Vec::new();

    for model in MODELS {
        for combination in example_combinations(IMAGE_FILES.len()) {
            let target = IMAGE_FILES[combination.target];
            for budget in THINKING_BUDGETS {
                for strategy in [Strategy::FewShot, Strategy::ZeroShot] {
                    grid.push(GridPoint {
                        combination: combination.clone(),
                        id: ExperimentId::new(target, model, strategy, budget),
                    });
                }
            }
        }
    }

    grid
}

/// Every output filename the full grid is expected to produce.
pub fn expected_filenames() -> Vec<String> {
    full_grid().iter().map(|point| point.id.filename()).collect()
}

//! Conversation builders for the two prompting strategies.

use crate::assets::ExperimentAssets;
use crate::error::Result;
use crate::gemini::{Content, Part};
use crate::persistence::to_pretty_json;

/// Build the single-turn zero-shot conversation for a target image.
pub fn zero_shot(assets: &ExperimentAssets, target_image: &str) -> Result<Vec<Content>> {
    let target_part = assets.part(target_image)?.clone();

    Ok(vec![Content::user(vec![
        target_part,
        Part::text(assets.prompt.clone()),
    ])])
}

/// Build the few-shot conversation for a target image.
///
/// Each example index, in the order produced by the combination
/// generator, contributes a user turn (example image + prompt) and a
/// model turn (its ground truth, pretty-printed). The target turn
/// comes last. With 3 examples that is 7 turns in total.
pub fn few_shot(
    assets: &ExperimentAssets,
    example_indices: &[usize],
    target_image: &str,
) -> Result<Vec<Content>> {
    let mut turns = Vec::with_capacity(example_indices.len() * 2 + 1);

    for &idx in example_indices {
        let example_image = &assets.images[idx];
        let ground_truth = assets.ground_truth(example_image)?;

        turns.push(Content::user(vec![
            assets.part(example_image)?.clone(),
            Part::text(assets.prompt.clone()),
        ]));
        turns.push(Content::model(vec![Part::text(to_pretty_json(&ground_truth)?)]));
    }

    turns.push(Content::user(vec![
        assets.part(target_image)?.clone(),
        Part::text(assets.prompt.clone()),
    ]));

    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{FileData, Role};
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn test_assets(dir: &TempDir) -> ExperimentAssets {
        let images = vec![
            "a.jpg".to_string(),
            "b.jpg".to_string(),
            "c.jpg".to_string(),
            "d.jpg".to_string(),
        ];

        let gt_dir = dir.path().join("ground_truth");
        fs::create_dir_all(&gt_dir).unwrap();

        let mut parts = HashMap::new();
        for (i, image) in images.iter().enumerate() {
            parts.insert(
                image.clone(),
                Part::file(FileData {
                    mime_type: "image/jpeg".to_string(),
                    file_uri: format!("https://files.example/{}", image),
                }),
            );
            let base = image.strip_suffix(".jpg").unwrap();
            fs::write(
                gt_dir.join(format!("{}.json", base)),
                format!(r#"{{"record": {}}}"#, i),
            )
            .unwrap();
        }

        ExperimentAssets::new("Extract the records.", images, parts, dir.path())
    }

    #[test]
    fn test_zero_shot_is_one_turn() {
        let dir = TempDir::new().unwrap();
        let assets = test_assets(&dir);

        let turns = zero_shot(&assets, "d.jpg").unwrap();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].parts.len(), 2);
        assert!(turns[0].parts[0].file_data.is_some());
        assert_eq!(turns[0].parts[1].text.as_deref(), Some("Extract the records."));
    }

    #[test]
    fn test_few_shot_turn_structure() {
        let dir = TempDir::new().unwrap();
        let assets = test_assets(&dir);

        let turns = few_shot(&assets, &[0, 1, 2], "d.jpg").unwrap();

        // 3 x (user, model) + final user turn
        assert_eq!(turns.len(), 7);
        for (i, turn) in turns.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Model };
            assert_eq!(turn.role, expected);
        }

        // Examples appear in generator order.
        assert_eq!(
            turns[0].parts[0].file_data.as_ref().unwrap().file_uri,
            "https://files.example/a.jpg"
        );
        assert_eq!(
            turns[2].parts[0].file_data.as_ref().unwrap().file_uri,
            "https://files.example/b.jpg"
        );

        // Model turns carry the pretty-printed ground truth.
        assert_eq!(
            turns[1].parts[0].text.as_deref(),
            Some("{\n    \"record\": 0\n}")
        );

        // Final turn targets the held-out image.
        assert_eq!(
            turns[6].parts[0].file_data.as_ref().unwrap().file_uri,
            "https://files.example/d.jpg"
        );
    }

    #[test]
    fn test_prompt_is_identical_across_turns() {
        let dir = TempDir::new().unwrap();
        let assets = test_assets(&dir);

        let turns = few_shot(&assets, &[0, 1, 2], "d.jpg").unwrap();

        let prompts: Vec<&str> = turns
            .iter()
            .filter(|t| t.role == Role::User)
            .map(|t| t.parts[1].text.as_deref().unwrap())
            .collect();

        assert_eq!(prompts.len(), 4);
        assert!(prompts.iter().all(|p| *p == prompts[0]));
    }

    #[test]
    fn test_missing_ground_truth_fails_build() {
        let dir = TempDir::new().unwrap();
        let assets = test_assets(&dir);
        fs::remove_file(dir.path().join("ground_truth").join("b.json")).unwrap();

        let result = few_shot(&assets, &[0, 1, 2], "d.jpg");
        assert!(result.is_err());
    }
}

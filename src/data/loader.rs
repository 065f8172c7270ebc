// ============================================================
// Layer 4 — GLUE Dataset Loader
// ============================================================
// Fetches the raw benchmark rows for a task through Burn's
// Hugging Face dataset importer (downloaded once, cached as a
// local SQLite database) and maps them into domain Examples
// using the task's column schema.
//
// The experiment re-splits the data itself, so this loader
// concatenates the upstream `train` and `validation` splits
// into one pool — the upstream `test` split is unlabeled on
// GLUE and is never touched.

use anyhow::{Context, Result};
use burn::data::dataset::{Dataset, HuggingfaceDatasetLoader, SqliteDataset};
use serde::{Deserialize, Serialize};

use crate::domain::example::Example;
use crate::domain::task::GlueTask;
use crate::domain::traits::ExampleSource;

/// One raw row as stored by the importer. GLUE subsets disagree
/// on column names, so every known text column is optional and
/// the task schema picks the right ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlueRow {
    #[serde(default)]
    pub sentence: Option<String>,
    #[serde(default)]
    pub sentence1: Option<String>,
    #[serde(default)]
    pub sentence2: Option<String>,
    #[serde(default)]
    pub premise: Option<String>,
    #[serde(default)]
    pub hypothesis: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub question1: Option<String>,
    #[serde(default)]
    pub question2: Option<String>,
    pub label: i64,
    #[serde(default)]
    pub idx: Option<i64>,
}

impl GlueRow {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "sentence" => self.sentence.as_deref(),
            "sentence1" => self.sentence1.as_deref(),
            "sentence2" => self.sentence2.as_deref(),
            "premise" => self.premise.as_deref(),
            "hypothesis" => self.hypothesis.as_deref(),
            "question" => self.question.as_deref(),
            "question1" => self.question1.as_deref(),
            "question2" => self.question2.as_deref(),
            _ => None,
        }
    }
}

/// Loads the full labelled pool for one GLUE task.
pub struct GlueLoader {
    task: GlueTask,
}

impl GlueLoader {
    pub fn new(task: GlueTask) -> Self {
        Self { task }
    }

    fn fetch(&self, split: &str) -> Result<SqliteDataset<GlueRow>> {
        HuggingfaceDatasetLoader::new("glue")
            .with_subset(self.task.dataset_name())
            .dataset(split)
            .map_err(|e| {
                anyhow::anyhow!(
                    "cannot import glue/{} split '{}': {}",
                    self.task.dataset_name(),
                    split,
                    e
                )
            })
    }

    fn to_example(&self, row: &GlueRow) -> Result<Example> {
        let (first, second) = self.task.text_fields();

        let text_a = row
            .field(first)
            .with_context(|| format!("row is missing the '{first}' column"))?
            .to_string();
        let text_b = match second {
            Some(name) => Some(
                row.field(name)
                    .with_context(|| format!("row is missing the '{name}' column"))?
                    .to_string(),
            ),
            None => None,
        };

        // Unlabeled rows (label -1 upstream) have no place in a
        // labelled pool.
        anyhow::ensure!(
            row.label >= 0,
            "row has negative label {} (unlabeled upstream data?)",
            row.label
        );

        Ok(Example::new(text_a, text_b, row.label as usize))
    }
}

impl ExampleSource for GlueLoader {
    fn load(&self) -> Result<Vec<Example>> {
        let mut examples = Vec::new();

        for split in ["train", self.task.validation_split()] {
            let dataset = self.fetch(split)?;
            tracing::info!(
                "Loaded glue/{} split '{}': {} rows",
                self.task.dataset_name(),
                split,
                dataset.len(),
            );

            for index in 0..dataset.len() {
                let row = dataset
                    .get(index)
                    .with_context(|| format!("row {index} missing from split '{split}'"))?;
                examples.push(self.to_example(&row)?);
            }
        }

        tracing::info!(
            "Example pool for '{}': {} labelled examples",
            self.task.name(),
            examples.len(),
        );
        Ok(examples)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn row_with(sentence: &str, label: i64) -> GlueRow {
        GlueRow {
            sentence: Some(sentence.to_string()),
            sentence1: None,
            sentence2: None,
            premise: None,
            hypothesis: None,
            question: None,
            question1: None,
            question2: None,
            label,
            idx: Some(0),
        }
    }

    #[test]
    fn test_single_sentence_mapping() {
        let loader = GlueLoader::new(GlueTask::Cola);
        let example = loader.to_example(&row_with("The cat sat.", 1)).unwrap();
        assert_eq!(example.text_a, "The cat sat.");
        assert_eq!(example.text_b, None);
        assert_eq!(example.label, 1);
    }

    #[test]
    fn test_pair_task_requires_both_columns() {
        let loader = GlueLoader::new(GlueTask::Mrpc);
        // A CoLA-shaped row has no sentence1/sentence2.
        assert!(loader.to_example(&row_with("only one", 0)).is_err());
    }

    #[test]
    fn test_negative_label_rejected() {
        let loader = GlueLoader::new(GlueTask::Cola);
        assert!(loader.to_example(&row_with("unlabeled", -1)).is_err());
    }
}

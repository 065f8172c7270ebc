// ============================================================
// The run-experiment use case
// ============================================================
// End-to-end flow for one (task, model, optimizer, seed) run:
//
//   // ── Step 1: Encode every raw example ──
//   // ── Step 2: Stratified train/valid/test split ──
//   // ── Step 3: Train the orchestrator ──
//   // ── Step 4: Score all three splits ──
//   // ── Step 5: Write the report file ──
//
// The orchestrator enters through a builder closure so the whole
// pipeline stays testable with a stub in place of the real
// Burn-backed trainer.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::splitter::three_way_split;
use crate::domain::example::{EncodedExample, Example};
use crate::domain::task::GlueTask;
use crate::domain::traits::{ExampleEncoder, Orchestrator};
use crate::infra::report::{ReportWriter, SplitSection};
use crate::metrics::aggregate::{argmax, softmax, BinaryScores, PredictionRecord};
use crate::ml::trainer::TrainerSettings;

// Fixed experiment hyperparameters. The only knobs a run exposes
// are the task, model family, optimizer and seed.
pub const HELDOUT_FRACTION: f64 = 0.166_666_666_666_6;
pub const BATCH_SIZE: usize = 4;
pub const EPOCHS: usize = 10;
pub const WARMUP_STEPS: usize = 500;
pub const EVAL_STEPS: usize = 500;
pub const LEARNING_RATE: f64 = 5e-5;
pub const MAX_SEQ_LEN: usize = 512;
pub const CHECKPOINT_DIR: &str = "checkpoints";

/// The five optimizers the experiment series compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizerKind {
    AdamW,
    Adam,
    Adamax,
    Sgd,
    SgdMomentum,
}

impl OptimizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdamW => "adamw",
            Self::Adam => "adam",
            Self::Adamax => "adamax",
            Self::Sgd => "sgd",
            Self::SgdMomentum => "sgdm",
        }
    }
}

/// Which pretrained family supplies the tokenizer vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFamily {
    Bert,
    Roberta,
}

impl ModelFamily {
    /// Hub checkpoint whose tokenizer this family uses. The
    /// distilled variants keep downloads small without changing
    /// the vocabulary.
    pub fn checkpoint(&self) -> &'static str {
        match self {
            Self::Bert => "distilbert-base-uncased",
            Self::Roberta => "distilroberta-base",
        }
    }

    /// BERT encodes sentence pairs with segment ids; RoBERTa
    /// dropped them.
    pub fn uses_type_ids(&self) -> bool {
        matches!(self, Self::Bert)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bert => "bert",
            Self::Roberta => "roberta",
        }
    }
}

/// One experiment's coordinates.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub task: GlueTask,
    pub model: ModelFamily,
    pub optimizer: OptimizerKind,
    pub seed: u64,
    pub output_dir: PathBuf,
}

/// Trainer settings derived from a run's coordinates plus the
/// tokenizer's vocabulary size.
pub fn trainer_settings(config: &RunConfig, vocab_size: usize) -> TrainerSettings {
    TrainerSettings {
        optimizer: config.optimizer,
        seed: config.seed,
        vocab_size,
        num_labels: config.task.num_labels(),
        max_seq_len: MAX_SEQ_LEN,
        batch_size: BATCH_SIZE,
        epochs: EPOCHS,
        warmup_steps: WARMUP_STEPS,
        eval_steps: EVAL_STEPS,
        learning_rate: LEARNING_RATE,
        checkpoint_dir: format!("{}/{}", CHECKPOINT_DIR, ReportWriter::file_name(config).trim_end_matches(".txt")),
    }
}

/// Run one full experiment and return the report path.
///
/// `build_orchestrator` receives the encoded train and validation
/// splits and returns the trainer that owns them; the test split
/// stays with the caller and is only ever scored.
pub fn run_experiment<E, O, F>(
    config: &RunConfig,
    examples: Vec<Example>,
    encoder: &E,
    build_orchestrator: F,
) -> Result<PathBuf>
where
    E: ExampleEncoder,
    O: Orchestrator,
    F: FnOnce(Vec<EncodedExample>, Vec<EncodedExample>) -> Result<O>,
{
    if config.task.num_labels() != 2 {
        bail!(
            "task '{}' is not binary; this experiment only scores binary classification",
            config.task.name()
        );
    }

    // ── Step 1: Encode every raw example ──
    tracing::info!("Encoding {} examples", examples.len());
    let encoded: Vec<EncodedExample> = examples
        .iter()
        .map(|example| encoder.encode(example))
        .collect::<Result<_>>()
        .context("encoding examples")?;

    // ── Step 2: Stratified train/valid/test split ──
    let (train, valid, test) =
        three_way_split(encoded, |e: &EncodedExample| e.labels, HELDOUT_FRACTION, config.seed)
            .context("splitting dataset")?;
    tracing::info!(
        "Split sizes: train={} valid={} test={}",
        train.len(),
        valid.len(),
        test.len(),
    );

    // ── Step 3: Train the orchestrator ──
    let train_copy = train.clone();
    let valid_copy = valid.clone();
    let mut orchestrator = build_orchestrator(train_copy, valid_copy)?;
    orchestrator.train().context("training")?;

    // ── Step 4: Score all three splits ──
    let sections = vec![
        score_split(&mut orchestrator, "TRAIN", &train)?,
        score_split(&mut orchestrator, "VALID", &valid)?,
        score_split(&mut orchestrator, "TEST", &test)?,
    ];

    // ── Step 5: Write the report file ──
    let writer = ReportWriter::new(&config.output_dir);
    let path = writer.write(config, &sections)?;
    tracing::info!("Report written to {}", path.display());
    Ok(path)
}

/// Score one split: a single predict pass feeds the confusion
/// and curve metrics, and a single evaluate pass supplies the
/// orchestrator-reported Matthews correlation.
fn score_split<O: Orchestrator>(
    orchestrator: &mut O,
    name: &'static str,
    examples: &[EncodedExample],
) -> Result<SplitSection> {
    let output = orchestrator
        .predict(examples)
        .with_context(|| format!("predicting on {name}"))?;

    let records: Vec<PredictionRecord> = output
        .logits
        .iter()
        .zip(&output.labels)
        .map(|(logits, &label)| {
            let probabilities = softmax(logits);
            let predicted = argmax(&probabilities);
            PredictionRecord { label, predicted, probabilities }
        })
        .collect();
    let scores = BinaryScores::from_records(&records);

    let metrics = orchestrator
        .evaluate(examples)
        .with_context(|| format!("evaluating on {name}"))?;
    let matthews = metrics
        .get("matthews_correlation")
        .copied()
        .context("orchestrator did not report matthews_correlation")?;

    Ok(SplitSection { name, matthews, scores })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::{MetricMap, PredictOutput};
    use std::fs;

    /// Encoder that turns the label into a one-token id sequence,
    /// leaving the pipeline free of any tokenizer download.
    struct StubEncoder;

    impl ExampleEncoder for StubEncoder {
        fn encode(&self, example: &Example) -> Result<EncodedExample> {
            Ok(EncodedExample {
                input_ids: vec![example.label as u32 + 1],
                attention_mask: vec![1],
                type_ids: None,
                labels: example.label,
            })
        }
    }

    /// Orchestrator that "learns" nothing and predicts the label
    /// hidden in the first input id, so every split scores
    /// perfectly and the report content is fully predictable.
    struct StubOrchestrator {
        trained: bool,
    }

    impl Orchestrator for StubOrchestrator {
        fn train(&mut self) -> Result<()> {
            self.trained = true;
            Ok(())
        }

        fn evaluate(&mut self, examples: &[EncodedExample]) -> Result<MetricMap> {
            anyhow::ensure!(self.trained, "evaluate before train");
            let mut metrics = MetricMap::new();
            metrics.insert("loss".to_string(), 0.01);
            metrics.insert("matthews_correlation".to_string(), 1.0);
            let _ = examples;
            Ok(metrics)
        }

        fn predict(&mut self, examples: &[EncodedExample]) -> Result<PredictOutput> {
            anyhow::ensure!(self.trained, "predict before train");
            let logits = examples
                .iter()
                .map(|e| {
                    if e.input_ids[0] == 2 {
                        vec![-2.0, 2.0]
                    } else {
                        vec![2.0, -2.0]
                    }
                })
                .collect();
            let labels = examples.iter().map(|e| e.labels).collect();
            Ok(PredictOutput { logits, labels })
        }
    }

    fn examples(negatives: usize, positives: usize) -> Vec<Example> {
        let mut all = Vec::new();
        for i in 0..negatives {
            all.push(Example::new(format!("neg {i}"), None, 0));
        }
        for i in 0..positives {
            all.push(Example::new(format!("pos {i}"), None, 1));
        }
        all
    }

    fn config(output_dir: PathBuf) -> RunConfig {
        RunConfig {
            task: GlueTask::Cola,
            model: ModelFamily::Roberta,
            optimizer: OptimizerKind::Sgd,
            seed: 10,
            output_dir,
        }
    }

    #[test]
    fn test_full_pipeline_writes_a_perfect_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = run_experiment(
            &config(dir.path().to_path_buf()),
            examples(40, 20),
            &StubEncoder,
            |_train, _valid| Ok(StubOrchestrator { trained: false }),
        )
        .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "cola_roberta_sgd_seed_10.txt"
        );
        let body = fs::read_to_string(path).unwrap();
        assert!(body.contains("TRAIN:"));
        assert!(body.contains("VALID:"));
        assert!(body.contains("TEST:"));
        assert!(body.contains("Matthews: 1.0000"));
        assert!(body.contains("Positive class f1-score: 100.00%"));
    }

    #[test]
    fn test_orchestrator_receives_train_and_valid_but_not_test() {
        let dir = tempfile::tempdir().unwrap();
        // 60 examples, heldout fraction 1/6 → 50 train, 5 valid,
        // 5 test.
        run_experiment(
            &config(dir.path().to_path_buf()),
            examples(40, 20),
            &StubEncoder,
            |train, valid| {
                assert_eq!(train.len(), 50);
                assert_eq!(valid.len(), 5);
                Ok(StubOrchestrator { trained: false })
            },
        )
        .unwrap();
    }

    #[test]
    fn test_non_binary_task_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = config(dir.path().to_path_buf());
        bad.task = GlueTask::Mnli;

        let err = run_experiment(&bad, examples(10, 10), &StubEncoder, |_t, _v| {
            Ok(StubOrchestrator { trained: false })
        })
        .unwrap_err();
        assert!(err.to_string().contains("not binary"));
    }

    #[test]
    fn test_trainer_settings_carry_fixed_hyperparameters() {
        let settings = trainer_settings(&config(PathBuf::from(".")), 30522);
        assert_eq!(settings.vocab_size, 30522);
        assert_eq!(settings.batch_size, BATCH_SIZE);
        assert_eq!(settings.epochs, EPOCHS);
        assert_eq!(settings.warmup_steps, WARMUP_STEPS);
        assert!(settings.checkpoint_dir.contains("cola_roberta_sgd_seed_10"));
    }
}

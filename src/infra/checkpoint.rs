// ============================================================
// Checkpoint persistence
// ============================================================
// Save-only: the trainer keeps the best model in memory for the
// evaluation phase, so nothing here ever needs to load weights
// back. What lands on disk per run:
//
//   <dir>/trainer_settings.json   how the weights were produced
//   <dir>/best_model.mpk          CompactRecorder weights

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::ml::model::SequenceClassifier;
use crate::ml::trainer::TrainerSettings;

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        // Missing parents are created lazily on first save instead.
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// Record the full run configuration next to the weights.
    pub fn save_settings(&self, settings: &TrainerSettings) -> Result<()> {
        let path = self.dir.join("trainer_settings.json");
        let json = serde_json::to_string_pretty(settings)
            .context("serializing trainer settings")?;
        fs::write(&path, json)
            .with_context(|| format!("writing trainer settings to {}", path.display()))?;
        Ok(())
    }

    /// Overwrite the best-model weights. Called every time the
    /// validation loss improves.
    pub fn save_best_model<B: Backend>(&self, model: &SequenceClassifier<B>) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating checkpoint dir {}", self.dir.display()))?;
        let path = self.dir.join("best_model");
        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("saving model weights to {}", path.display()))?;
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::run_experiment::OptimizerKind;

    fn settings() -> TrainerSettings {
        TrainerSettings {
            optimizer: OptimizerKind::Adam,
            seed: 1,
            vocab_size: 100,
            num_labels: 2,
            max_seq_len: 16,
            batch_size: 4,
            epochs: 1,
            warmup_steps: 0,
            eval_steps: 10,
            learning_rate: 5e-5,
            checkpoint_dir: "unused".to_string(),
        }
    }

    #[test]
    fn test_settings_round_trip_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let manager = CheckpointManager::new(dir.path());
        manager.save_settings(&settings()).unwrap();

        let raw = fs::read_to_string(dir.path().join("trainer_settings.json")).unwrap();
        let loaded: TrainerSettings = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded.seed, 1);
        assert_eq!(loaded.vocab_size, 100);
        assert!(matches!(loaded.optimizer, OptimizerKind::Adam));
    }

    #[test]
    fn test_manager_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("runs").join("cola");
        let manager = CheckpointManager::new(&nested);
        manager.save_settings(&settings()).unwrap();
        assert!(nested.join("trainer_settings.json").exists());
    }
}

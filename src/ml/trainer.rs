// ============================================================
// Layer 5 — FineTuner (the Orchestrator implementation)
// ============================================================
// Full train + validation loop using manual batching and Burn's
// optimizer API, with:
//
//   - optimizer dispatch over the five experiment variants
//     (adamw / adam / adamax / sgd / sgdm)
//   - linear warmup over `warmup_steps`, then linear decay to
//     zero at the end of the step budget
//   - best-model tracking by validation loss, evaluated every
//     `eval_steps` optimizer steps and at each epoch end; the
//     best weights are what evaluate()/predict() later use
//   - seed propagation into the backend and the shuffle RNG,
//     so a run is reproducible given its seed
//
// Key Burn backend split:
//   - Training uses TrainBackend (Autodiff<Wgpu>) for gradients
//   - model.valid() returns the model on EvalBackend (Wgpu),
//     dropout disabled, for deterministic evaluation

use anyhow::{Context, Result};
use burn::{
    module::AutodiffModule,
    optim::{
        momentum::MomentumConfig, AdamConfig, AdamWConfig, GradientsParams, Optimizer, SgdConfig,
    },
    prelude::*,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::application::run_experiment::OptimizerKind;
use crate::data::batcher::DynamicBatcher;
use crate::domain::example::EncodedExample;
use crate::domain::traits::{MetricMap, Orchestrator, PredictOutput};
use crate::infra::checkpoint::CheckpointManager;
use crate::metrics::confusion::ConfusionCounts;
use crate::ml::adamax::AdamaxConfig;
use crate::ml::model::{SequenceClassifier, SequenceClassifierConfig};

type TrainBackend = burn::backend::Autodiff<burn::backend::Wgpu>;
type EvalBackend = burn::backend::Wgpu;

/// Everything the trainer needs to know about one run.
/// Serialisable so the checkpoint directory records exactly how
/// its weights were produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerSettings {
    pub optimizer: OptimizerKind,
    pub seed: u64,
    pub vocab_size: usize,
    pub num_labels: usize,
    pub max_seq_len: usize,
    pub batch_size: usize,
    pub epochs: usize,
    pub warmup_steps: usize,
    pub eval_steps: usize,
    pub learning_rate: f64,
    pub checkpoint_dir: String,
}

/// Burn-backed training orchestrator. Owns its copies of the
/// train/validation splits; the best model by validation loss is
/// retained after train() for evaluate()/predict().
pub struct FineTuner {
    settings: TrainerSettings,
    batcher: DynamicBatcher,
    device: burn::backend::wgpu::WgpuDevice,
    train_examples: Vec<EncodedExample>,
    valid_examples: Vec<EncodedExample>,
    trained: Option<SequenceClassifier<EvalBackend>>,
}

impl FineTuner {
    pub fn new(
        settings: TrainerSettings,
        pad_id: u32,
        train_examples: Vec<EncodedExample>,
        valid_examples: Vec<EncodedExample>,
    ) -> Self {
        let device = burn::backend::wgpu::WgpuDevice::default();
        Self {
            settings,
            batcher: DynamicBatcher::new(pad_id),
            device,
            train_examples,
            valid_examples,
            trained: None,
        }
    }

    fn trained_model(&self) -> Result<&SequenceClassifier<EvalBackend>> {
        self.trained
            .as_ref()
            .context("train() must complete before evaluate()/predict()")
    }

    /// The epoch loop, generic over the optimizer so each variant
    /// monomorphises against Burn's Optimizer trait. Returns the
    /// best model seen by validation loss.
    fn fit<O>(
        &self,
        mut model: SequenceClassifier<TrainBackend>,
        mut optim: O,
    ) -> Result<SequenceClassifier<TrainBackend>>
    where
        O: Optimizer<SequenceClassifier<TrainBackend>, TrainBackend>,
    {
        let s = &self.settings;
        let steps_per_epoch = self.train_examples.len().div_ceil(s.batch_size);
        let total_steps = steps_per_epoch * s.epochs;

        let checkpoints = CheckpointManager::new(&s.checkpoint_dir);
        checkpoints.save_settings(s)?;

        let mut rng = StdRng::seed_from_u64(s.seed);
        let mut order: Vec<usize> = (0..self.train_examples.len()).collect();

        let mut best_loss = f64::INFINITY;
        let mut best_model = model.clone();
        let mut step = 0usize;

        for epoch in 1..=s.epochs {
            order.shuffle(&mut rng);

            let mut train_loss_sum = 0.0f64;
            let mut train_batches = 0usize;

            for chunk in order.chunks(s.batch_size) {
                let items: Vec<EncodedExample> = chunk
                    .iter()
                    .map(|&index| self.train_examples[index].clone())
                    .collect();
                let batch = self.batcher.batch::<TrainBackend>(&items, &self.device);

                let (loss, _) =
                    model.forward_loss(batch.input_ids, batch.attention_mask, batch.labels);
                train_loss_sum += loss.clone().into_scalar().elem::<f64>();
                train_batches += 1;

                // Backward pass + scheduled optimizer update
                let grads = GradientsParams::from_grads(loss.backward(), &model);
                step += 1;
                let lr = learning_rate_at(step, total_steps, s.warmup_steps, s.learning_rate);
                model = optim.step(lr, model, grads);

                // Periodic validation, mirroring an eval-every-N-steps
                // strategy with best-model retention.
                if step % s.eval_steps == 0 {
                    let valid_loss = self.validation_loss(&model.valid())?;
                    tracing::info!(
                        "step {step}: valid_loss={valid_loss:.4} (best {best_loss:.4})"
                    );
                    if valid_loss < best_loss {
                        best_loss = valid_loss;
                        best_model = model.clone();
                        checkpoints.save_best_model(&best_model)?;
                    }
                }
            }

            let avg_train_loss = if train_batches > 0 {
                train_loss_sum / train_batches as f64
            } else {
                f64::NAN
            };

            let valid_loss = self.validation_loss(&model.valid())?;
            if valid_loss < best_loss {
                best_loss = valid_loss;
                best_model = model.clone();
                checkpoints.save_best_model(&best_model)?;
            }

            println!(
                "Epoch {:>3}/{} | train_loss={:.4} | valid_loss={:.4} | best={:.4}",
                epoch, s.epochs, avg_train_loss, valid_loss, best_loss,
            );
        }

        Ok(best_model)
    }

    /// Average cross-entropy loss over the validation set, on the
    /// inference backend (no autodiff overhead, dropout off).
    fn validation_loss(&self, model: &SequenceClassifier<EvalBackend>) -> Result<f64> {
        let mut loss_sum = 0.0f64;
        let mut batches = 0usize;

        for chunk in self.valid_examples.chunks(self.settings.batch_size) {
            let batch = self.batcher.batch::<EvalBackend>(chunk, &self.device);
            let (loss, _) =
                model.forward_loss(batch.input_ids, batch.attention_mask, batch.labels);
            loss_sum += loss.into_scalar().elem::<f64>();
            batches += 1;
        }

        anyhow::ensure!(batches > 0, "validation set is empty");
        Ok(loss_sum / batches as f64)
    }

    /// Forward a dataset through a model, returning raw logits and
    /// labels in dataset order.
    fn forward_all(
        &self,
        model: &SequenceClassifier<EvalBackend>,
        examples: &[EncodedExample],
    ) -> Result<PredictOutput> {
        let mut logits = Vec::with_capacity(examples.len());
        let mut labels = Vec::with_capacity(examples.len());

        for chunk in examples.chunks(self.settings.batch_size) {
            let batch = self.batcher.batch::<EvalBackend>(chunk, &self.device);
            let output = model.forward(batch.input_ids, batch.attention_mask);

            let flat: Vec<f32> = output
                .into_data()
                .to_vec()
                .map_err(|e| anyhow::anyhow!("cannot read logits off device: {e:?}"))?;
            for row in flat.chunks(self.settings.num_labels) {
                logits.push(row.to_vec());
            }
            labels.extend(chunk.iter().map(|example| example.labels));
        }

        Ok(PredictOutput { logits, labels })
    }
}

impl Orchestrator for FineTuner {
    fn train(&mut self) -> Result<()> {
        let s = &self.settings;

        // Propagate the run seed into the backend before any
        // weight is initialised.
        TrainBackend::seed(s.seed);

        let model: SequenceClassifier<TrainBackend> =
            SequenceClassifierConfig::new(s.vocab_size, s.max_seq_len, s.num_labels)
                .init(&self.device);

        tracing::info!(
            "Training with optimizer '{}' (seed {}, {} train / {} valid examples)",
            s.optimizer.as_str(),
            s.seed,
            self.train_examples.len(),
            self.valid_examples.len(),
        );

        let best = match s.optimizer {
            OptimizerKind::Adam => self.fit(model, AdamConfig::new().with_epsilon(1e-8).init()),
            OptimizerKind::AdamW => self.fit(model, AdamWConfig::new().init()),
            OptimizerKind::Adamax => self.fit(model, AdamaxConfig::new().init()),
            OptimizerKind::Sgd => self.fit(model, SgdConfig::new().init()),
            OptimizerKind::SgdMomentum => self.fit(
                model,
                SgdConfig::new()
                    .with_momentum(Some(MomentumConfig::new().with_momentum(0.9)))
                    .init(),
            ),
        }?;

        self.trained = Some(best.valid());
        tracing::info!("Training complete; best model retained");
        Ok(())
    }

    fn evaluate(&mut self, examples: &[EncodedExample]) -> Result<MetricMap> {
        let model = self.trained_model()?;

        let output = self.forward_all(model, examples)?;
        let predicted: Vec<usize> = output
            .logits
            .iter()
            .map(|row| crate::metrics::aggregate::argmax(
                &row.iter().map(|&v| v as f64).collect::<Vec<_>>(),
            ))
            .collect();
        let counts = ConfusionCounts::from_labels(&output.labels, &predicted);

        let mut loss_sum = 0.0f64;
        let mut batches = 0usize;
        for chunk in examples.chunks(self.settings.batch_size) {
            let batch = self.batcher.batch::<EvalBackend>(chunk, &self.device);
            let (loss, _) =
                model.forward_loss(batch.input_ids, batch.attention_mask, batch.labels);
            loss_sum += loss.into_scalar().elem::<f64>();
            batches += 1;
        }

        let mut metrics = MetricMap::new();
        metrics.insert("loss".to_string(), loss_sum / batches.max(1) as f64);
        metrics.insert("accuracy".to_string(), counts.accuracy());
        metrics.insert("matthews_correlation".to_string(), counts.matthews());
        metrics.insert("f1_positive".to_string(), counts.positive_scores().f1);
        metrics.insert("f1_negative".to_string(), counts.negative_scores().f1);
        Ok(metrics)
    }

    fn predict(&mut self, examples: &[EncodedExample]) -> Result<PredictOutput> {
        let model = self.trained_model()?;
        self.forward_all(model, examples)
    }
}

/// Linear warmup to the base rate over `warmup_steps`, then
/// linear decay to zero at `total_steps`.
pub fn learning_rate_at(
    step: usize,
    total_steps: usize,
    warmup_steps: usize,
    base: f64,
) -> f64 {
    if warmup_steps > 0 && step < warmup_steps {
        return base * step as f64 / warmup_steps as f64;
    }
    let decay_span = total_steps.saturating_sub(warmup_steps).max(1) as f64;
    let remaining = total_steps.saturating_sub(step) as f64;
    base * (remaining / decay_span).clamp(0.0, 1.0)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_starts_at_zero_and_warms_up() {
        assert_eq!(learning_rate_at(0, 1000, 100, 5e-5), 0.0);
        let halfway = learning_rate_at(50, 1000, 100, 5e-5);
        assert!((halfway - 2.5e-5).abs() < 1e-12);
        let peak = learning_rate_at(100, 1000, 100, 5e-5);
        assert!((peak - 5e-5).abs() < 1e-12);
    }

    #[test]
    fn test_schedule_decays_to_zero() {
        let late = learning_rate_at(550, 1000, 100, 5e-5);
        assert!((late - 2.5e-5).abs() < 1e-12);
        assert_eq!(learning_rate_at(1000, 1000, 100, 5e-5), 0.0);
        // Past the budget it must not go negative.
        assert_eq!(learning_rate_at(2000, 1000, 100, 5e-5), 0.0);
    }

    #[test]
    fn test_schedule_without_warmup() {
        let first = learning_rate_at(0, 10, 0, 1.0);
        assert!((first - 1.0).abs() < 1e-12);
        assert_eq!(learning_rate_at(10, 10, 0, 1.0), 0.0);
    }
}

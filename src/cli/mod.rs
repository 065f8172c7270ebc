// ============================================================
// Layer 1 — Command-line interface
// ============================================================
// Thin wiring layer: parse arguments, build the real data
// pipeline and trainer, hand everything to the application
// layer.

pub mod commands;

use anyhow::Result;
use clap::Parser;

use crate::application::run_experiment::{run_experiment, trainer_settings, RunConfig, MAX_SEQ_LEN};
use crate::cli::commands::RunArgs;
use crate::data::encoder::TextEncoder;
use crate::data::loader::GlueLoader;
use crate::domain::traits::ExampleSource;
use crate::ml::trainer::FineTuner;

/// Fine-tune a transformer classifier on a GLUE task and report
/// per-split metrics.
#[derive(Debug, Parser)]
#[command(name = "glue-finetune", version, about)]
pub struct Cli {
    #[command(flatten)]
    run: RunArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config: RunConfig = self.run.into();

        // ── Step 1: Fetch the upstream dataset ──
        let loader = GlueLoader::new(config.task);
        let examples = loader.load()?;
        tracing::info!(
            "Loaded {} '{}' examples",
            examples.len(),
            config.task.name(),
        );

        // ── Step 2: Build the tokenizer-backed encoder ──
        let encoder = TextEncoder::from_pretrained(
            config.model.checkpoint(),
            config.model.uses_type_ids(),
            MAX_SEQ_LEN,
        )?;
        let settings = trainer_settings(&config, encoder.vocab_size());
        let pad_id = encoder.pad_id();

        // ── Step 3: Run the experiment ──
        let report = run_experiment(&config, examples, &encoder, |train, valid| {
            Ok(FineTuner::new(settings, pad_id, train, valid))
        })?;

        println!("Report written to {}", report.display());
        Ok(())
    }
}

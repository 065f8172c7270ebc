// ============================================================
// CLI argument definitions
// ============================================================
// The argument surface mirrors the experiment grid: five
// optimizers, two model families, five fixed seeds. Everything
// else is pinned inside the application layer.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::application::run_experiment::{ModelFamily, OptimizerKind, RunConfig};
use crate::domain::task::GlueTask;

pub const ALLOWED_SEEDS: [u64; 5] = [1, 10, 100, 1000, 10000];

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OptimArg {
    Adamw,
    Adam,
    Adamax,
    Sgd,
    Sgdm,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModelArg {
    Roberta,
    Bert,
}

#[derive(Debug, Parser)]
pub struct RunArgs {
    /// GLUE task to fine-tune on
    #[arg(short, long, value_parser = GlueTask::from_name, default_value = "cola")]
    pub task: GlueTask,

    /// Optimizer to fine-tune with
    #[arg(short, long, value_enum, default_value = "adam")]
    pub optimizer: OptimArg,

    /// Pretrained model family
    #[arg(short, long, value_enum, default_value = "bert")]
    pub model: ModelArg,

    /// Run seed, one of 1, 10, 100, 1000, 10000
    #[arg(short, long, value_parser = parse_seed, default_value = "1")]
    pub seed: u64,

    /// Directory the report file is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

fn parse_seed(raw: &str) -> Result<u64, String> {
    let seed: u64 = raw.parse().map_err(|_| format!("'{raw}' is not a number"))?;
    if ALLOWED_SEEDS.contains(&seed) {
        Ok(seed)
    } else {
        Err(format!("seed must be one of {ALLOWED_SEEDS:?}, got {seed}"))
    }
}

impl From<RunArgs> for RunConfig {
    fn from(args: RunArgs) -> Self {
        let optimizer = match args.optimizer {
            OptimArg::Adamw => OptimizerKind::AdamW,
            OptimArg::Adam => OptimizerKind::Adam,
            OptimArg::Adamax => OptimizerKind::Adamax,
            OptimArg::Sgd => OptimizerKind::Sgd,
            OptimArg::Sgdm => OptimizerKind::SgdMomentum,
        };
        let model = match args.model {
            ModelArg::Roberta => ModelFamily::Roberta,
            ModelArg::Bert => ModelFamily::Bert,
        };
        RunConfig {
            task: args.task,
            model,
            optimizer,
            seed: args.seed,
            output_dir: args.output_dir,
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_adam_bert_seed_one() {
        let args = RunArgs::parse_from(["glue-finetune"]);
        let config: RunConfig = args.into();
        assert_eq!(config.optimizer, OptimizerKind::Adam);
        assert_eq!(config.model, ModelFamily::Bert);
        assert_eq!(config.seed, 1);
        assert_eq!(config.task, GlueTask::Cola);
    }

    #[test]
    fn test_short_flags_select_the_variant() {
        let args = RunArgs::parse_from(["glue-finetune", "-o", "sgdm", "-m", "roberta", "-s", "10000"]);
        let config: RunConfig = args.into();
        assert_eq!(config.optimizer, OptimizerKind::SgdMomentum);
        assert_eq!(config.model, ModelFamily::Roberta);
        assert_eq!(config.seed, 10000);
    }

    #[test]
    fn test_unlisted_seed_is_rejected() {
        let result = RunArgs::try_parse_from(["glue-finetune", "-s", "7"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_task_flag_resolves_catalogue_names() {
        let args = RunArgs::parse_from(["glue-finetune", "-t", "rte"]);
        let config: RunConfig = args.into();
        assert_eq!(config.task, GlueTask::Rte);

        let result = RunArgs::try_parse_from(["glue-finetune", "-t", "nope"]);
        assert!(result.is_err());
    }
}

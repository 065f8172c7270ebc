// ============================================================
// glue-finetune — optimizer comparison on GLUE fine-tuning
// ============================================================

#![recursion_limit = "256"]

mod application;
mod cli;
mod data;
mod domain;
mod infra;
mod metrics;
mod ml;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // The tokenizer's thread pool noisily warns when the process
    // forks; the pipeline tokenizes up front anyway.
    std::env::set_var("TOKENIZERS_PARALLELISM", "false");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("glue_finetune=info")),
        )
        .init();

    cli::Cli::parse().run()
}

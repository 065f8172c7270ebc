// ============================================================
// Result report files
// ============================================================
// One plain-text file per run, named after the full experiment
// coordinates, with a TRAIN / VALID / TEST section each holding
// the Matthews correlation, per-class F1, per-class PR-AUC and
// the macro aggregates. The body is assembled in memory first so
// a failed write never leaves a truncated report behind.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::run_experiment::RunConfig;
use crate::metrics::aggregate::BinaryScores;

/// Everything the report prints for one data split.
#[derive(Debug, Clone)]
pub struct SplitSection {
    pub name: &'static str,
    pub matthews: f64,
    pub scores: BinaryScores,
}

pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `cola_bert_adam_seed_1.txt` and friends.
    pub fn file_name(config: &RunConfig) -> String {
        format!(
            "{}_{}_{}_seed_{}.txt",
            config.task.name(),
            config.model.as_str(),
            config.optimizer.as_str(),
            config.seed,
        )
    }

    /// Write the full report and return its path.
    pub fn write(&self, config: &RunConfig, sections: &[SplitSection]) -> Result<PathBuf> {
        let mut body = String::new();
        for section in sections {
            format_section(&mut body, section);
        }

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating report dir {}", self.dir.display()))?;
        let path = self.dir.join(Self::file_name(config));
        fs::write(&path, body)
            .with_context(|| format!("writing report to {}", path.display()))?;
        Ok(path)
    }
}

fn format_section(out: &mut String, section: &SplitSection) {
    let s = &section.scores;
    let _ = writeln!(out, "{}:", section.name);
    let _ = writeln!(out, "Matthews: {:.4}", section.matthews);
    let _ = writeln!(out, "Positive class f1-score: {:.2}%", s.f1_positive * 100.0);
    let _ = writeln!(out, "Negative class f1-score: {:.2}%", s.f1_negative * 100.0);
    let _ = writeln!(
        out,
        "precision-recall AUC score positive class: {:.2}%",
        s.auc_positive * 100.0
    );
    let _ = writeln!(
        out,
        "precision-recall AUC score negative class: {:.2}%",
        s.auc_negative * 100.0
    );
    let _ = writeln!(out, "--- MACRO-AVERAGED RESULTS ---");
    let _ = writeln!(out, "macro-f1-score: {:.2}%", s.macro_f1 * 100.0);
    let _ = writeln!(
        out,
        "macro-precision-recall AUC score: {:.2}%",
        s.macro_auc * 100.0
    );
    let _ = writeln!(out, "------------------------------");
    let _ = writeln!(out);
}

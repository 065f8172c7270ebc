// ============================================================
// Layer 3 — GLUE Task Catalogue
// ============================================================
// Every GLUE sub-task ships with its own column names and label
// cardinality, so the rest of the pipeline never hardcodes a
// schema — it asks the task. The mapping here is the benchmark's
// fixed contract:
//
//   task     text fields              labels
//   cola     sentence                 2
//   sst2     sentence                 2
//   mrpc     sentence1, sentence2     2
//   qqp      question1, question2     2
//   stsb     sentence1, sentence2     1 (regression)
//   mnli     premise, hypothesis      3
//   mnli-mm  premise, hypothesis      3
//   qnli     question, sentence       2
//   rte      sentence1, sentence2     2
//   wnli     sentence1, sentence2     2
//
// mnli-mm shares mnli's training data but is evaluated on the
// mismatched validation split, hence the separate variant.

use thiserror::Error;

/// Raised when a task name is not part of the fixed GLUE catalogue.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown GLUE task '{0}' (expected one of: cola, mnli, mnli-mm, mrpc, qnli, qqp, rte, sst2, stsb, wnli)")]
pub struct UnknownTask(pub String);

/// One of the fixed GLUE benchmark sub-tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlueTask {
    Cola,
    Mnli,
    MnliMm,
    Mrpc,
    Qnli,
    Qqp,
    Rte,
    Sst2,
    Stsb,
    Wnli,
}

impl GlueTask {
    /// Resolve a task from its benchmark name.
    pub fn from_name(name: &str) -> Result<Self, UnknownTask> {
        match name {
            "cola"    => Ok(Self::Cola),
            "mnli"    => Ok(Self::Mnli),
            "mnli-mm" => Ok(Self::MnliMm),
            "mrpc"    => Ok(Self::Mrpc),
            "qnli"    => Ok(Self::Qnli),
            "qqp"     => Ok(Self::Qqp),
            "rte"     => Ok(Self::Rte),
            "sst2"    => Ok(Self::Sst2),
            "stsb"    => Ok(Self::Stsb),
            "wnli"    => Ok(Self::Wnli),
            other     => Err(UnknownTask(other.to_string())),
        }
    }

    /// The benchmark name, used in the report file name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Cola   => "cola",
            Self::Mnli   => "mnli",
            Self::MnliMm => "mnli-mm",
            Self::Mrpc   => "mrpc",
            Self::Qnli   => "qnli",
            Self::Qqp    => "qqp",
            Self::Rte    => "rte",
            Self::Sst2   => "sst2",
            Self::Stsb   => "stsb",
            Self::Wnli   => "wnli",
        }
    }

    /// The Hugging Face subset the raw data comes from.
    /// mnli-mm is not a dataset of its own — it reuses mnli.
    pub fn dataset_name(self) -> &'static str {
        match self {
            Self::MnliMm => "mnli",
            other        => other.name(),
        }
    }

    /// The upstream validation split name. Plain "validation"
    /// everywhere except the two MNLI variants.
    pub fn validation_split(self) -> &'static str {
        match self {
            Self::Mnli   => "validation_matched",
            Self::MnliMm => "validation_mismatched",
            _            => "validation",
        }
    }

    /// Column names holding the text: one sentence, or a pair.
    pub fn text_fields(self) -> (&'static str, Option<&'static str>) {
        match self {
            Self::Cola | Self::Sst2    => ("sentence", None),
            Self::Mnli | Self::MnliMm  => ("premise", Some("hypothesis")),
            Self::Mrpc | Self::Rte | Self::Stsb | Self::Wnli => {
                ("sentence1", Some("sentence2"))
            }
            Self::Qnli => ("question", Some("sentence")),
            Self::Qqp  => ("question1", Some("question2")),
        }
    }

    /// Label cardinality: 3 for the MNLI variants, 1 for the
    /// STS-B regression task, 2 everywhere else.
    pub fn num_labels(self) -> usize {
        match self {
            Self::Mnli | Self::MnliMm => 3,
            Self::Stsb => 1,
            _ => 2,
        }
    }
}

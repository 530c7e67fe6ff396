//! Error types for the minification pipeline.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::asset::{AssetType, JobOutcome};

// ============================================================================
// MinifyError
// ============================================================================

/// Per-job failure kinds. Every variant aborts the batch.
#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("unsupported asset type `{ext}` (expected css or js)")]
    UnsupportedType { ext: String },

    #[error("asset type must be set explicitly for literal source text")]
    UnknownType,

    #[error("no {0} minifier backend available")]
    MissingBackend(AssetType),

    #[error("{kind} minification failed: {message}")]
    MinificationFailure { kind: AssetType, message: String },

    #[error("failed to read `{}`", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write `{}`", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("shared destination `{}` is not a directory but {sources} sources would write to it", path.display())]
    SharedDestination { path: PathBuf, sources: usize },
}

impl MinifyError {
    pub fn failure(kind: AssetType, message: impl Into<String>) -> Self {
        Self::MinificationFailure {
            kind,
            message: message.into(),
        }
    }

    /// Short stable name of the kind, for reporting.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "UnsupportedType",
            Self::UnknownType => "UnknownType",
            Self::MissingBackend(_) => "MissingBackend",
            Self::MinificationFailure { .. } => "MinificationFailure",
            Self::ReadFailure { .. } => "ReadFailure",
            Self::WriteFailure { .. } => "WriteFailure",
            Self::SharedDestination { .. } => "SharedDestination",
        }
    }
}

// ============================================================================
// BatchError
// ============================================================================

/// Terminal failure of a batch: the first error plus the job it hit.
///
/// Outputs of `completed` jobs are already on disk and are not rolled back.
#[derive(Debug)]
pub struct BatchError {
    /// Index of the failing job in resolution order (`None` for batch-level
    /// failures raised before any job started).
    pub job: Option<usize>,
    /// Human-readable label of the failing job (source path or `<text>`).
    pub label: String,
    pub error: MinifyError,
    pub completed: Vec<JobOutcome>,
}

impl BatchError {
    pub(crate) fn batch(error: MinifyError) -> Self {
        Self {
            job: None,
            label: String::new(),
            error,
            completed: Vec::new(),
        }
    }

    pub(crate) fn at(index: usize, label: impl Into<String>, error: MinifyError) -> Self {
        Self {
            job: Some(index),
            label: label.into(),
            error,
            completed: Vec::new(),
        }
    }

    pub(crate) fn with_completed(mut self, completed: Vec<JobOutcome>) -> Self {
        self.completed = completed;
        self
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.job {
            Some(index) => write!(f, "job #{} ({}) failed", index + 1, self.label),
            None => f.write_str("batch rejected"),
        }
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

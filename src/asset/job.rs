//! Jobs and their outcomes.

use std::path::{Path, PathBuf};

use super::AssetType;

/// Where a job came from. Drives destination naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Mapping entry with an explicit destination.
    Named,
    /// Bare source path (mapping entry without destination, or glob match).
    Bare,
    /// Literal source text.
    Text,
}

/// One source → destination minification unit.
#[derive(Debug, Clone)]
pub struct Job {
    pub origin: Origin,
    pub source: Option<PathBuf>,
    /// Always a file path once destination mapping has run
    /// (literal-text jobs may stay unset).
    pub destination: Option<PathBuf>,
    pub kind: Option<AssetType>,
    pub text: Option<String>,
}

impl Job {
    pub fn named(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::Named,
            source: Some(source.into()),
            destination: Some(destination.into()),
            kind: None,
            text: None,
        }
    }

    pub fn bare(source: impl Into<PathBuf>) -> Self {
        Self {
            origin: Origin::Bare,
            source: Some(source.into()),
            destination: None,
            kind: None,
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            origin: Origin::Text,
            source: None,
            destination: None,
            kind: None,
            text: Some(text.into()),
        }
    }

    /// Label used in logs and failure reports.
    pub fn label(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => "<text>".to_string(),
        }
    }
}

/// Result of one successfully processed job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    /// `None` when a literal-text job was minified without being written.
    pub destination: Option<PathBuf>,
    pub kind: AssetType,
    pub size_before: usize,
    pub size_after: usize,
    pub reduction_percent: f64,
    /// Minified text, kept only for jobs that were not written.
    pub output: Option<String>,
}

impl JobOutcome {
    pub fn new(
        destination: Option<PathBuf>,
        kind: AssetType,
        size_before: usize,
        size_after: usize,
    ) -> Self {
        Self {
            destination,
            kind,
            size_before,
            size_after,
            reduction_percent: reduction_percent(size_before, size_after),
            output: None,
        }
    }

    pub fn destination_display(&self) -> String {
        self.destination
            .as_deref()
            .map_or_else(|| "<stdout>".to_string(), |p: &Path| p.display().to_string())
    }
}

/// Ordered outcomes of a fully successful batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    /// Number of jobs processed.
    pub fn count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn total_before(&self) -> usize {
        self.outcomes.iter().map(|o| o.size_before).sum()
    }

    pub fn total_after(&self) -> usize {
        self.outcomes.iter().map(|o| o.size_after).sum()
    }

    pub fn total_reduction_percent(&self) -> f64 {
        reduction_percent(self.total_before(), self.total_after())
    }
}

/// `100 - after / before * 100`, rounded to one decimal; `0` for empty input.
#[allow(clippy::cast_precision_loss)]
pub fn reduction_percent(before: usize, after: usize) -> f64 {
    if before == 0 {
        return 0.0;
    }
    let pct = 100.0 - (after as f64 / before as f64 * 100.0);
    (pct * 10.0).round() / 10.0
}

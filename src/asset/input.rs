//! Input resolution: explicit mappings, glob patterns and literal text.
//!
//! ```text
//! FromMapping [a.css → out.css, b.js]  →  Job::named(a.css, out.css), Job::bare(b.js)
//! FromPattern "web/*.css" (matches)    →  Job::bare(web/a.css), Job::bare(web/b.css)
//! FromPattern "body{color:red}"        →  Job::text("body{color:red}")
//! FromText    "alert('x')"             →  Job::text("alert('x')")
//! ```

use std::path::PathBuf;

use super::Job;

/// One entry of an explicit mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub source: PathBuf,
    /// Explicit destination; `None` for a bare source.
    pub destination: Option<PathBuf>,
}

impl MappingEntry {
    pub fn bare(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: None,
        }
    }

    pub fn to(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: Some(destination.into()),
        }
    }
}

/// The three accepted input shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    FromMapping(Vec<MappingEntry>),
    /// Glob pattern; falls back to literal text when nothing matches.
    FromPattern(String),
    FromText(String),
}

impl Input {
    /// Mapping of bare sources.
    pub fn sources<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self::FromMapping(paths.into_iter().map(MappingEntry::bare).collect())
    }
}

// ============================================================================
// Glob service
// ============================================================================

/// External glob-matching service.
pub trait GlobMatcher {
    /// Matched paths in order, or `None` when nothing matches.
    fn matches(&self, pattern: &str) -> Option<Vec<PathBuf>>;
}

/// Filesystem glob backed by the `glob` crate.
///
/// Invalid patterns are treated as "no match" so that arbitrary source text
/// falls through to literal mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsGlob;

impl GlobMatcher for FsGlob {
    fn matches(&self, pattern: &str) -> Option<Vec<PathBuf>> {
        let paths = glob::glob(pattern).ok()?;
        let files: Vec<PathBuf> = paths
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .collect();
        (!files.is_empty()).then_some(files)
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Normalize an input into jobs, preserving order.
pub fn resolve(input: &Input, glob: &dyn GlobMatcher) -> Vec<Job> {
    match input {
        Input::FromMapping(entries) => entries.iter().map(job_from_entry).collect(),
        Input::FromPattern(pattern) => match glob.matches(pattern) {
            Some(paths) => paths.into_iter().map(Job::bare).collect(),
            None => vec![Job::text(pattern.clone())],
        },
        Input::FromText(text) => vec![Job::text(text.clone())],
    }
}

fn job_from_entry(entry: &MappingEntry) -> Job {
    match &entry.destination {
        Some(dest) => Job::named(&entry.source, dest),
        None => Job::bare(&entry.source),
    }
}

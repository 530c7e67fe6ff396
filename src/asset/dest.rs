//! Destination mapping.
//!
//! Naming policy for jobs without an explicit destination:
//!
//! ```text
//! web/app.js            → web/app.min.js
//! web/site.CSS          → web/site.min.CSS
//! dist/ (existing dir)  → dist/app.js
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::debug;
use crate::error::{BatchError, MinifyError};

use super::{AssetType, Job, Origin, classify_path};

/// `<dir>/<stem>.min.<ext>` next to the source.
///
/// `fallback_ext` is used when the source has no extension.
pub fn conventional_destination(source: &Path, fallback_ext: &str) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default();
    let ext = source
        .extension()
        .map_or_else(|| OsString::from(fallback_ext), OsString::from);

    let mut name = OsString::from(stem);
    name.push(".min.");
    name.push(ext);
    source.with_file_name(name)
}

/// Append the source's base name when `dest` is an existing directory.
pub fn expand_directory(dest: PathBuf, source: Option<&Path>) -> PathBuf {
    if !dest.is_dir() {
        return dest;
    }
    match source.and_then(Path::file_name) {
        Some(name) => dest.join(name),
        None => dest,
    }
}

/// Speculative classification used for destination naming.
///
/// An explicit batch type wins over the source extension.
pub fn speculative_kind(
    job: &Job,
    forced: Option<AssetType>,
) -> Result<Option<AssetType>, MinifyError> {
    if let Some(kind) = forced {
        return Ok(Some(kind));
    }
    match &job.source {
        Some(source) => classify_path(source).map(Some),
        None => Ok(None),
    }
}

/// Fill in a destination (and speculative type) for every job.
///
/// A shared destination applies to every bare-source and literal-text job.
/// Unless it is an existing directory, at most one bare source may use it.
pub fn map_destinations(
    jobs: &mut [Job],
    shared: Option<&Path>,
    forced: Option<AssetType>,
) -> Result<(), BatchError> {
    if let Some(shared) = shared {
        let bare = jobs.iter().filter(|j| j.origin == Origin::Bare).count();
        if bare > 1 && !shared.is_dir() {
            return Err(BatchError::batch(MinifyError::SharedDestination {
                path: shared.to_path_buf(),
                sources: bare,
            }));
        }
    }

    for (index, job) in jobs.iter_mut().enumerate() {
        let kind =
            speculative_kind(job, forced).map_err(|e| BatchError::at(index, job.label(), e))?;
        job.kind = kind;

        let dest = match (&job.origin, job.destination.take()) {
            (Origin::Named, Some(dest)) => Some(dest),
            (_, _) if shared.is_some() => shared.map(Path::to_path_buf),
            (Origin::Text, _) => None,
            (_, _) => job.source.as_deref().map(|source| {
                conventional_destination(source, kind.map_or("", AssetType::ext))
            }),
        };

        job.destination = dest.map(|d| expand_directory(d, job.source.as_deref()));
        if let Some(dest) = &job.destination {
            debug!("map"; "{} → {}", job.label(), dest.display());
        }
    }
    Ok(())
}

//! Asset minification build step.
//!
//! Resolves CSS/JS inputs (explicit mappings, glob patterns or literal text)
//! into jobs, names their outputs, minifies each through a pluggable backend
//! and writes the result atomically.

pub mod asset;
pub mod config;
pub mod error;
pub mod logger;
pub mod pipeline;

pub use asset::minify::{Backends, CssOptions, JsOptions, Minifier, MinifyOptions, SpecialVars};
pub use asset::{AssetType, BatchReport, GlobMatcher, Input, JobOutcome, MappingEntry, classify};
pub use config::{ConfigError, MinifyConfig};
pub use error::{BatchError, MinifyError};
pub use pipeline::Pipeline;

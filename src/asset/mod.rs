//! Asset jobs: resolution, classification, naming, minification, writing.

mod dest;
mod input;
mod job;
mod kind;
pub mod minify;
mod write;

// Types
pub use job::{BatchReport, Job, JobOutcome, Origin, reduction_percent};
pub use kind::{AssetType, classify, classify_path};

// Resolution (pure functions)
pub use dest::{conventional_destination, expand_directory, map_destinations, speculative_kind};
pub use input::{FsGlob, GlobMatcher, Input, MappingEntry, resolve};

// Writing (side effects)
pub use write::{temp_path, write_atomic};

//! Crash-safe output writes.
//!
//! Content goes to `<dest>.tmp` first and is then renamed over `<dest>`,
//! so the destination is either untouched or complete. An interruption
//! between the two steps leaves at most a stray `.tmp` file.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::MinifyError;

const TMP_SUFFIX: &str = ".tmp";

/// Sibling temporary path for `dest`.
pub fn temp_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(TMP_SUFFIX);
    PathBuf::from(name)
}

/// Atomically replace `dest` with `content`, creating parent directories.
pub fn write_atomic(dest: &Path, content: &str) -> Result<(), MinifyError> {
    let fail = |source: io::Error| MinifyError::WriteFailure {
        path: dest.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(fail)?;
    }

    let tmp = temp_path(dest);
    let result = (|| -> io::Result<()> {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, dest)
    })();

    if let Err(e) = result {
        fs::remove_file(&tmp).ok();
        return Err(fail(e));
    }
    Ok(())
}

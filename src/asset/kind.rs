//! Asset type definitions.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::MinifyError;

/// Kind of minifiable asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    /// Stylesheet (`.css`).
    Css,
    /// Script (`.js`).
    Js,
}

impl AssetType {
    /// All supported types, in display order.
    pub const ALL: [Self; 2] = [Self::Css, Self::Js];

    /// Canonical lower-case extension.
    pub const fn ext(self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Js => "js",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ext())
    }
}

impl FromStr for AssetType {
    type Err = MinifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        classify(s)
    }
}

/// Classify an extension string (case-insensitive).
pub fn classify(ext: &str) -> Result<AssetType, MinifyError> {
    match ext.to_ascii_lowercase().as_str() {
        "css" => Ok(AssetType::Css),
        "js" => Ok(AssetType::Js),
        _ => Err(MinifyError::UnsupportedType {
            ext: ext.to_string(),
        }),
    }
}

/// Classify a path by its extension. A missing extension is reported as
/// an empty one.
pub fn classify_path(path: &Path) -> Result<AssetType, MinifyError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy())
        .unwrap_or_default();
    classify(&ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_supported() {
        assert_eq!(classify("css").unwrap(), AssetType::Css);
        assert_eq!(classify("js").unwrap(), AssetType::Js);
    }

    #[test]
    fn test_classify_case_insensitive() {
        for ty in AssetType::ALL {
            let upper = ty.ext().to_ascii_uppercase();
            assert_eq!(classify(ty.ext()).unwrap(), classify(&upper).unwrap());
        }
        assert_eq!(classify("Js").unwrap(), AssetType::Js);
    }

    #[test]
    fn test_classify_unsupported() {
        for ext in ["xml", "html", "", "mjs", "scss", "min.js"] {
            match classify(ext) {
                Err(MinifyError::UnsupportedType { ext: got }) => assert_eq!(got, ext),
                other => panic!("expected UnsupportedType for {ext:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_classify_path() {
        assert_eq!(
            classify_path(Path::new("web/app.min.JS")).unwrap(),
            AssetType::Js
        );
        assert!(classify_path(Path::new("web/Makefile")).is_err());
    }

    #[test]
    fn test_from_str_and_display() {
        let ty: AssetType = "CSS".parse().unwrap();
        assert_eq!(ty, AssetType::Css);
        assert_eq!(ty.to_string(), "css");
    }
}

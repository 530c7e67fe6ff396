//! Configuration file (`minify.toml`).
//!
//! # Example
//!
//! ```toml
//! destination = "dist/"
//! type = "js"
//!
//! [js]
//! single-line = true
//! keep-important-comments = true
//! special-var-pattern = "^\\$[a-z]+$"   # or true / false
//!
//! [css]
//! optimize = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::asset::minify::{CssOptions, JsOptions, MinifyOptions, SpecialVars};
use crate::asset::{AssetType, classify};
use crate::pipeline::Pipeline;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG: &str = "minify.toml";

// ============================================================================
// ConfigError
// ============================================================================

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct MinifyConfig {
    /// Shared destination for bare sources.
    pub destination: Option<PathBuf>,
    /// Force every job to this type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub js: JsSection,
    pub css: CssSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct JsSection {
    pub single_line: bool,
    pub keep_important_comments: bool,
    pub special_var_pattern: SpecialVarSetting,
}

impl Default for JsSection {
    fn default() -> Self {
        let js = JsOptions::default();
        Self {
            single_line: js.single_line,
            keep_important_comments: js.keep_important_comments,
            special_var_pattern: SpecialVarSetting::Flag(false),
        }
    }
}

/// `special-var-pattern = true | false | "<regex>"`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SpecialVarSetting {
    Flag(bool),
    Pattern(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct CssSection {
    pub optimize: bool,
}

impl Default for CssSection {
    fn default() -> Self {
        Self {
            optimize: CssOptions::default().optimize,
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl MinifyConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::parse(&content)
    }

    /// Load `path` if given, else the default file when present, else defaults.
    ///
    /// An explicitly requested file must exist.
    pub fn discover(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse and validate config content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check `type` and `special-var-pattern`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.asset_type()?;
        self.special_vars()?;
        Ok(())
    }

    pub fn asset_type(&self) -> Result<Option<AssetType>, ConfigError> {
        self.kind
            .as_deref()
            .map(classify)
            .transpose()
            .map_err(|e| ConfigError::Validation(format!("type: {e}")))
    }

    pub fn special_vars(&self) -> Result<SpecialVars, ConfigError> {
        match &self.js.special_var_pattern {
            SpecialVarSetting::Flag(false) => Ok(SpecialVars::Disabled),
            SpecialVarSetting::Flag(true) => Ok(SpecialVars::Default),
            SpecialVarSetting::Pattern(pattern) => SpecialVars::pattern(pattern).map_err(|e| {
                ConfigError::Validation(format!("js.special-var-pattern: {e}"))
            }),
        }
    }

    pub fn minify_options(&self) -> Result<MinifyOptions, ConfigError> {
        Ok(MinifyOptions {
            js: JsOptions {
                single_line: self.js.single_line,
                keep_important_comments: self.js.keep_important_comments,
                special_vars: self.special_vars()?,
            },
            css: CssOptions {
                optimize: self.css.optimize,
            },
        })
    }

    /// Push every configured value into `pipeline`.
    pub fn apply(&self, pipeline: &mut Pipeline) -> Result<(), ConfigError> {
        pipeline.set_options(self.minify_options()?);
        if let Some(kind) = self.asset_type()? {
            pipeline.set_kind(kind);
        }
        if let Some(dest) = &self.destination {
            pipeline.set_destination(dest);
        }
        Ok(())
    }
}

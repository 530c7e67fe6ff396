//! CSS minification via lightningcss.

use lightningcss::stylesheet::{
    MinifyOptions as RuleOptions, ParserOptions, PrinterOptions, StyleSheet,
};

use crate::asset::AssetType;
use crate::error::MinifyError;

use super::{Minifier, MinifyOptions};

/// lightningcss backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct LightningCss;

impl Minifier for LightningCss {
    fn kind(&self) -> AssetType {
        AssetType::Css
    }

    fn name(&self) -> &'static str {
        "lightningcss"
    }

    fn minify(&self, source: &str, options: &MinifyOptions) -> Result<String, MinifyError> {
        let fail = |e: String| MinifyError::failure(AssetType::Css, e);

        let mut stylesheet =
            StyleSheet::parse(source, ParserOptions::default()).map_err(|e| fail(e.to_string()))?;

        if options.css.optimize {
            stylesheet
                .minify(RuleOptions::default())
                .map_err(|e| fail(e.to_string()))?;
        }

        let result = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| fail(e.to_string()))?;
        Ok(result.code)
    }
}

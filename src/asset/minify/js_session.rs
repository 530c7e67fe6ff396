//! JavaScript minification via minify-js.

use minify_js::{Session, TopLevelMode, minify};

use crate::asset::AssetType;
use crate::error::MinifyError;

use super::{JsOptions, Minifier, MinifyOptions, important_comments};

/// minify-js backend.
///
/// The engine always prints a single line and drops every comment. Important
/// comments are re-attached in front of the output; `single_line = false`
/// cannot be honoured and is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinifyJs;

impl Minifier for MinifyJs {
    fn kind(&self) -> AssetType {
        AssetType::Js
    }

    fn name(&self) -> &'static str {
        "minify-js"
    }

    fn minify(&self, source: &str, options: &MinifyOptions) -> Result<String, MinifyError> {
        let js = &options.js;
        if !js.single_line {
            return Err(MinifyError::failure(
                AssetType::Js,
                "minify-js only produces single-line output (set js.single-line = true)",
            ));
        }

        let mode = if js.special_vars.declared_in(source) {
            TopLevelMode::Module
        } else {
            TopLevelMode::Global
        };

        let session = Session::new();
        let mut output = Vec::new();
        minify(&session, mode, source.as_bytes(), &mut output)
            .map_err(|e| MinifyError::failure(AssetType::Js, format!("{e:?}")))?;

        let code = String::from_utf8(output)
            .map_err(|e| MinifyError::failure(AssetType::Js, e.to_string()))?;
        Ok(with_important_comments(source, code, js))
    }
}

fn with_important_comments(source: &str, code: String, js: &JsOptions) -> String {
    if !js.keep_important_comments {
        return code;
    }
    let comments = important_comments(source);
    if comments.is_empty() {
        return code;
    }
    let mut out = comments.join("\n");
    out.push('\n');
    out.push_str(&code);
    out
}

//! JavaScript minification via oxc.

use oxc::allocator::Allocator;
use oxc::ast::ast::Program;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions, LegalComment};
use oxc::mangler::MangleOptions;
use oxc::minifier::{
    CompressOptions, CompressOptionsUnused, Minifier as OxcMinifier, MinifierOptions,
};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::asset::AssetType;
use crate::error::MinifyError;

use super::{JsOptions, Minifier, MinifyOptions};

/// oxc backend.
///
/// Sources are parsed as classic scripts: top-level declarations are globals
/// that other scripts may reach, so they keep their names and are never
/// dropped as unused. When the source declares a special variable, top-level
/// names are mangled too, still without dropping any. Sources using
/// `import`/`export` fail to parse as scripts and are minified as modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcJs;

impl Minifier for OxcJs {
    fn kind(&self) -> AssetType {
        AssetType::Js
    }

    fn name(&self) -> &'static str {
        "oxc"
    }

    fn minify(&self, source: &str, options: &MinifyOptions) -> Result<String, MinifyError> {
        let js = &options.js;
        let allocator = Allocator::default();

        let (mut program, minifier_options) =
            match parse(&allocator, source, SourceType::script()) {
                Ok(program) => (program, script_options(js.special_vars.declared_in(source))),
                Err(_) => (parse(&allocator, source, SourceType::mjs())?, module_options()),
            };
        let ret = OxcMinifier::new(minifier_options).minify(&allocator, &mut program);

        let code = Codegen::new()
            .with_options(codegen_options(js))
            .with_scoping(ret.scoping)
            .build(&program)
            .code;
        Ok(code)
    }
}

fn script_options(mangle_top_level: bool) -> MinifierOptions {
    MinifierOptions {
        mangle: Some(MangleOptions {
            top_level: Some(mangle_top_level),
            ..MangleOptions::default()
        }),
        compress: Some(CompressOptions {
            unused: CompressOptionsUnused::Keep,
            ..CompressOptions::smallest()
        }),
    }
}

fn module_options() -> MinifierOptions {
    MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    }
}

fn parse<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    source_type: SourceType,
) -> Result<Program<'a>, MinifyError> {
    let ret = Parser::new(allocator, source, source_type).parse();
    if let Some(error) = ret.errors.first() {
        return Err(MinifyError::failure(AssetType::Js, error.to_string()));
    }
    Ok(ret.program)
}

fn codegen_options(js: &JsOptions) -> CodegenOptions {
    let comments = if js.keep_important_comments {
        CommentOptions {
            legal: LegalComment::Inline,
            ..CommentOptions::disabled()
        }
    } else {
        CommentOptions::disabled()
    };
    CodegenOptions {
        minify: js.single_line,
        comments,
        ..CodegenOptions::default()
    }
}

//! Per-type minification options.

use std::sync::LazyLock;

use regex::Regex;

/// Default pattern for "special" (private) variable names: `$foo`, `_x`.
pub const DEFAULT_SPECIAL_VAR_PATTERN: &str = r"(\$+[a-zA-Z_]|_[a-zA-Z0-9$])[a-zA-Z0-9_$]*";

static DEFAULT_SPECIAL_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_SPECIAL_VAR_PATTERN).unwrap());

/// Names bound by `var`/`let`/`const`/`function`/`class`.
static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:var|let|const|function|class)[ \t\r\n]+([A-Za-z_$][A-Za-z0-9_$]*)").unwrap()
});

static BLOCK_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// Special variable handling for JS.
#[derive(Debug, Clone, Default)]
pub enum SpecialVars {
    #[default]
    Disabled,
    /// Use [`DEFAULT_SPECIAL_VAR_PATTERN`].
    Default,
    Pattern(Regex),
}

impl SpecialVars {
    /// Compile a user pattern.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    /// Effective regex, `None` when disabled.
    pub fn regex(&self) -> Option<&Regex> {
        match self {
            Self::Disabled => None,
            Self::Default => Some(&*DEFAULT_SPECIAL_VAR_RE),
            Self::Pattern(re) => Some(re),
        }
    }

    /// Whether `source` declares a binding whose whole name matches.
    ///
    /// Always `false` when disabled.
    pub fn declared_in(&self, source: &str) -> bool {
        let Some(special) = self.regex() else {
            return false;
        };
        DECLARATION_RE
            .captures_iter(source)
            .filter_map(|caps| caps.get(1))
            .map(|name| name.as_str())
            .any(|name| {
                special
                    .find(name)
                    .is_some_and(|m| m.start() == 0 && m.end() == name.len())
            })
    }
}

/// Block comments worth keeping: `/*! ... */`, or any containing
/// `@license` / `@preserve`. Returned in source order.
///
/// Scans the raw text, so a comment-like sequence inside a string literal
/// is picked up too.
pub fn important_comments(source: &str) -> Vec<&str> {
    BLOCK_COMMENT_RE
        .find_iter(source)
        .map(|m| m.as_str())
        .filter(|c| c.starts_with("/*!") || c.contains("@license") || c.contains("@preserve"))
        .collect()
}

impl PartialEq for SpecialVars {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Disabled, Self::Disabled) | (Self::Default, Self::Default) => true,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

/// JavaScript minification options.
#[derive(Debug, Clone, PartialEq)]
pub struct JsOptions {
    /// Strip all line breaks (otherwise one statement per line).
    pub single_line: bool,
    /// Keep `/*! ... */`, `@license` and `@preserve` comments.
    pub keep_important_comments: bool,
    pub special_vars: SpecialVars,
}

impl Default for JsOptions {
    fn default() -> Self {
        Self {
            single_line: true,
            keep_important_comments: true,
            special_vars: SpecialVars::Disabled,
        }
    }
}

/// CSS minification options.
#[derive(Debug, Clone, PartialEq)]
pub struct CssOptions {
    /// Run rule-level optimizations before printing.
    pub optimize: bool,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self { optimize: true }
    }
}

/// Options shared by every job of one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MinifyOptions {
    pub js: JsOptions,
    pub css: CssOptions,
}

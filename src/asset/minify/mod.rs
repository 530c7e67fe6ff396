//! Asset minification backends for JS and CSS.
//!
//! Uses lightningcss for CSS and oxc for JavaScript, with minify-js as an
//! alternative JS engine. Which engines exist is decided by cargo features;
//! callers may also register their own [`Minifier`].

#[cfg(feature = "css")]
mod css;
#[cfg(feature = "oxc")]
mod js;
#[cfg(feature = "minify-js")]
mod js_session;
mod options;

use std::fmt;

use crate::error::MinifyError;

use super::AssetType;

#[cfg(feature = "css")]
pub use css::LightningCss;
#[cfg(feature = "oxc")]
pub use js::OxcJs;
#[cfg(feature = "minify-js")]
pub use js_session::MinifyJs;
pub use options::{
    CssOptions, DEFAULT_SPECIAL_VAR_PATTERN, JsOptions, MinifyOptions, SpecialVars,
    important_comments,
};

/// A minification engine for one asset type.
pub trait Minifier {
    /// Asset type this backend handles.
    fn kind(&self) -> AssetType;

    /// Engine name for logs.
    fn name(&self) -> &'static str;

    /// Compress `source`. Errors must be [`MinifyError::MinificationFailure`].
    fn minify(&self, source: &str, options: &MinifyOptions) -> Result<String, MinifyError>;
}

/// Registered backends, at most one per asset type.
#[derive(Default)]
pub struct Backends {
    css: Option<Box<dyn Minifier>>,
    js: Option<Box<dyn Minifier>>,
}

impl Backends {
    /// No backend at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every backend compiled into this build. oxc wins over minify-js.
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut backends = Self::empty();
        #[cfg(feature = "minify-js")]
        backends.register(Box::new(MinifyJs));
        #[cfg(feature = "oxc")]
        backends.register(Box::new(OxcJs));
        #[cfg(feature = "css")]
        backends.register(Box::new(LightningCss));
        backends
    }

    /// Install a backend, replacing any previous one for its type.
    pub fn register(&mut self, backend: Box<dyn Minifier>) -> &mut Self {
        let kind = backend.kind();
        *self.slot_mut(kind) = Some(backend);
        self
    }

    /// Remove the backend for `kind`.
    pub fn unregister(&mut self, kind: AssetType) -> Option<Box<dyn Minifier>> {
        self.slot_mut(kind).take()
    }

    pub fn get(&self, kind: AssetType) -> Option<&dyn Minifier> {
        match kind {
            AssetType::Css => self.css.as_deref(),
            AssetType::Js => self.js.as_deref(),
        }
    }

    pub fn is_available(&self, kind: AssetType) -> bool {
        self.get(kind).is_some()
    }

    /// Dispatch to the backend registered for `kind`.
    pub fn minify(
        &self,
        text: &str,
        kind: AssetType,
        options: &MinifyOptions,
    ) -> Result<String, MinifyError> {
        let backend = self.get(kind).ok_or(MinifyError::MissingBackend(kind))?;
        backend.minify(text, options)
    }

    fn slot_mut(&mut self, kind: AssetType) -> &mut Option<Box<dyn Minifier>> {
        match kind {
            AssetType::Css => &mut self.css,
            AssetType::Js => &mut self.js,
        }
    }
}

impl fmt::Debug for Backends {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backends")
            .field("css", &self.css.as_ref().map(|b| b.name()))
            .field("js", &self.js.as_ref().map(|b| b.name()))
            .finish()
    }
}

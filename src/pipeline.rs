//! Batch runner: resolve → classify → map → read → minify → write.
//!
//! Jobs run one at a time in resolution order. The first failure stops the
//! batch; outputs already written stay on disk.
//!
//! # Example
//!
//! ```ignore
//! let mut pipeline = Pipeline::new(Input::sources(["web/a.css", "web/b.js"]));
//! pipeline.set_single_line(true);
//! let report = pipeline.run()?;
//! ```

use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;

use crate::asset::minify::{Backends, CssOptions, JsOptions, MinifyOptions, SpecialVars};
use crate::asset::{
    AssetType, BatchReport, FsGlob, GlobMatcher, Input, Job, JobOutcome, classify, classify_path,
    map_destinations, resolve, write_atomic,
};
use crate::debug;
use crate::error::{BatchError, MinifyError};

/// One minification step over a batch of inputs.
pub struct Pipeline {
    input: Input,
    options: MinifyOptions,
    backends: Backends,
    glob: Box<dyn GlobMatcher>,
    destination: Option<PathBuf>,
    kind: Option<AssetType>,
}

impl Pipeline {
    /// Pipeline over `input` with filesystem globbing and every compiled backend.
    pub fn new(input: Input) -> Self {
        Self {
            input,
            options: MinifyOptions::default(),
            backends: Backends::detect(),
            glob: Box::new(FsGlob),
            destination: None,
            kind: None,
        }
    }

    /// Replace the glob service.
    pub fn with_glob(mut self, glob: impl GlobMatcher + 'static) -> Self {
        self.glob = Box::new(glob);
        self
    }

    /// Replace the backend registry.
    pub fn with_backends(mut self, backends: Backends) -> Self {
        self.backends = backends;
        self
    }

    pub fn backends_mut(&mut self) -> &mut Backends {
        &mut self.backends
    }

    // ------------------------------------------------------------------------
    // Setters (before `run`)
    // ------------------------------------------------------------------------

    /// Shared destination for bare-source and literal-text jobs.
    pub fn set_destination(&mut self, destination: impl Into<PathBuf>) -> &mut Self {
        self.destination = Some(destination.into());
        self
    }

    /// Force the asset type of every job from an extension-like name.
    pub fn set_type(&mut self, ty: &str) -> Result<&mut Self, MinifyError> {
        self.kind = Some(classify(ty)?);
        Ok(self)
    }

    pub fn set_kind(&mut self, kind: AssetType) -> &mut Self {
        self.kind = Some(kind);
        self
    }

    pub fn set_options(&mut self, options: MinifyOptions) -> &mut Self {
        self.options = options;
        self
    }

    pub fn set_js_options(&mut self, js: JsOptions) -> &mut Self {
        self.options.js = js;
        self
    }

    pub fn set_css_options(&mut self, css: CssOptions) -> &mut Self {
        self.options.css = css;
        self
    }

    pub fn set_single_line(&mut self, single_line: bool) -> &mut Self {
        self.options.js.single_line = single_line;
        self
    }

    pub fn set_keep_important_comments(&mut self, keep: bool) -> &mut Self {
        self.options.js.keep_important_comments = keep;
        self
    }

    pub fn set_special_vars(&mut self, special_vars: SpecialVars) -> &mut Self {
        self.options.js.special_vars = special_vars;
        self
    }

    pub fn options(&self) -> &MinifyOptions {
        &self.options
    }

    // ------------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------------

    /// Resolve the input and assign destinations, without touching any file.
    pub fn jobs(&self) -> Result<Vec<Job>, BatchError> {
        let mut jobs = resolve(&self.input, self.glob.as_ref());
        debug!("resolve"; "{} job(s)", jobs.len());
        map_destinations(&mut jobs, self.destination.as_deref(), self.kind)?;
        Ok(jobs)
    }

    /// Minify and write every job, stopping at the first failure.
    pub fn run(&self) -> Result<BatchReport, BatchError> {
        let jobs = self.jobs()?;
        let mut outcomes = Vec::with_capacity(jobs.len());

        for (index, job) in jobs.iter().enumerate() {
            match self.process(job, true) {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => {
                    return Err(BatchError::at(index, job.label(), error).with_completed(outcomes));
                }
            }
        }

        debug!("minify"; "{} job(s) succeeded", outcomes.len());
        Ok(BatchReport { outcomes })
    }

    /// Minify every job without writing anything; outputs joined by newlines.
    pub fn minify_to_string(&self) -> Result<String, BatchError> {
        let jobs = self.jobs()?;
        let mut parts = Vec::with_capacity(jobs.len());

        for (index, job) in jobs.iter().enumerate() {
            let outcome = self
                .process(job, false)
                .map_err(|e| BatchError::at(index, job.label(), e))?;
            parts.push(outcome.output.unwrap_or_default());
        }
        Ok(parts.join("\n"))
    }

    /// Authoritative classification right before minifying.
    ///
    /// A forced type wins; otherwise the source extension decides, never the
    /// destination's.
    fn authoritative_kind(&self, job: &Job) -> Result<AssetType, MinifyError> {
        if let Some(kind) = self.kind {
            return Ok(kind);
        }
        match &job.source {
            Some(source) => classify_path(source),
            None => Err(MinifyError::UnknownType),
        }
    }

    fn process(&self, job: &Job, write: bool) -> Result<JobOutcome, MinifyError> {
        let kind = self.authoritative_kind(job)?;
        debug!("classify"; "{} as {}", job.label(), kind);

        let text = match (&job.text, &job.source) {
            (Some(text), _) => Cow::Borrowed(text.as_str()),
            (None, Some(source)) => {
                let content =
                    fs::read_to_string(source).map_err(|source_err| MinifyError::ReadFailure {
                        path: source.clone(),
                        source: source_err,
                    })?;
                Cow::Owned(content)
            }
            (None, None) => Cow::Borrowed(""),
        };

        let minified = self.backends.minify(&text, kind, &self.options)?;

        let destination = if write { job.destination.clone() } else { None };
        let mut outcome = JobOutcome::new(destination, kind, text.len(), minified.len());

        match &outcome.destination {
            Some(dest) => {
                write_atomic(dest, &minified)?;
                debug!("write"; "{}", dest.display());
            }
            None => outcome.output = Some(minified),
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::MappingEntry;
    use crate::asset::minify::Minifier;
    use crate::asset::temp_path;
    use std::cell::Cell;
    use std::path::Path;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Glob that never matches.
    struct NoGlob;

    impl GlobMatcher for NoGlob {
        fn matches(&self, _pattern: &str) -> Option<Vec<PathBuf>> {
            None
        }
    }

    /// Collapses whitespace and counts calls.
    struct Squash {
        kind: AssetType,
        calls: Rc<Cell<usize>>,
    }

    impl Minifier for Squash {
        fn kind(&self) -> AssetType {
            self.kind
        }
        fn name(&self) -> &'static str {
            "squash"
        }
        fn minify(&self, source: &str, _options: &MinifyOptions) -> Result<String, MinifyError> {
            self.calls.set(self.calls.get() + 1);
            if source.contains("BROKEN") {
                return Err(MinifyError::failure(self.kind, "broken input"));
            }
            Ok(source.split_whitespace().collect())
        }
    }

    fn squash_backends(calls: &Rc<Cell<usize>>) -> Backends {
        let mut backends = Backends::empty();
        for kind in AssetType::ALL {
            backends.register(Box::new(Squash {
                kind,
                calls: Rc::clone(calls),
            }));
        }
        backends
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[cfg(feature = "css")]
    #[test]
    fn test_scenario_text_css_to_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out/style.min.css");
        let source = "body{color:red;  }";

        let mut pipeline = Pipeline::new(Input::FromText(source.into())).with_glob(NoGlob);
        pipeline.set_type("css").unwrap().set_destination(&dest);
        let report = pipeline.run().unwrap();

        assert_eq!(report.count(), 1);
        let outcome = &report.outcomes[0];
        let written = fs::read_to_string(&dest).unwrap();
        assert_eq!(written, "body{color:red}");
        assert_eq!(outcome.size_before, source.len());
        assert_eq!(outcome.size_after, written.len());
        assert!(outcome.size_after <= outcome.size_before);
        assert_eq!(outcome.destination.as_deref(), Some(dest.as_path()));
    }

    #[test]
    fn test_scenario_bare_sources_conventional_names() {
        let dir = TempDir::new().unwrap();
        let web = dir.path().join("web");
        let a = write_file(&web, "a.css", "a {  color: red; }");
        let b = write_file(&web, "b.js", "var x = 1;\n");

        let calls = Rc::new(Cell::new(0));
        let pipeline = Pipeline::new(Input::sources([&a, &b])).with_backends(squash_backends(&calls));
        let report = pipeline.run().unwrap();

        let dests: Vec<_> = report
            .outcomes
            .iter()
            .map(|o| o.destination.clone().unwrap())
            .collect();
        assert_eq!(dests, vec![web.join("a.min.css"), web.join("b.min.js")]);
        assert_eq!(report.outcomes[0].kind, AssetType::Css);
        assert_eq!(report.outcomes[1].kind, AssetType::Js);
        assert_eq!(fs::read_to_string(web.join("b.min.js")).unwrap(), "varx=1;");
        assert_eq!(calls.get(), 2);
    }

    #[cfg(feature = "oxc")]
    #[test]
    fn test_scenario_text_js_without_destination() {
        // Relative writes would land in the working directory.
        let cwd = std::env::current_dir().unwrap();
        let listing = || -> Vec<_> {
            let mut names: Vec<_> = fs::read_dir(&cwd)
                .unwrap()
                .map(|entry| entry.unwrap().file_name())
                .collect();
            names.sort();
            names
        };
        let before = listing();

        let mut pipeline =
            Pipeline::new(Input::FromPattern("alert('x')".into())).with_glob(NoGlob);
        pipeline.set_type("js").unwrap();

        let jobs = pipeline.jobs().unwrap();
        assert_eq!(jobs.len(), 1);
        assert!(jobs[0].destination.is_none());

        let report = pipeline.run().unwrap();
        let outcome = &report.outcomes[0];
        assert!(outcome.destination.is_none());
        assert!(outcome.output.as_deref().unwrap().contains("alert("));

        let text = pipeline.minify_to_string().unwrap();
        assert_eq!(Some(text.as_str()), outcome.output.as_deref());
        assert_eq!(listing(), before);
    }

    #[test]
    fn test_scenario_unsupported_type() {
        let mut pipeline = Pipeline::new(Input::FromText("<a/>".into()));
        let err = pipeline.set_type("xml").err().unwrap();
        assert!(matches!(err, MinifyError::UnsupportedType { ref ext } if ext == "xml"));

        // A file-backed job with an unsupported extension fails before any read.
        let dir = TempDir::new().unwrap();
        let css = write_file(dir.path(), "a.css", "a{}");
        let feed = dir.path().join("feed.xml");
        let calls = Rc::new(Cell::new(0));
        let pipeline =
            Pipeline::new(Input::sources([&css, &feed])).with_backends(squash_backends(&calls));

        let err = pipeline.run().unwrap_err();
        assert_eq!(err.job, Some(1));
        assert!(matches!(err.error, MinifyError::UnsupportedType { .. }));
        assert_eq!(calls.get(), 0);
        assert!(!dir.path().join("a.min.css").exists());
    }

    #[test]
    fn test_scenario_missing_css_backend() {
        let dir = TempDir::new().unwrap();
        let source = write_file(dir.path(), "a.css", "a {  color: red; }");
        let before = fs::read_to_string(&source).unwrap();

        let calls = Rc::new(Cell::new(0));
        let mut backends = squash_backends(&calls);
        backends.unregister(AssetType::Css);

        let pipeline = Pipeline::new(Input::sources([&source])).with_backends(backends);
        let err = pipeline.run().unwrap_err();

        assert!(matches!(err.error, MinifyError::MissingBackend(AssetType::Css)));
        assert!(err.completed.is_empty());
        assert!(!dir.path().join("a.min.css").exists());
        assert_eq!(fs::read_to_string(&source).unwrap(), before);
    }

    #[test]
    fn test_failure_stops_batch_and_keeps_prior_outputs() {
        let dir = TempDir::new().unwrap();
        let a = write_file(dir.path(), "a.css", "a { b: c; }");
        let b = write_file(dir.path(), "b.js", "BROKEN");
        let c = write_file(dir.path(), "c.js", "var y;");

        let calls = Rc::new(Cell::new(0));
        let pipeline =
            Pipeline::new(Input::sources([&a, &b, &c])).with_backends(squash_backends(&calls));
        let err = pipeline.run().unwrap_err();

        assert_eq!(err.job, Some(1));
        assert_eq!(err.label, b.display().to_string());
        assert!(matches!(err.error, MinifyError::MinificationFailure { .. }));
        assert_eq!(err.completed.len(), 1);
        assert_eq!(calls.get(), 2);
        assert!(dir.path().join("a.min.css").exists());
        assert!(!dir.path().join("b.min.js").exists());
        assert!(!dir.path().join("c.min.js").exists());
    }

    #[test]
    fn test_read_failure() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.css");
        let calls = Rc::new(Cell::new(0));
        let pipeline =
            Pipeline::new(Input::sources([&missing])).with_backends(squash_backends(&calls));

        let err = pipeline.run().unwrap_err();
        assert!(matches!(err.error, MinifyError::ReadFailure { .. }));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_write_failure() {
        let dir = TempDir::new().unwrap();
        let source = write_file(dir.path(), "a.css", "a{}");
        let blocker = write_file(dir.path(), "blocker", "x");

        let calls = Rc::new(Cell::new(0));
        let pipeline = Pipeline::new(Input::FromMapping(vec![MappingEntry::to(
            &source,
            blocker.join("a.css"),
        )]))
        .with_backends(squash_backends(&calls));

        let err = pipeline.run().unwrap_err();
        assert!(matches!(err.error, MinifyError::WriteFailure { .. }));
        assert!(!temp_path(&blocker.join("a.css")).exists());
    }

    #[test]
    fn test_named_destination_does_not_change_source_type() {
        let dir = TempDir::new().unwrap();
        let source = write_file(dir.path(), "app.js", "var a = 1;");
        let dest = dir.path().join("bundle.css");

        let calls = Rc::new(Cell::new(0));
        let pipeline = Pipeline::new(Input::FromMapping(vec![MappingEntry::to(&source, &dest)]))
            .with_backends(squash_backends(&calls));
        let report = pipeline.run().unwrap();

        assert_eq!(report.outcomes[0].kind, AssetType::Js);
        assert_eq!(report.outcomes[0].destination.as_deref(), Some(dest.as_path()));
    }

    #[test]
    fn test_text_without_type_is_unknown() {
        let calls = Rc::new(Cell::new(0));
        let pipeline = Pipeline::new(Input::FromText("a{}".into()))
            .with_glob(NoGlob)
            .with_backends(squash_backends(&calls));

        let err = pipeline.run().unwrap_err();
        assert_eq!(err.job, Some(0));
        assert!(matches!(err.error, MinifyError::UnknownType));
    }

    #[test]
    fn test_shared_destination_directory_expansion() {
        let dir = TempDir::new().unwrap();
        let src = write_file(dir.path(), "src/site.css", "a { b: c; }");
        let out = dir.path().join("dist");
        fs::create_dir(&out).unwrap();

        let calls = Rc::new(Cell::new(0));
        let mut pipeline =
            Pipeline::new(Input::sources([&src])).with_backends(squash_backends(&calls));
        pipeline.set_destination(&out);
        pipeline.run().unwrap();

        assert_eq!(fs::read_to_string(out.join("site.css")).unwrap(), "a{b:c;}");
    }

    #[test]
    fn test_empty_source_reports_zero_reduction() {
        let dir = TempDir::new().unwrap();
        let src = write_file(dir.path(), "empty.js", "");

        let calls = Rc::new(Cell::new(0));
        let pipeline = Pipeline::new(Input::sources([&src])).with_backends(squash_backends(&calls));
        let report = pipeline.run().unwrap();

        assert_eq!(report.outcomes[0].size_before, 0);
        assert_eq!(report.outcomes[0].reduction_percent, 0.0);
    }

    #[cfg(all(feature = "css", feature = "oxc"))]
    #[test]
    fn test_run_twice_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let css = write_file(dir.path(), "a.css", "a {\n  color: #ff0000;\n}\n");
        let js = write_file(dir.path(), "b.js", "function f(value) { return value * 2; }\nf(2);\n");

        let pipeline = Pipeline::new(Input::sources([&css, &js]));
        pipeline.run().unwrap();
        let first_css = fs::read(dir.path().join("a.min.css")).unwrap();
        let first_js = fs::read(dir.path().join("b.min.js")).unwrap();

        let css_text = String::from_utf8(first_css.clone()).unwrap();
        let js_text = String::from_utf8(first_js.clone()).unwrap();
        assert!(css_text.starts_with("a{color:"));
        assert!(js_text.contains("function f("));
        assert!(js_text.contains("return"));

        pipeline.run().unwrap();
        assert_eq!(fs::read(dir.path().join("a.min.css")).unwrap(), first_css);
        assert_eq!(fs::read(dir.path().join("b.min.js")).unwrap(), first_js);
    }

    #[test]
    fn test_setters_update_options() {
        let mut pipeline = Pipeline::new(Input::FromText(String::new()));
        pipeline
            .set_single_line(false)
            .set_keep_important_comments(false)
            .set_special_vars(SpecialVars::Default)
            .set_css_options(CssOptions { optimize: false });

        let options = pipeline.options();
        assert!(!options.js.single_line);
        assert!(!options.js.keep_important_comments);
        assert_eq!(options.js.special_vars, SpecialVars::Default);
        assert!(!options.css.optimize);
    }
}

//! asset-minify - minify CSS/JS assets as a build step.

use std::path::PathBuf;

use anyhow::{Context, Result};
use asset_minify::{
    BatchReport, Input, JobOutcome, MappingEntry, MinifyConfig, Pipeline, log, logger,
};
use clap::{ColorChoice, Parser};

/// Minify CSS and JavaScript files
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Glob pattern, source paths, or SRC=DEST pairs
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Treat the inputs as literal source text
    #[arg(long)]
    text: bool,

    /// Shared destination file or directory
    #[arg(short, long, value_hint = clap::ValueHint::AnyPath)]
    output: Option<PathBuf>,

    /// Force the asset type (css, js)
    #[arg(short = 't', long = "type")]
    kind: Option<String>,

    /// Config file path (default: minify.toml when present)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    color: ColorChoice,
}

impl Cli {
    fn input(&self) -> Input {
        if self.text {
            return Input::FromText(self.inputs.join(" "));
        }
        if let [single] = self.inputs.as_slice() {
            if !single.contains('=') {
                return Input::FromPattern(single.clone());
            }
        }
        Input::FromMapping(
            self.inputs
                .iter()
                .map(|arg| match arg.split_once('=') {
                    Some((src, dest)) => MappingEntry::to(src, dest),
                    None => MappingEntry::bare(arg),
                })
                .collect(),
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = MinifyConfig::discover(cli.config.as_deref()).context("failed to load config")?;

    let mut pipeline = Pipeline::new(cli.input());
    config.apply(&mut pipeline)?;
    if let Some(kind) = &cli.kind {
        pipeline.set_type(kind)?;
    }
    if let Some(output) = &cli.output {
        pipeline.set_destination(output);
    }

    match pipeline.run() {
        Ok(report) => {
            print_report(&report);
            Ok(())
        }
        Err(err) => {
            err.completed.iter().for_each(print_outcome);
            log!("error"; "{}: {} [{}]", err, err.error, err.error.kind_name());
            Err(err).context("minification aborted")
        }
    }
}

fn print_outcome(outcome: &JobOutcome) {
    match &outcome.output {
        Some(text) => println!("{text}"),
        None => log!(
            "minify";
            "{} {} → {} bytes (-{}%)",
            outcome.destination_display(),
            outcome.size_before,
            outcome.size_after,
            outcome.reduction_percent
        ),
    }
}

fn print_report(report: &BatchReport) {
    report.outcomes.iter().for_each(print_outcome);
    if report.count() > 1 {
        log!(
            "minify";
            "{} files, {} → {} bytes (-{}%)",
            report.count(),
            report.total_before(),
            report.total_after(),
            report.total_reduction_percent()
        );
    }
}

//! Command handlers behind the `coderbot` binary.
//!
//! Handlers write their console report to the given writer and return the
//! typed error untouched; the binary decides how to print it and which exit
//! code to use.

use std::fmt::Display;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tracing::{info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::emitter::Emitter;
use crate::error::{Error, Result};
use crate::fs::{Filesystem, OsFilesystem};
use crate::models::*;
use crate::stories::{StoryWriter, PROGRESS_STEPS};

/// Arguments of `coderbot generate`.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// File containing the stories or requirements
    pub input_file: PathBuf,

    /// Prefix for output files (e.g. `out/login` → `out/login_code.py`)
    pub output_prefix: PathBuf,

    /// Generate code
    #[arg(long)]
    pub code_gen: bool,

    /// Generate unit tests
    #[arg(long)]
    pub unit_test: bool,

    /// Generate documentation
    #[arg(long)]
    pub docs: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `coderbot analyze`.
#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Source directory to scan
    pub source_dir: PathBuf,

    /// Prefix for output files. Defaults to `<out-dir>/coder_output_<millis>`
    pub output_prefix: Option<PathBuf>,

    /// Directory for the default output prefix
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Generate unit tests
    #[arg(long)]
    pub unit_test: bool,

    /// Generate documentation
    #[arg(long)]
    pub docs: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `coderbot stories`.
#[derive(Debug, Clone, Args)]
pub struct StoriesArgs {
    /// Epic requirements text
    pub epic: String,

    /// Output file. Defaults to `<out-dir>/jira_story_<millis>.txt`
    pub output_file: Option<PathBuf>,

    /// Directory for the default output file
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Capabilities and settings shared by every command.
#[derive(Clone)]
pub struct Context {
    pub fs: Arc<dyn Filesystem>,
    pub clock: Arc<dyn Clock>,
    pub config: Config,
}

impl Context {
    pub fn new(fs: Arc<dyn Filesystem>, clock: Arc<dyn Clock>, config: Config) -> Self {
        Self { fs, clock, config }
    }

    /// Real filesystem and wall clock.
    pub fn system(config: Config) -> Self {
        Self::new(Arc::new(OsFilesystem), Arc::new(SystemClock), config)
    }

    pub fn emitter(&self) -> Emitter {
        Emitter::new(self.fs.clone(), self.clock.clone()).with_limits(self.config.limits())
    }

    fn delay(&self) -> Duration {
        Duration::from_millis(self.config.delay_ms)
    }

    async fn simulate_work(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Line-oriented console report.
///
/// In JSON mode stdout carries only the summary document; progress lines are
/// logged instead.
struct Report<'a> {
    out: &'a mut dyn Write,
    json: bool,
}

impl<'a> Report<'a> {
    fn new(out: &'a mut dyn Write, json: bool) -> Self {
        Self { out, json }
    }

    fn line(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.out, "{line}")
            .map_err(|e| Error::Unexpected(format!("Failed to write report: {e}")))
    }

    fn progress(&mut self, line: impl Display) -> Result<()> {
        if self.json {
            info!("{line}");
            Ok(())
        } else {
            self.line(line)
        }
    }

    fn summary(&mut self, summary: &RunSummary) -> Result<()> {
        if self.json {
            let rendered = serde_json::to_string_pretty(summary)
                .map_err(|e| Error::Unexpected(e.to_string()))?;
            self.line(rendered)
        } else {
            self.line("")?;
            let rendered = summary.render();
            self.line(rendered.trim_end())
        }
    }
}

/// Generate artifacts from a story file.
pub async fn generate(ctx: &Context, args: &GenerateArgs, out: &mut dyn Write) -> Result<RunSummary> {
    let mut report = Report::new(out, args.json);
    let request = ArtifactRequest::from_flags(args.code_gen, args.unit_test, args.docs);
    let payload = InputPayload::read_text(ctx.fs.as_ref(), &args.input_file)?;

    report.progress(format_args!("Processing file: {}", args.input_file.display()))?;
    report.progress(format_args!(
        "Selected options: Code Gen: {}, Unit Tests: {}, Docs: {}",
        args.code_gen, args.unit_test, args.docs
    ))?;

    run_emitter(ctx, &payload, &request, &args.output_prefix, &mut report).await
}

/// Generate tests and docs from a source directory.
pub async fn analyze(ctx: &Context, args: &AnalyzeArgs, out: &mut dyn Write) -> Result<RunSummary> {
    let mut report = Report::new(out, args.json);
    let request = ArtifactRequest::from_flags(false, args.unit_test, args.docs);

    report.progress(format_args!("Processing directory: {}", args.source_dir.display()))?;
    report.progress(format_args!(
        "Selected options: Unit Tests: {}, Docs: {}",
        args.unit_test, args.docs
    ))?;

    let payload = InputPayload::discover(ctx.fs.as_ref(), &args.source_dir, &ctx.config.extensions)?;
    if let InputPayload::Directory { files, .. } = &payload {
        report.progress(format_args!("Found {} source files", files.len()))?;
    }

    let prefix = match &args.output_prefix {
        Some(prefix) => prefix.clone(),
        None => default_prefix(ctx.clock.as_ref(), &args.out_dir),
    };
    run_emitter(ctx, &payload, &request, &prefix, &mut report).await
}

/// Write a story breakdown for an epic.
pub async fn stories(ctx: &Context, args: &StoriesArgs, out: &mut dyn Write) -> Result<PathBuf> {
    let mut report = Report::new(out, false);
    let writer = StoryWriter::new(ctx.fs.clone(), ctx.clock.clone());
    let output_file = match &args.output_file {
        Some(path) => path.clone(),
        None => writer.default_output(&args.out_dir),
    };

    report.line(format_args!("Generating stories for epic: {}", args.epic))?;
    report.line(format_args!("Output file: {}", output_file.display()))?;
    report.line("Generating stories...")?;

    let step = ctx.delay() / PROGRESS_STEPS as u32;
    for i in 1..=PROGRESS_STEPS {
        ctx.simulate_work(step).await;
        report.line(format_args!("Step {}/{} completed", i, PROGRESS_STEPS))?;
    }

    writer.write(&args.epic, &output_file)?;

    report.line(format_args!("Successfully generated stories for: {}", args.epic))?;
    report.line(format_args!("Stories saved to: {}", output_file.display()))?;
    Ok(output_file)
}

/// `<out_dir>/coder_output_<unix millis>`.
pub fn default_prefix(clock: &dyn Clock, out_dir: &Path) -> PathBuf {
    out_dir.join(format!("coder_output_{}", clock.unix_millis()))
}

async fn run_emitter(
    ctx: &Context,
    payload: &InputPayload,
    request: &ArtifactRequest,
    prefix: &Path,
    report: &mut Report<'_>,
) -> Result<RunSummary> {
    if request.is_empty() {
        warn!("No artifact kinds selected, nothing will be generated");
    }
    info!(origin = %payload.origin().display(), prefix = %prefix.display(), "starting generation");

    let mut written = Vec::new();
    let outcome = ctx
        .emitter()
        .emit_with(payload, request, prefix, |result| {
            written.push((result.kind, result.path.clone()));
        });

    // Report whatever landed, even when a later write failed.
    for (kind, path) in &written {
        report.progress(format_args!("Wrote {}: {}", kind.as_str(), path.display()))?;
    }
    let results = outcome?;

    ctx.simulate_work(ctx.delay()).await;

    let summary = RunSummary::from(results.as_slice());
    report.summary(&summary)?;
    Ok(summary)
}

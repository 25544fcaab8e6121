use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, ValueEnum};
use fileprops_engine::{
    Assets, NO_SUBJECT_MESSAGE, RENDER_FAILED_MESSAGE, RenderEnv, RenderRequest, assemble,
    message_document,
};
use fileprops_fs::Locator;
use fileprops_protocol::ViewKind;
use fileprops_runtime::{Settings, default_settings_path};
use log::debug;

use crate::commands::CommandResult;
use crate::printer::{
    HumanPrinter, JsonPrinter, OutputFormat, PrinterConfig, RenderPrintContext, RenderPrinter,
    RenderSummary,
};

// A one-shot render has nothing to supersede it.
const GENERATION: u64 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    #[default]
    Command,
    Static,
}

impl From<ViewArg> for ViewKind {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Command => ViewKind::Command,
            ViewArg::Static => ViewKind::Static,
        }
    }
}

#[derive(Debug, Args)]
pub struct OutputOptions {
    /// Output the document and row updates as NDJSON (one JSON object per line)
    #[arg(long)]
    pub json: bool,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress timing statistics
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl OutputOptions {
    /// Create a printer based on the output options.
    pub fn make_printer(&self) -> CommandResult<Box<dyn RenderPrinter>> {
        let format = if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        };

        let cfg = PrinterConfig {
            format,
            show_timing: !self.quiet,
        };

        let out: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            )),
            None => Box::new(io::stdout()),
        };

        Ok(match cfg.format {
            OutputFormat::Human => Box::new(HumanPrinter::to_writer(out, cfg)),
            OutputFormat::Json => Box::new(JsonPrinter::to_writer(out, cfg)),
        })
    }
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// File path or resource URL to describe
    pub locator: String,

    /// Which view to render for
    #[arg(long, value_enum, default_value = "command")]
    pub view: ViewArg,

    /// Settings file (defaults to the user settings)
    #[arg(long = "config", value_name = "FILE")]
    pub settings_path: Option<PathBuf>,

    /// Directory with icons, style sheet and script overriding the bundled ones
    #[arg(long = "assets", value_name = "DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Output formatting options
    #[command(flatten)]
    pub output: OutputOptions,
}

/// How a render ended. A failed render still prints its message document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Rendered,
    NoSubject,
    Failed,
}

impl Outcome {
    fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Rendered | Outcome::NoSubject => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::from(1),
        }
    }
}

pub fn run(args: RenderArgs) -> ExitCode {
    match execute(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[error] {e}");
            ExitCode::from(2)
        }
    }
}

fn execute(args: RenderArgs) -> CommandResult<ExitCode> {
    let env = build_env(&args)?;
    let mut printer = args.output.make_printer()?;

    let outcome = render(&env, &args, printer.as_mut())?;
    Ok(outcome.exit_code())
}

fn build_env(args: &RenderArgs) -> CommandResult<RenderEnv> {
    let settings_path = args
        .settings_path
        .clone()
        .unwrap_or_else(default_settings_path);
    debug!("Reading settings from {}", settings_path.display());

    let assets = match &args.assets_dir {
        Some(dir) => Assets::load(dir)
            .with_context(|| format!("failed to load assets from {}", dir.display()))?,
        None => Assets::bundled(),
    };

    Ok(RenderEnv::new(
        Arc::new(Settings::from_file(settings_path)),
        Arc::new(assets),
    ))
}

/// Assemble once, then wait for every pending row before finishing.
fn render(
    env: &RenderEnv,
    args: &RenderArgs,
    printer: &mut dyn RenderPrinter,
) -> CommandResult<Outcome> {
    let started = Instant::now();
    let view = ViewKind::from(args.view);
    let locator = Locator::parse(&args.locator)
        .with_context(|| format!("invalid locator {:?}", args.locator))?;

    let ctx = RenderPrintContext {
        view: view.as_str(),
        locator: &args.locator,
        generation: GENERATION,
    };

    if view == ViewKind::Static && !locator.is_file() {
        let document = message_document(&env.assets, NO_SUBJECT_MESSAGE);
        printer.document(document.as_str(), &ctx)?;
        printer.finish(&RenderSummary::default(), &ctx)?;
        return Ok(Outcome::NoSubject);
    }

    let request = RenderRequest {
        view,
        locator,
        generation: GENERATION,
    };

    let content = match assemble(env, &request) {
        Ok(content) => content,
        Err(err) => {
            eprintln!("[error] {err}");
            let document = message_document(&env.assets, RENDER_FAILED_MESSAGE);
            printer.document(document.as_str(), &ctx)?;
            printer.finish(&RenderSummary::default(), &ctx)?;
            return Ok(Outcome::Failed);
        }
    };

    printer.document(content.document.as_str(), &ctx)?;

    let mut summary = RenderSummary::default();
    for pending in content.pending {
        let update = pending.resolve();
        printer.row_update(&update, &ctx)?;
        summary.updates += 1;
    }

    summary.elapsed = started.elapsed();
    printer.finish(&summary, &ctx)?;

    Ok(Outcome::Rendered)
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;

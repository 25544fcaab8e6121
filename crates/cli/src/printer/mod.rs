use std::io::{self, Write};
use std::time::Duration;

use fileprops_engine::patch_row;
use fileprops_protocol::RowUpdate;
use log::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The finished document with every pending row filled in.
    #[default]
    Human,
    /// NDJSON (newline-delimited JSON): the document, then one line per row update.
    Json,
}

/// Configuration for printing a render.
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    pub format: OutputFormat,
    /// Whether to report timing on stderr.
    pub show_timing: bool,
}

/// Static context about a render run.
#[derive(Debug)]
pub struct RenderPrintContext<'a> {
    /// View kind the document was rendered for.
    pub view: &'a str,
    pub locator: &'a str,
    pub generation: u64,
}

/// Totals reported once everything has been printed.
#[derive(Debug, Default)]
pub struct RenderSummary {
    pub updates: usize,
    pub elapsed: Duration,
}

/// Trait for printing a rendered document and the row updates that follow it.
pub trait RenderPrinter {
    /// Called once with the initial document.
    fn document(&mut self, document: &str, ctx: &RenderPrintContext) -> io::Result<()>;

    /// Called for each resolved pending value.
    fn row_update(&mut self, update: &RowUpdate, ctx: &RenderPrintContext) -> io::Result<()>;

    /// Called once after all updates arrived.
    fn finish(&mut self, summary: &RenderSummary, ctx: &RenderPrintContext) -> io::Result<()>;
}

fn write_timing<E: Write>(err: &mut E, summary: &RenderSummary, ctx: &RenderPrintContext) -> io::Result<()> {
    writeln!(
        err,
        "[{}] {} rendered in {:.2}ms ({} pending rows)",
        ctx.view,
        ctx.locator,
        summary.elapsed.as_secs_f64() * 1000.0,
        summary.updates,
    )
}

/// Holds the document back until every update has been applied, so the
/// output is what a display surface ends up showing.
pub struct HumanPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
    document: String,
}

impl<W: Write, E: Write> HumanPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self {
            out,
            err,
            cfg,
            document: String::new(),
        }
    }
}

impl<W: Write> HumanPrinter<W, io::Stderr> {
    pub fn to_writer(out: W, cfg: PrinterConfig) -> Self {
        Self::new(out, io::stderr(), cfg)
    }
}

pub struct JsonPrinter<W: Write, E: Write> {
    out: W,
    err: E,
    cfg: PrinterConfig,
}

impl<W: Write, E: Write> JsonPrinter<W, E> {
    pub fn new(out: W, err: E, cfg: PrinterConfig) -> Self {
        Self { out, err, cfg }
    }
}

impl<W: Write> JsonPrinter<W, io::Stderr> {
    pub fn to_writer(out: W, cfg: PrinterConfig) -> Self {
        Self::new(out, io::stderr(), cfg)
    }
}

impl<W: Write, E: Write> RenderPrinter for HumanPrinter<W, E> {
    fn document(&mut self, document: &str, _ctx: &RenderPrintContext) -> io::Result<()> {
        self.document = document.to_owned();
        Ok(())
    }

    fn row_update(&mut self, update: &RowUpdate, _ctx: &RenderPrintContext) -> io::Result<()> {
        match patch_row(&self.document, update) {
            Some(patched) => self.document = patched,
            None => debug!(
                "No row for {} update {}",
                update.row_kind, update.async_token
            ),
        }
        Ok(())
    }

    fn finish(&mut self, summary: &RenderSummary, ctx: &RenderPrintContext) -> io::Result<()> {
        self.out.write_all(self.document.as_bytes())?;
        self.out.flush()?;

        if self.cfg.show_timing {
            write_timing(&mut self.err, summary, ctx)?;
        }
        Ok(())
    }
}

impl<W: Write, E: Write> RenderPrinter for JsonPrinter<W, E> {
    fn document(&mut self, document: &str, ctx: &RenderPrintContext) -> io::Result<()> {
        let obj = serde_json::json!({
            "command": "document",
            "view": ctx.view,
            "locator": ctx.locator,
            "renderGeneration": ctx.generation,
            "html": document,
        });
        writeln!(self.out, "{}", obj)
    }

    fn row_update(&mut self, update: &RowUpdate, _ctx: &RenderPrintContext) -> io::Result<()> {
        let line = serde_json::to_string(update).map_err(io::Error::other)?;
        writeln!(self.out, "{}", line)
    }

    fn finish(&mut self, summary: &RenderSummary, ctx: &RenderPrintContext) -> io::Result<()> {
        self.out.flush()?;

        if self.cfg.show_timing {
            let obj = serde_json::json!({
                "type": "summary",
                "view": ctx.view,
                "locator": ctx.locator,
                "updates": summary.updates,
                "timing_ms": summary.elapsed.as_secs_f64() * 1000.0,
            });
            writeln!(self.err, "{}", obj)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

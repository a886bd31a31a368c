//! Report rendering.

pub mod json;
pub mod terminal;

pub use json::JsonWriter;
pub use terminal::TerminalWriter;

use crate::report::Report;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    #[default]
    Terminal,
}

pub trait ReportWriter {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()>;
}

pub fn create_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    writer: W,
) -> Box<dyn ReportWriter + 'a> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

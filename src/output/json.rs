use super::ReportWriter;
use crate::report::Report;
use std::io::Write;

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> ReportWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, report)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

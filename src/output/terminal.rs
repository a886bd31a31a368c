use super::ReportWriter;
use crate::rating::{RatingRecord, RatingValue};
use crate::report::Report;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use std::io::Write;

const DIVIDER: &str = "═══════════════════════════════════════════";

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_header(&mut self, report: &Report) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", DIVIDER.cyan())?;
        writeln!(self.writer, "{}", "           SITE RATING REPORT".bold().cyan())?;
        writeln!(self.writer, "{}", DIVIDER.cyan())?;
        writeln!(self.writer, "Site:    {}", report.input_url.bold())?;
        writeln!(
            self.writer,
            "Created: {}",
            report.created.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_urls(&mut self, report: &Report) -> anyhow::Result<()> {
        let urls = report
            .checks
            .url_canonicalization()
            .map(Vec::as_slice)
            .unwrap_or_default();
        if urls.is_empty() {
            writeln!(self.writer, "{}", "No URL of this site could be reached.".red())?;
        } else {
            writeln!(self.writer, "Resolved URLs:")?;
            for url in urls {
                writeln!(self.writer, "  {}", url)?;
            }
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_ratings(&mut self, report: &Report) -> anyhow::Result<()> {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Criterion", "Value", "Score"]);
        for (criterion, record) in &report.rating {
            table.add_row(vec![
                Cell::new(criterion),
                Cell::new(format_value(&record.value)),
                Cell::new(format_score(record)).set_alignment(CellAlignment::Right),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }

    fn write_total(&mut self, report: &Report) -> anyhow::Result<()> {
        let max = report.max_score();
        let share = if max > 0.0 { report.score / max } else { 0.0 };
        let total = format!("{:.1} / {:.1}", report.score, max);
        let total = if share >= 0.75 {
            total.green()
        } else if share >= 0.4 {
            total.yellow()
        } else {
            total.red()
        };
        writeln!(self.writer)?;
        writeln!(self.writer, "{} {}", "Total score:".bold(), total.bold())?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        self.write_header(report)?;
        self.write_urls(report)?;
        self.write_ratings(report)?;
        self.write_total(report)?;
        Ok(())
    }
}

fn format_value(value: &RatingValue) -> String {
    match value {
        RatingValue::Bool(true) => "yes".to_string(),
        RatingValue::Bool(false) => "no".to_string(),
        RatingValue::Number(n) => n.to_string(),
    }
}

fn format_score(record: &RatingRecord) -> String {
    format!("{:.1} / {:.1}", record.score, record.max_score)
}

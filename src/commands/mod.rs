//! CLI command implementations.
//!
//! - **dryrun**: check and rate one URL, print the report
//! - **spider**: run one job payload, as a job consumer would
//! - **batch**: run a JSON Lines file of jobs in parallel, one report file each
//! - **init**: write a default `.siterate.toml`
//!
//! Commands take the loaded configuration and the collaborators from the
//! caller, so tests can run them against an in-memory web.

pub mod batch;
pub mod dryrun;
pub mod init;
pub mod spider;

pub use batch::{report_file_name, report_path, run_batch, BatchConfig, BatchSummary};
pub use dryrun::{dryrun, DryrunConfig};
pub use init::init_config;
pub use spider::{parse_job, run_job, spider};

use crate::output::{create_writer, OutputFormat};
use crate::report::Report;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Render `report` into `output`, or to stdout when no file is given.
pub(crate) fn write_report(
    report: &Report,
    format: OutputFormat,
    output: Option<&Path>,
) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            create_writer(format, &mut writer).write_report(report)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            create_writer(format, &mut handle).write_report(report)?;
        }
    }
    Ok(())
}

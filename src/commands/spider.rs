use super::write_report;
use crate::collaborators::Collaborators;
use crate::config::SiteRateConfig;
use crate::output::OutputFormat;
use crate::report::{check_and_rate_site, Job, Report};
use anyhow::{Context, Result};
use log::error;
use std::path::Path;

pub fn parse_job(payload: &str) -> Result<Job> {
    let job: Job = serde_json::from_str(payload).context("Invalid job payload")?;
    Ok(job)
}

/// Evaluate one job. A run that aborts still produces a report, rated on no
/// evidence, so every job taken on ends up with one.
pub fn run_job(job: &Job, config: &SiteRateConfig, services: &Collaborators) -> Report {
    check_and_rate_site(job, config, services).unwrap_or_else(|e| {
        error!("Evaluating {} failed: {}", job.url, e);
        Report::without_evidence(job, config)
    })
}

pub fn spider(
    payload: &str,
    output: Option<&Path>,
    config: &SiteRateConfig,
    services: &Collaborators,
) -> Result<()> {
    let job = parse_job(payload)?;
    let report = run_job(&job, config, services);
    write_report(&report, OutputFormat::Json, output)
}

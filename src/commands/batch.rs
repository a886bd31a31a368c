//! Evaluate many sites in parallel.
//!
//! Every job gets its own pipeline run with its own working set and result
//! store, so runs share nothing but the read-only configuration and the
//! collaborators. Reports land in `<output>/<sha256 of input URL>.json`; a
//! later run for the same URL overwrites the earlier report as a whole.

use super::spider::run_job;
use super::write_report;
use crate::collaborators::Collaborators;
use crate::config::SiteRateConfig;
use crate::observability::{increment_processed, set_progress};
use crate::output::OutputFormat;
use crate::report::Job;
use anyhow::{Context, Result};
use log::{info, warn};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub jobs_file: PathBuf,
    pub output_dir: PathBuf,
    /// Worker threads, 0 for one per CPU
    pub jobs: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub written: Vec<PathBuf>,
    /// Line numbers (1-based) that did not hold a job
    pub invalid_lines: Vec<usize>,
    pub total_score: f64,
}

pub fn report_file_name(input_url: &str) -> String {
    format!("{:x}.json", Sha256::digest(input_url.as_bytes()))
}

fn get_worker_count(jobs: usize) -> usize {
    if jobs == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        jobs
    }
}

/// Parse a JSON Lines job file. Blank lines are ignored.
fn read_jobs(contents: &str) -> (Vec<Job>, Vec<usize>) {
    let mut jobs = Vec::new();
    let mut invalid = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Job>(line) {
            Ok(job) => jobs.push(job),
            Err(e) => {
                warn!("Skipping line {}: {}", index + 1, e);
                invalid.push(index + 1);
            }
        }
    }
    (jobs, invalid)
}

pub fn run_batch(
    batch: &BatchConfig,
    config: &SiteRateConfig,
    services: &Collaborators,
) -> Result<BatchSummary> {
    let contents = fs::read_to_string(&batch.jobs_file)
        .with_context(|| format!("Failed to read {}", batch.jobs_file.display()))?;
    let (jobs, invalid_lines) = read_jobs(&contents);
    fs::create_dir_all(&batch.output_dir)
        .with_context(|| format!("Failed to create {}", batch.output_dir.display()))?;

    let workers = get_worker_count(batch.jobs);
    info!("Evaluating {} sites on {} workers", jobs.len(), workers);
    set_progress(0, jobs.len());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Failed to build worker pool")?;

    let outcomes: Vec<Result<(PathBuf, f64)>> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                let report = run_job(job, config, services);
                let path = report_path(&batch.output_dir, &report.input_url);
                write_report(&report, OutputFormat::Json, Some(&path))?;
                increment_processed();
                Ok((path, report.score))
            })
            .collect()
    });

    let mut summary = BatchSummary {
        invalid_lines,
        ..Default::default()
    };
    for outcome in outcomes {
        let (path, score) = outcome?;
        summary.written.push(path);
        summary.total_score += score;
    }
    info!(
        "Wrote {} reports to {}",
        summary.written.len(),
        batch.output_dir.display()
    );
    Ok(summary)
}

/// Report path a batch run writes for `input_url`.
pub fn report_path(output_dir: &Path, input_url: &str) -> PathBuf {
    output_dir.join(report_file_name(input_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::FakeWeb;
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_report_file_name_is_sha256_of_url() {
        assert_eq!(
            report_file_name("https://example.com/"),
            "0f115db062b7c0dd030b16878c99dea5c354b49dc37b38eb8846179c7783e9d7.json"
        );
        assert_ne!(
            report_file_name("https://example.com/"),
            report_file_name("http://example.com/")
        );
    }

    #[test]
    fn test_read_jobs_skips_blank_and_reports_bad_lines() {
        let (jobs, invalid) = read_jobs(indoc! {r#"
            {"url": "https://a.example/"}

            not json
            {"url": "https://b.example/", "meta": {"state": "Hessen"}}
        "#});
        assert_eq!(jobs.len(), 2);
        assert_eq!(invalid, vec![3]);
        assert_eq!(jobs[1].meta.state.as_deref(), Some("Hessen"));
    }

    #[test]
    fn test_every_job_gets_a_report() {
        let dir = TempDir::new().unwrap();
        let jobs_file = dir.path().join("jobs.jsonl");
        fs::write(
            &jobs_file,
            indoc! {r#"
                {"url": "https://example.com/"}
                {"url": "https://gone.example/"}
                {"url": "https://example.org/"}
            "#},
        )
        .unwrap();
        let services = FakeWeb::new()
            .site("example.com", "192.0.2.10", "<html><title>A</title></html>")
            .site("example.org", "192.0.2.20", "<html><title>B</title></html>")
            .collaborators();
        let output_dir = dir.path().join("reports");

        let summary = run_batch(
            &BatchConfig {
                jobs_file,
                output_dir: output_dir.clone(),
                jobs: 2,
            },
            &SiteRateConfig::default(),
            &services,
        )
        .unwrap();

        assert_eq!(summary.written.len(), 3);
        assert!(summary.invalid_lines.is_empty());
        for url in ["https://example.com/", "https://gone.example/", "https://example.org/"] {
            assert!(report_path(&output_dir, url).exists(), "missing report for {url}");
        }
        assert!(summary.total_score > 0.0);
    }

    #[test]
    fn test_report_is_filed_under_the_job_url() {
        let dir = TempDir::new().unwrap();
        let jobs_file = dir.path().join("jobs.jsonl");
        fs::write(&jobs_file, "{\"url\": \"https://example.com\"}\n").unwrap();
        let services = FakeWeb::new()
            .site("example.com", "192.0.2.10", "<html><title>A</title></html>")
            .collaborators();
        let output_dir = dir.path().join("reports");

        let summary = run_batch(
            &BatchConfig {
                jobs_file,
                output_dir: output_dir.clone(),
                jobs: 1,
            },
            &SiteRateConfig::default(),
            &services,
        )
        .unwrap();

        assert_eq!(
            summary.written,
            vec![report_path(&output_dir, "https://example.com")]
        );
        assert!(!report_path(&output_dir, "https://example.com/").exists());
    }

    #[test]
    fn test_missing_jobs_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = run_batch(
            &BatchConfig {
                jobs_file: dir.path().join("absent.jsonl"),
                output_dir: dir.path().join("reports"),
                jobs: 1,
            },
            &SiteRateConfig::default(),
            &FakeWeb::new().collaborators(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("absent.jsonl"));
    }
}

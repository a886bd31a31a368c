use super::write_report;
use crate::collaborators::Collaborators;
use crate::config::SiteRateConfig;
use crate::output::OutputFormat;
use crate::report::{check_and_rate_site, Job};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DryrunConfig {
    pub url: String,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

/// Evaluate a single URL without any job metadata. Pipeline failures are
/// returned to the caller instead of being papered over.
pub fn dryrun(
    dryrun_config: DryrunConfig,
    config: &SiteRateConfig,
    services: &Collaborators,
) -> Result<()> {
    let job = Job::new(dryrun_config.url);
    let report = check_and_rate_site(&job, config, services)
        .with_context(|| format!("Failed to evaluate {}", job.url))?;
    write_report(&report, dryrun_config.format, dryrun_config.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::FakeWeb;
    use tempfile::TempDir;

    #[test]
    fn test_writes_json_report_to_file() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out").join("report.json");
        let services = FakeWeb::new()
            .site("example.com", "192.0.2.10", "<html><head><title>Hallo</title></head></html>")
            .collaborators();

        dryrun(
            DryrunConfig {
                url: "https://example.com/".to_string(),
                format: OutputFormat::Json,
                output: Some(output.clone()),
            },
            &SiteRateConfig::default(),
            &services,
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(json["input_url"], "https://example.com/");
        assert_eq!(json["rating"]["SITE_REACHABLE"]["value"], true);
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let err = dryrun(
            DryrunConfig {
                url: "ftp://example.com/".to_string(),
                format: OutputFormat::Json,
                output: None,
            },
            &SiteRateConfig::default(),
            &FakeWeb::new().collaborators(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("ftp://example.com/"));
    }
}

//! Jobs in, reports out.
//!
//! A [`Job`] names one site plus the metadata the job producer attached to
//! it. [`check_and_rate_site`] runs the default pipeline against it, rates
//! the result store and bundles both into a [`Report`].

use crate::checks::default_pipeline;
use crate::collaborators::Collaborators;
use crate::config::SiteRateConfig;
use crate::errors::PipelineError;
use crate::observability::{set_phase, Phase};
use crate::rating::{total_score, RatingEngine, Ratings};
use crate::results::ResultStore;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

/// Descriptive metadata carried through to the report untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobMeta {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub site_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub url: String,
    #[serde(default)]
    pub meta: JobMeta,
}

impl Job {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            meta: JobMeta::default(),
        }
    }
}

/// Everything known about one site after a run.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input_url: String,
    pub meta: JobMeta,
    pub checks: ResultStore,
    pub rating: Ratings,
    pub score: f64,
    pub created: DateTime<Utc>,
}

impl Report {
    /// A report rated on no evidence at all. Every criterion takes its
    /// default, so the site still gets a (low) score.
    pub fn without_evidence(job: &Job, config: &SiteRateConfig) -> Self {
        let checks = ResultStore::new();
        let rating = RatingEngine::default().rate(&checks, &config.rating);
        let score = total_score(&rating);
        Self {
            input_url: job.url.clone(),
            meta: job.meta.clone(),
            checks,
            rating,
            score,
            created: Utc::now(),
        }
    }

    pub fn max_score(&self) -> f64 {
        self.rating.values().map(|r| r.max_score).sum()
    }
}

/// Run every check against the job's URL and rate the outcome.
///
/// The report keeps `job.url` as given, so a failed run for the same job is
/// filed under the same key. Page bodies are dropped from the stored checks
/// once rating is done.
pub fn check_and_rate_site(
    job: &Job,
    config: &SiteRateConfig,
    services: &Collaborators,
) -> Result<Report, PipelineError> {
    let run = default_pipeline().run(&job.url, config, services)?;
    let rating = RatingEngine::default().rate(&run.results, &config.rating);
    let score = total_score(&rating);

    let _phase = set_phase(Phase::Reporting);
    let mut checks = run.results;
    checks.strip_page_bodies();
    info!(
        "Rated {}: {:.1} points from {} URLs",
        run.input_url,
        score,
        run.urls.len()
    );

    Ok(Report {
        input_url: job.url.clone(),
        meta: job.meta.clone(),
        checks,
        rating,
        score,
        created: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::RatingValue;
    use crate::testkit::FakeWeb;

    fn rating_value(report: &Report, criterion: &str) -> RatingValue {
        report.rating[criterion].value
    }

    #[test]
    fn test_job_deserializes_original_payload() {
        let job: Job = serde_json::from_str(
            r#"{"url": "https://example.com/", "meta": {"type": "KREISVERBAND", "level": "DE:KREISVERBAND", "state": "Bayern", "district": "Ebersberg", "city": null}}"#,
        )
        .unwrap();
        assert_eq!(job.url, "https://example.com/");
        assert_eq!(job.meta.site_type.as_deref(), Some("KREISVERBAND"));
        assert_eq!(job.meta.district.as_deref(), Some("Ebersberg"));
        assert_eq!(job.meta.city, None);
    }

    #[test]
    fn test_job_without_meta() {
        let job: Job = serde_json::from_str(r#"{"url": "http://example.com/"}"#).unwrap();
        assert_eq!(job.meta, JobMeta::default());
    }

    #[test]
    fn test_reachable_site_gets_rated() {
        let services = FakeWeb::new()
            .site("example.com", "192.0.2.10", "<html><head><title>Start</title></head></html>")
            .collaborators();
        let report = check_and_rate_site(
            &Job::new("https://example.com/"),
            &SiteRateConfig::default(),
            &services,
        )
        .unwrap();

        assert_eq!(report.input_url, "https://example.com/");
        assert_eq!(rating_value(&report, "SITE_REACHABLE"), RatingValue::Bool(true));
        assert_eq!(rating_value(&report, "DNS_RESOLVABLE_IPV4"), RatingValue::Bool(true));
        assert!(report.score > 0.0);
        assert_eq!(report.rating.len(), RatingEngine::default().criteria().len());
    }

    #[test]
    fn test_page_bodies_are_not_reported() {
        let services = FakeWeb::new()
            .site("example.com", "192.0.2.10", "<html><body>Hallo</body></html>")
            .collaborators();
        let report = check_and_rate_site(
            &Job::new("https://example.com/"),
            &SiteRateConfig::default(),
            &services,
        )
        .unwrap();

        let pages = report.checks.page_content().unwrap();
        assert!(!pages.is_empty());
        assert!(pages.values().all(|page| page.content.is_none()));
    }

    #[test]
    fn test_unreachable_site_still_yields_report() {
        let services = FakeWeb::new().collaborators();
        let report = check_and_rate_site(
            &Job::new("https://gone.example/"),
            &SiteRateConfig::default(),
            &services,
        )
        .unwrap();

        assert_eq!(report.score, 0.0);
        assert!(report
            .rating
            .values()
            .all(|record| record.score == 0.0));
        assert!(report.max_score() > 0.0);
    }

    #[test]
    fn test_input_url_is_the_job_url_whether_or_not_the_run_succeeds() {
        let services = FakeWeb::new()
            .site("example.com", "192.0.2.10", "<html><title>Start</title></html>")
            .collaborators();
        let job = Job::new("https://example.com");
        let config = SiteRateConfig::default();

        let rated = check_and_rate_site(&job, &config, &services).unwrap();
        let fallback = Report::without_evidence(&job, &config);

        assert_eq!(rated.input_url, "https://example.com");
        assert_eq!(rated.input_url, fallback.input_url);
        assert!(rated.score > 0.0);
    }

    #[test]
    fn test_invalid_url_is_fatal() {
        let services = FakeWeb::new().collaborators();
        let err = check_and_rate_site(
            &Job::new("not a url"),
            &SiteRateConfig::default(),
            &services,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidUrl { .. }));
    }

    #[test]
    fn test_report_without_evidence_scores_zero() {
        let report = Report::without_evidence(
            &Job::new("https://example.com/"),
            &SiteRateConfig::default(),
        );
        assert_eq!(report.score, 0.0);
        assert!(report.checks.is_empty());
        assert_eq!(report.rating.len(), 18);
    }

    #[test]
    fn test_report_json_shape() {
        let report = Report::without_evidence(
            &Job::new("https://example.com/"),
            &SiteRateConfig::default(),
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["input_url"], "https://example.com/");
        assert_eq!(json["rating"]["HTTPS"]["max_score"], 2.0);
        assert!(json["created"].is_string());
        assert!(json["checks"].is_object());
    }
}

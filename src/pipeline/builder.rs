//! Pipeline builder and driver.
//!
//! ```rust,ignore
//! let pipeline = PipelineBuilder::new()
//!     .check(DomainVariations)
//!     .check(HttpAndHttps)
//!     .when(config.probe_dns, |p| p.check(DnsResolution))
//!     .check(UrlCanonicalization)
//!     .build();
//! let run = pipeline.run("https://example.com/", &config, &services)?;
//! ```

use super::check::{Check, CheckContext, CheckKind};
use crate::collaborators::Collaborators;
use crate::config::SiteRateConfig;
use crate::errors::PipelineError;
use crate::observability::{set_current_check, set_current_site, set_phase, Phase};
use crate::results::{CheckName, ResultStore};
use crate::working_set::WorkingSet;
use log::{debug, info};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use url::Url;

/// Builder for an ordered list of checks.
pub struct PipelineBuilder {
    checks: Vec<Box<dyn Check>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Append a check. Order of calls is execution order.
    pub fn check<C>(mut self, check: C) -> Self
    where
        C: Check + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Add checks conditionally.
    pub fn when<F>(self, condition: bool, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        if condition {
            f(self)
        } else {
            self
        }
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            checks: self.checks,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A statically ordered list of checks, reusable across sites.
pub struct Pipeline {
    checks: Vec<Box<dyn Check>>,
}

/// A check that did not run because a dependency was missing or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedCheck {
    pub name: CheckName,
    pub unmet: Vec<CheckName>,
}

#[derive(Debug, Clone)]
pub struct CheckTiming {
    pub name: CheckName,
    pub duration: Duration,
}

impl CheckTiming {
    pub fn format(&self) -> String {
        format!("{}: {:.2}s", self.name, self.duration.as_secs_f64())
    }
}

/// State left behind by one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub input_url: String,
    pub urls: WorkingSet,
    pub results: ResultStore,
    pub timings: Vec<CheckTiming>,
    pub skipped: Vec<SkippedCheck>,
}

impl Pipeline {
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    pub fn check_names(&self) -> Vec<CheckName> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn kinds(&self) -> Vec<(CheckName, CheckKind)> {
        self.checks.iter().map(|c| (c.name(), c.kind())).collect()
    }

    /// Every dependency must be produced by an earlier check, names must be
    /// unique, and no expander may follow a pruner.
    pub fn validate_order(&self) -> Result<(), PipelineError> {
        let mut seen: HashSet<CheckName> = HashSet::new();
        let mut pruned = false;
        for check in &self.checks {
            let name = check.name();
            if let Some(missing) = check
                .depends_on_results()
                .iter()
                .find(|dep| !seen.contains(*dep))
            {
                return Err(PipelineError::Misconfigured(format!(
                    "{} depends on {}, which does not run before it",
                    name, missing
                )));
            }
            match check.kind() {
                CheckKind::Pruner => pruned = true,
                CheckKind::Expander if pruned => {
                    return Err(PipelineError::Misconfigured(format!(
                        "expander {} runs after a pruner",
                        name
                    )));
                }
                _ => {}
            }
            if !seen.insert(name) {
                return Err(PipelineError::Misconfigured(format!(
                    "{} appears twice",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Evaluate one site: seed the working set with the input URL, then run
    /// every check in order.
    pub fn run(
        &self,
        input_url: &str,
        config: &SiteRateConfig,
        services: &Collaborators,
    ) -> Result<PipelineRun, PipelineError> {
        let seed = normalize_input_url(input_url)?;
        let span = tracing::info_span!("pipeline", site = %seed);
        let _enter = span.enter();
        let _site = set_current_site(seed.clone());
        let _phase = set_phase(Phase::Checking);

        info!("Evaluating {} with {} checks", seed, self.checks.len());
        let mut urls = WorkingSet::seeded(seed.clone());
        let mut results = ResultStore::new();
        let mut timings = Vec::with_capacity(self.checks.len());
        let mut skipped = Vec::new();

        for check in &self.checks {
            let name = check.name();
            let unmet: Vec<CheckName> = check
                .depends_on_results()
                .iter()
                .copied()
                .filter(|dep| !results.is_satisfied(*dep))
                .collect();
            if !unmet.is_empty() {
                info!(
                    "Skipping {}: no results from {}",
                    name,
                    unmet
                        .iter()
                        .map(CheckName::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                skipped.push(SkippedCheck { name, unmet });
                continue;
            }

            let _check = set_current_check(name);
            let check_span = tracing::info_span!("check", name = %name, kind = %check.kind());
            let _check_enter = check_span.enter();
            let start = Instant::now();

            let output = {
                let mut ctx = CheckContext {
                    urls: &mut urls,
                    results: &results,
                    config,
                    services,
                };
                check.run(&mut ctx)?
            };
            let replacement = check.post_hook(&output);
            results.insert(name, output)?;
            if let Some(replacement) = replacement {
                results.replace(name, replacement);
            }

            let duration = start.elapsed();
            debug!(
                "{} finished in {:.2}s, {} URLs remain",
                name,
                duration.as_secs_f64(),
                urls.len()
            );
            timings.push(CheckTiming { name, duration });
        }

        Ok(PipelineRun {
            input_url: seed,
            urls,
            results,
            timings,
            skipped,
        })
    }
}

/// Absolute `http`/`https` URL with a host, in normalized form.
pub fn normalize_input_url(input: &str) -> Result<String, PipelineError> {
    let url = Url::parse(input.trim()).map_err(|e| PipelineError::invalid_url(input, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PipelineError::invalid_url(
            input,
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(PipelineError::invalid_url(input, "missing host"));
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::CheckOutput;
    use crate::testkit::FakeWeb;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct AddUrl(CheckName, &'static str);

    impl Check for AddUrl {
        fn name(&self) -> CheckName {
            self.0
        }
        fn kind(&self) -> CheckKind {
            CheckKind::Expander
        }
        fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
            ctx.urls.add(self.1);
            Ok(CheckOutput::Empty)
        }
    }

    struct ListUrls;

    impl Check for ListUrls {
        fn name(&self) -> CheckName {
            CheckName::UrlCanonicalization
        }
        fn kind(&self) -> CheckKind {
            CheckKind::Observer
        }
        fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
            Ok(CheckOutput::UrlCanonicalization(ctx.urls.snapshot()))
        }
        fn post_hook(&self, output: &CheckOutput) -> Option<CheckOutput> {
            match output {
                CheckOutput::UrlCanonicalization(urls) => Some(CheckOutput::UrlCanonicalization(
                    urls.iter().rev().cloned().collect(),
                )),
                _ => None,
            }
        }
    }

    struct NeedsPageContent(Arc<AtomicUsize>);

    impl Check for NeedsPageContent {
        fn name(&self) -> CheckName {
            CheckName::Charset
        }
        fn kind(&self) -> CheckKind {
            CheckKind::Observer
        }
        fn depends_on_results(&self) -> &'static [CheckName] {
            &[CheckName::PageContent]
        }
        fn run(&self, _ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(CheckOutput::Empty)
        }
    }

    struct Fails;

    impl Check for Fails {
        fn name(&self) -> CheckName {
            CheckName::Certificate
        }
        fn kind(&self) -> CheckKind {
            CheckKind::Observer
        }
        fn run(&self, _ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
            Err(PipelineError::missing_result(
                CheckName::Certificate,
                CheckName::UrlReachability,
                "https://example.com/",
            ))
        }
    }

    fn run(pipeline: &Pipeline, url: &str) -> Result<PipelineRun, PipelineError> {
        pipeline.run(url, &SiteRateConfig::default(), &FakeWeb::new().collaborators())
    }

    #[test]
    fn test_runs_checks_in_order_and_applies_post_hook() {
        let pipeline = PipelineBuilder::new()
            .check(AddUrl(CheckName::DomainVariations, "https://b.example/"))
            .check(ListUrls)
            .build();

        let run = run(&pipeline, "https://a.example").unwrap();
        assert_eq!(run.input_url, "https://a.example/");
        assert_eq!(
            run.results.url_canonicalization().unwrap(),
            &vec!["https://b.example/".to_string(), "https://a.example/".to_string()]
        );
        assert_eq!(run.timings.len(), 2);
        assert_eq!(run.timings[0].name, CheckName::DomainVariations);
    }

    #[test]
    fn test_skips_check_with_unmet_dependency() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = PipelineBuilder::new()
            .check(NeedsPageContent(calls.clone()))
            .build();

        let run = run(&pipeline, "https://example.com/").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!run.results.contains(CheckName::Charset));
        assert_eq!(
            run.skipped,
            vec![SkippedCheck {
                name: CheckName::Charset,
                unmet: vec![CheckName::PageContent]
            }]
        );
    }

    #[test]
    fn test_check_error_aborts_run() {
        let pipeline = PipelineBuilder::new().check(Fails).check(ListUrls).build();
        let err = run(&pipeline, "https://example.com/").unwrap_err();
        assert!(matches!(err, PipelineError::MissingResult { .. }));
    }

    #[test]
    fn test_invalid_input_url_is_rejected() {
        let pipeline = PipelineBuilder::new().build();
        for bad in ["not a url", "ftp://example.com/", "mailto:someone@example.com"] {
            assert!(
                matches!(run(&pipeline, bad), Err(PipelineError::InvalidUrl { .. })),
                "{} accepted",
                bad
            );
        }
    }

    #[test]
    fn test_validate_order_rejects_late_dependency() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = PipelineBuilder::new()
            .check(NeedsPageContent(calls))
            .build();
        assert!(matches!(
            pipeline.validate_order(),
            Err(PipelineError::Misconfigured(_))
        ));
    }

    #[test]
    fn test_validate_order_rejects_duplicates() {
        let pipeline = PipelineBuilder::new().check(ListUrls).check(ListUrls).build();
        assert!(pipeline.validate_order().is_err());
    }

    #[test]
    fn test_when_adds_checks_conditionally() {
        let with = PipelineBuilder::new().when(true, |p| p.check(ListUrls)).build();
        let without = PipelineBuilder::new().when(false, |p| p.check(ListUrls)).build();
        assert_eq!(with.check_count(), 1);
        assert_eq!(without.check_count(), 0);
    }
}

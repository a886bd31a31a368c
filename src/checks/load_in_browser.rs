use crate::collaborators::browser::network_totals;
use crate::collaborators::BrowserMeasurement;
use crate::config::retry_with;
use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{BrowserRecord, CheckName, CheckOutput};
use log::warn;
use std::collections::BTreeMap;

/// Loads every URL in the browser at each configured viewport size.
pub struct LoadInBrowser;

impl Check for LoadInBrowser {
    fn name(&self) -> CheckName {
        CheckName::LoadInBrowser
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Observer
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let browser = ctx.services.browser.as_ref();
        let viewports = &ctx.config.viewport_sizes;
        let mut records = BTreeMap::new();

        for url in ctx.urls.list() {
            let outcome = retry_with(&ctx.config.browser_retry, |_| {
                browser.load_and_measure(url, viewports)
            });
            let record = match outcome {
                Ok(measurement) => browser_record(measurement),
                Err(exception) => {
                    warn!("Loading {} in the browser failed: {}", url, exception);
                    BrowserRecord {
                        exception: Some(exception),
                        ..Default::default()
                    }
                }
            };
            records.insert(url.to_string(), record);
        }

        Ok(CheckOutput::LoadInBrowser(records))
    }

    /// Replaces the raw performance log with its totals.
    fn post_hook(&self, output: &CheckOutput) -> Option<CheckOutput> {
        let CheckOutput::LoadInBrowser(records) = output else {
            return None;
        };
        let summarised = records
            .iter()
            .map(|(url, record)| {
                let mut record = record.clone();
                if let Some(events) = record.performance_log.take() {
                    let (payload, requests) = network_totals(&events);
                    record.network_payload = Some(payload);
                    record.network_requests = Some(requests);
                }
                (url.clone(), record)
            })
            .collect();
        Some(CheckOutput::LoadInBrowser(summarised))
    }
}

fn browser_record(measurement: BrowserMeasurement) -> BrowserRecord {
    let min_document_width = measurement.sizes.iter().map(|s| s.document_width).min();
    let mut fonts: Vec<String> = measurement
        .font_families
        .iter()
        .map(|font| font.to_lowercase())
        .collect();
    fonts.sort();
    fonts.dedup();

    BrowserRecord {
        sizes: measurement.sizes,
        min_document_width,
        logs: measurement.logs,
        font_families: Some(fonts),
        cookies: Some(measurement.cookies),
        performance_log: Some(measurement.performance_log),
        network_payload: None,
        network_requests: None,
        exception: None,
    }
}

use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput, PageContentRecord};
use log::warn;
use std::collections::BTreeMap;

/// Downloads every URL. URLs that fail to download are removed.
pub struct PageContent;

impl Check for PageContent {
    fn name(&self) -> CheckName {
        CheckName::PageContent
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Pruner
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let timeouts = ctx.config.timeouts();
        let mut records = BTreeMap::new();

        for url in ctx.urls.snapshot() {
            let response = ctx.services.fetcher.fetch(&url, ctx.user_agent(), timeouts);
            let record = match response.exception {
                Some(exception) => {
                    warn!("Downloading {} failed: {}", url, exception);
                    ctx.urls.remove(&url);
                    PageContentRecord {
                        url: url.clone(),
                        exception: Some(exception),
                        ..Default::default()
                    }
                }
                None => {
                    let content_type = response
                        .headers
                        .get("content-type")
                        .map(|value| media_type(value));
                    PageContentRecord {
                        url: response.final_url,
                        content_length: response.body.as_ref().map(|b| b.chars().count()),
                        content: response.body,
                        content_type,
                        status_code: response.status,
                        response_headers: Some(response.headers),
                        duration: response.duration,
                        exception: None,
                    }
                }
            };
            records.insert(url, record);
        }

        Ok(CheckOutput::PageContent(records))
    }
}

/// `text/html; charset=utf-8` -> `text/html`
fn media_type(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

use crate::collaborators::FeedDocument;
use crate::errors::{CheckException, ExceptionKind, PipelineError};
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput, FeedRecord};
use log::debug;
use std::collections::BTreeMap;

/// Loads every feed linked from any page head and summarises its entries.
/// Results are keyed by feed URL, since pages usually share their feeds.
pub struct LoadFeeds;

impl Check for LoadFeeds {
    fn name(&self) -> CheckName {
        CheckName::LoadFeeds
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Observer
    }

    fn depends_on_results(&self) -> &'static [CheckName] {
        &[CheckName::HtmlHead]
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let Some(heads) = ctx.results.html_head() else {
            return Ok(CheckOutput::LoadFeeds(BTreeMap::new()));
        };

        let mut records = BTreeMap::new();
        for url in ctx.urls.list() {
            let feeds = heads
                .get(url)
                .and_then(|head| head.link_rss_atom.as_deref())
                .unwrap_or_default();
            for feed_url in feeds {
                if records.contains_key(feed_url) {
                    continue;
                }
                debug!("Loading feed {}", feed_url);
                let document = ctx.services.feeds.parse_feed(feed_url, ctx.user_agent());
                records.insert(feed_url.clone(), analyse_feed(document));
            }
        }
        Ok(CheckOutput::LoadFeeds(records))
    }
}

fn analyse_feed(document: FeedDocument) -> FeedRecord {
    let exception = document.exception.or_else(|| match document.status {
        Some(200 | 301 | 302) => None,
        status => Some(CheckException::new(
            ExceptionKind::Other,
            format!(
                "Server responded with status {}",
                status.map_or_else(|| "none".to_string(), |s| s.to_string())
            ),
        )),
    });

    let dates: Vec<_> = document
        .entries
        .iter()
        .filter_map(|entry| entry.published)
        .collect();
    let first_entry = dates.iter().min().copied();
    let latest_entry = dates.iter().max().copied();
    let num_entries = document.entries.len();

    let average_interval = match (first_entry, latest_entry) {
        (Some(first), Some(latest)) if num_entries > 1 && first < latest => {
            let seconds = (latest - first).num_seconds() as f64;
            Some((seconds / (num_entries - 1) as f64).round() as i64)
        }
        _ => None,
    };

    FeedRecord {
        title: document.title,
        num_entries: Some(num_entries),
        first_entry,
        latest_entry,
        average_interval,
        exception,
    }
}

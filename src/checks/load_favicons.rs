use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput, FaviconRecord};
use log::debug;
use std::collections::BTreeMap;
use url::Url;

/// Looks for `/favicon.ico` on the host of every URL.
pub struct LoadFavicons;

impl Check for LoadFavicons {
    fn name(&self) -> CheckName {
        CheckName::LoadFavicons
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Observer
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let mut records = BTreeMap::new();
        for url in ctx.urls.list() {
            let Some(icon_url) = favicon_url(url) else {
                continue;
            };
            let response = ctx.services.prober.probe(&icon_url, ctx.user_agent());
            if response.exception.is_none()
                && response.status == Some(200)
                && response.redirect_chain.is_empty()
            {
                records.insert(url.to_string(), FaviconRecord { url: icon_url });
            } else {
                debug!("No favicon at {}", icon_url);
            }
        }
        Ok(CheckOutput::LoadFavicons(records))
    }
}

fn favicon_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    Some(format!("{}://{}/favicon.ico", parsed.scheme(), parsed.host_str()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::{run, urls};
    use crate::results::ResultStore;
    use crate::testkit::FakeWeb;

    #[test]
    fn test_records_only_existing_icons() {
        let services = FakeWeb::new()
            .page("https://example.com/favicon.ico", 200, "")
            .page("https://www.example.com/favicon.ico", 404, "")
            .collaborators();
        let mut set = urls(&["https://example.com/news/", "https://www.example.com/"]);

        let output = run(&LoadFavicons, &mut set, &ResultStore::new(), &services);

        let CheckOutput::LoadFavicons(records) = output else {
            panic!("unexpected output");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(
            records["https://example.com/news/"].url,
            "https://example.com/favicon.ico"
        );
    }
}

use super::downloaded_page;
use crate::collaborators::html::extract_links;
use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput, HyperlinksRecord};
use std::collections::BTreeMap;

/// Collects every link with its visible text.
pub struct Hyperlinks;

impl Check for Hyperlinks {
    fn name(&self) -> CheckName {
        CheckName::Hyperlinks
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Observer
    }

    fn depends_on_results(&self) -> &'static [CheckName] {
        &[CheckName::PageContent]
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let mut records = BTreeMap::new();
        for url in ctx.urls.list() {
            let page = downloaded_page(ctx.results, self.name(), url)?;
            let links = page.content.as_deref().map(extract_links).unwrap_or_default();
            records.insert(
                url.to_string(),
                HyperlinksRecord {
                    links,
                    exception: None,
                },
            );
        }
        Ok(CheckOutput::Hyperlinks(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::page_content::PageContent;
    use crate::checks::test_support::{run_chain, urls};
    use crate::results::Hyperlink;
    use crate::testkit::FakeWeb;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collects_links_with_text() {
        let services = FakeWeb::new()
            .page(
                "http://example.com/",
                200,
                "<html><body><a href=\"/kontakt\"> Kontakt </a><a name=\"top\">Top</a></body></html>",
            )
            .collaborators();
        let mut set = urls(&["http://example.com/"]);

        let results = run_chain(&[&PageContent, &Hyperlinks], &mut set, &services);

        assert_eq!(
            results.hyperlinks().unwrap()["http://example.com/"].links,
            vec![
                Hyperlink {
                    href: Some("/kontakt".to_string()),
                    text: "Kontakt".to_string(),
                },
                Hyperlink {
                    href: None,
                    text: "Top".to_string(),
                },
            ]
        );
    }
}

use super::downloaded_page;
use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput, SimilarityRecord};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Compares the downloaded pages pairwise and drops one URL of every pair
/// whose markup is practically identical.
pub struct DuplicateContent;

impl Check for DuplicateContent {
    fn name(&self) -> CheckName {
        CheckName::DuplicateContent
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Pruner
    }

    fn depends_on_results(&self) -> &'static [CheckName] {
        &[CheckName::PageContent]
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let urls = ctx.urls.snapshot();
        if urls.len() < 2 {
            return Ok(CheckOutput::DuplicateContent(BTreeMap::new()));
        }

        let mut content = Vec::with_capacity(urls.len());
        for url in &urls {
            let page = downloaded_page(ctx.results, self.name(), url)?;
            if page.content.is_none() {
                warn!("No content recorded for {}", url);
            }
            content.push((url.as_str(), page.content.as_deref().unwrap_or("")));
        }

        let scorer = ctx.services.similarity.as_ref();
        let mut pairs: BTreeMap<String, SimilarityRecord> = BTreeMap::new();
        for (i, (url1, html1)) in content.iter().enumerate() {
            for (url2, html2) in &content[i + 1..] {
                let key = pair_key(url1, url2);
                let record = match scorer.similarity(html1, html2) {
                    Ok(similarity) => {
                        debug!("Similarity of {} is {}", key, similarity);
                        SimilarityRecord {
                            similarity: Some(similarity),
                            exception: None,
                        }
                    }
                    Err(e) => {
                        warn!("Could not compare {}: {}", key, e);
                        SimilarityRecord {
                            similarity: None,
                            exception: Some(e.to_string()),
                        }
                    }
                };
                pairs.insert(key, record);
            }
        }

        let threshold = ctx.config.similarity_threshold;
        for (key, record) in &pairs {
            let Some(similarity) = record.similarity else {
                continue;
            };
            if similarity <= threshold {
                continue;
            }
            if let Some((url1, url2)) = key.split_once(' ') {
                let reject = select_url_to_reject(url1, url2);
                info!("{} duplicates its pair, removing it", reject);
                ctx.urls.remove(reject);
            }
        }

        Ok(CheckOutput::DuplicateContent(pairs))
    }
}

/// The two URLs sorted and joined with a space.
fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{} {}", a, b)
    } else {
        format!("{} {}", b, a)
    }
}

/// Which of two duplicate URLs to drop: the one without `https://`, else the
/// longer one, else the second.
pub fn select_url_to_reject<'a>(url1: &'a str, url2: &'a str) -> &'a str {
    match (url1.starts_with("https://"), url2.starts_with("https://")) {
        (true, false) => return url2,
        (false, true) => return url1,
        _ => {}
    }
    if url1.len() > url2.len() {
        url1
    } else {
        url2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::page_content::PageContent;
    use crate::checks::test_support::{run_chain, urls};
    use crate::testkit::FakeWeb;
    use pretty_assertions::assert_eq;

    const PAGE: &str = "<html><head><title>x</title></head><body><div class=\"a\"><p>hi</p></div></body></html>";

    #[test]
    fn test_tie_break_prefers_https_then_shorter_then_first() {
        assert_eq!(
            select_url_to_reject("http://www.example.com/", "https://www.example.com/"),
            "http://www.example.com/"
        );
        assert_eq!(
            select_url_to_reject("https://example.com/", "http://example.com/"),
            "http://example.com/"
        );
        assert_eq!(
            select_url_to_reject("http://www.example.com/", "http://example.com/"),
            "http://www.example.com/"
        );
        assert_eq!(
            select_url_to_reject("http://example.com/a", "http://example.com/b"),
            "http://example.com/b"
        );
    }

    #[test]
    fn test_identical_pages_leave_one_survivor() {
        let services = FakeWeb::new()
            .page("http://example.com/", 200, PAGE)
            .page("http://www.example.com/", 200, PAGE)
            .collaborators();
        let mut set = urls(&["http://example.com/", "http://www.example.com/"]);

        let results = run_chain(&[&PageContent, &DuplicateContent], &mut set, &services);

        assert_eq!(set.snapshot(), vec!["http://example.com/".to_string()]);
        let pairs = results.duplicate_content().unwrap();
        let record = &pairs["http://example.com/ http://www.example.com/"];
        assert_eq!(record.similarity, Some(1.0));
    }

    #[test]
    fn test_four_identical_variants_keep_https_bare_domain() {
        let services = FakeWeb::new()
            .site("example.com", "192.0.2.1", PAGE)
            .collaborators();
        let mut set = urls(&[
            "http://example.com/",
            "https://example.com/",
            "http://www.example.com/",
            "https://www.example.com/",
        ]);

        let results = run_chain(&[&PageContent, &DuplicateContent], &mut set, &services);

        assert_eq!(set.snapshot(), vec!["https://example.com/".to_string()]);
        assert_eq!(results.duplicate_content().unwrap().len(), 6);
    }

    #[test]
    fn test_different_pages_are_kept() {
        let services = FakeWeb::new()
            .page("http://example.com/", 200, PAGE)
            .page(
                "http://www.example.com/",
                200,
                "<html><body><ul><li>other</li></ul></body></html>",
            )
            .collaborators();
        let mut set = urls(&["http://example.com/", "http://www.example.com/"]);

        run_chain(&[&PageContent, &DuplicateContent], &mut set, &services);

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_unscorable_pair_is_recorded_without_eviction() {
        let services = FakeWeb::new()
            .page("http://example.com/", 200, "plain text")
            .page("http://www.example.com/", 200, "plain text")
            .collaborators();
        let mut set = urls(&["http://example.com/", "http://www.example.com/"]);

        let results = run_chain(&[&PageContent, &DuplicateContent], &mut set, &services);

        assert_eq!(set.len(), 2);
        let record = &results.duplicate_content().unwrap()
            ["http://example.com/ http://www.example.com/"];
        assert_eq!(record.similarity, None);
        assert!(record.exception.is_some());
    }

    #[test]
    fn test_single_url_is_a_no_op() {
        let services = FakeWeb::new()
            .page("http://example.com/", 200, PAGE)
            .collaborators();
        let mut set = urls(&["http://example.com/"]);

        let results = run_chain(&[&PageContent, &DuplicateContent], &mut set, &services);

        assert_eq!(set.len(), 1);
        assert!(results.duplicate_content().unwrap().is_empty());
    }
}

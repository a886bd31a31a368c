use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};
use std::collections::BTreeSet;

/// One canonical URL, or several that all declare the same canonical link.
pub struct CanonicalUrl;

impl Rater for CanonicalUrl {
    fn criterion(&self) -> &'static str {
        "CANONICAL_URL"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::UrlCanonicalization]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let urls = results.url_canonicalization().map_or(&[][..], Vec::as_slice);
        let value = match urls.len() {
            0 => false,
            1 => true,
            _ => shared_canonical_link(results, urls),
        };
        RatingRecord::boolean(value, self.max_score())
    }
}

fn shared_canonical_link(results: &ResultStore, urls: &[String]) -> bool {
    let Some(heads) = results.html_head() else {
        return false;
    };
    let declared: Option<BTreeSet<&str>> = urls
        .iter()
        .map(|url| heads.get(url).and_then(|head| head.link_canonical.as_deref()))
        .collect();
    declared.is_some_and(|links| links.len() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::fixtures::*;
    use crate::rating::RatingValue;
    use crate::results::CheckOutput;

    fn canonical(urls: &[&str]) -> (CheckName, CheckOutput) {
        (
            CheckName::UrlCanonicalization,
            CheckOutput::UrlCanonicalization(urls.iter().map(|u| u.to_string()).collect()),
        )
    }

    #[test]
    fn test_single_url_is_canonical() {
        let results = store(vec![canonical(&["https://example.com/"])]);
        let record = CanonicalUrl.rate(&results, &RatingConfig::default());
        assert_eq!(record.value, RatingValue::Bool(true));
        assert_eq!(record.score, 1.0);
    }

    #[test]
    fn test_several_urls_sharing_a_canonical_link() {
        let urls = ["https://example.com/", "https://www.example.com/"];
        let results = store(vec![
            canonical(&urls),
            (
                CheckName::HtmlHead,
                CheckOutput::HtmlHead(keyed(vec![
                    (urls[0], head_with_canonical(Some("https://example.com/"))),
                    (urls[1], head_with_canonical(Some("https://example.com/"))),
                ])),
            ),
        ]);
        assert_eq!(CanonicalUrl.rate(&results, &RatingConfig::default()).score, 1.0);
    }

    #[test]
    fn test_several_urls_without_agreement() {
        let urls = ["https://example.com/", "https://www.example.com/"];
        let results = store(vec![
            canonical(&urls),
            (
                CheckName::HtmlHead,
                CheckOutput::HtmlHead(keyed(vec![
                    (urls[0], head_with_canonical(Some("https://example.com/"))),
                    (urls[1], head_with_canonical(None)),
                ])),
            ),
        ]);
        assert_eq!(CanonicalUrl.rate(&results, &RatingConfig::default()).score, 0.0);
    }
}

use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// At least one URL answered.
pub struct SiteReachable;

impl Rater for SiteReachable {
    fn criterion(&self) -> &'static str {
        "SITE_REACHABLE"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::UrlReachability]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let value = results
            .url_reachability()
            .is_some_and(|records| records.values().any(|r| r.exception.is_none()));
        RatingRecord::boolean(value, self.max_score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::fixtures::*;
    use crate::results::CheckOutput;

    #[test]
    fn test_one_reachable_url_is_enough() {
        let results = store(vec![(
            CheckName::UrlReachability,
            CheckOutput::UrlReachability(keyed(vec![
                ("http://example.com/", unreachable("http://example.com/")),
                ("https://example.com/", reachable("https://example.com/")),
            ])),
        )]);
        assert_eq!(SiteReachable.rate(&results, &RatingConfig::default()).score, 1.0);
    }

    #[test]
    fn test_nothing_reachable() {
        let results = store(vec![(
            CheckName::UrlReachability,
            CheckOutput::UrlReachability(keyed(vec![(
                "http://example.com/",
                unreachable("http://example.com/"),
            )])),
        )]);
        assert_eq!(SiteReachable.rate(&results, &RatingConfig::default()).score, 0.0);
    }
}

use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};
use std::collections::BTreeSet;
use url::Url;

/// More than one hostname answered, which for our inputs means the site
/// works both with and without `www.`.
pub struct WwwOptional;

impl Rater for WwwOptional {
    fn criterion(&self) -> &'static str {
        "WWW_OPTIONAL"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::UrlReachability]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let hostnames: BTreeSet<String> = results
            .url_reachability()
            .into_iter()
            .flatten()
            .filter(|(_, record)| record.exception.is_none())
            .filter_map(|(url, _)| Url::parse(url).ok()?.host_str().map(str::to_string))
            .collect();
        RatingRecord::boolean(hostnames.len() > 1, self.max_score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::fixtures::*;
    use crate::results::CheckOutput;

    #[test]
    fn test_both_hostnames_reachable() {
        let results = store(vec![(
            CheckName::UrlReachability,
            CheckOutput::UrlReachability(keyed(vec![
                ("https://example.com/", reachable("https://example.com/")),
                ("https://www.example.com/", reachable("https://www.example.com/")),
            ])),
        )]);
        assert_eq!(WwwOptional.rate(&results, &RatingConfig::default()).score, 1.0);
    }

    #[test]
    fn test_schemes_of_one_host_are_not_enough() {
        let results = store(vec![(
            CheckName::UrlReachability,
            CheckOutput::UrlReachability(keyed(vec![
                ("http://example.com/", reachable("http://example.com/")),
                ("https://example.com/", reachable("https://example.com/")),
                ("https://www.example.com/", unreachable("https://www.example.com/")),
            ])),
        )]);
        assert_eq!(WwwOptional.rate(&results, &RatingConfig::default()).score, 0.0);
    }
}

use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// Some page declares an icon, or serves `/favicon.ico`.
pub struct Favicon;

impl Rater for Favicon {
    fn criterion(&self) -> &'static str {
        "FAVICON"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::HtmlHead, CheckName::LoadFavicons]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let declared = results
            .html_head()
            .is_some_and(|heads| heads.values().any(|head| head.link_icon.is_some()));
        let served = results
            .load_favicons()
            .is_some_and(|icons| !icons.is_empty());
        RatingRecord::boolean(declared || served, self.max_score())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::fixtures::*;
    use crate::results::{CheckOutput, FaviconRecord, HtmlHeadRecord};

    #[test]
    fn test_fallback_favicon_counts() {
        let results = store(vec![
            (
                CheckName::HtmlHead,
                CheckOutput::HtmlHead(keyed(vec![(
                    "https://example.com/",
                    HtmlHeadRecord::default(),
                )])),
            ),
            (
                CheckName::LoadFavicons,
                CheckOutput::LoadFavicons(keyed(vec![(
                    "https://example.com/",
                    FaviconRecord {
                        url: "https://example.com/favicon.ico".to_string(),
                    },
                )])),
            ),
        ]);
        assert_eq!(Favicon.rate(&results, &RatingConfig::default()).score, 1.0);
    }

    #[test]
    fn test_no_icon_anywhere() {
        let results = store(vec![
            (
                CheckName::HtmlHead,
                CheckOutput::HtmlHead(keyed(vec![(
                    "https://example.com/",
                    HtmlHeadRecord::default(),
                )])),
            ),
            (CheckName::LoadFavicons, CheckOutput::LoadFavicons(keyed(Vec::new()))),
        ]);
        assert_eq!(Favicon.rate(&results, &RatingConfig::default()).score, 0.0);
    }
}

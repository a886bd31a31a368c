use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// Some page links an RSS or Atom feed.
pub struct Feeds;

impl Rater for Feeds {
    fn criterion(&self) -> &'static str {
        "FEEDS"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::HtmlHead]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let value = results.html_head().is_some_and(|heads| {
            heads
                .values()
                .any(|head| head.link_rss_atom.as_ref().is_some_and(|f| !f.is_empty()))
        });
        RatingRecord::boolean(value, self.max_score())
    }
}

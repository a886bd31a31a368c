use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// Some page fits the narrowest viewport without horizontal scrolling.
pub struct Responsive;

impl Rater for Responsive {
    fn criterion(&self) -> &'static str {
        "RESPONSIVE"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::LoadInBrowser]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let value = results.load_in_browser().is_some_and(|records| {
            records.values().any(|record| {
                match (record.min_document_width, record.sizes.first()) {
                    (Some(min), Some(first)) => min <= first.viewport_width,
                    _ => false,
                }
            })
        });
        RatingRecord::boolean(value, self.max_score())
    }
}

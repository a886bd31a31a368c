use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// No page load logged a severe network error, and at least one page loaded.
pub struct NoNetworkErrors;

impl Rater for NoNetworkErrors {
    fn criterion(&self) -> &'static str {
        "NO_NETWORK_ERRORS"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::LoadInBrowser]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let value = super::no_severe_entries(results, |entry| entry.is_network());
        RatingRecord::boolean(value, self.max_score())
    }
}

use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// No page load logged a severe JavaScript error, and at least one page loaded.
pub struct NoScriptErrors;

impl Rater for NoScriptErrors {
    fn criterion(&self) -> &'static str {
        "NO_SCRIPT_ERRORS"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::LoadInBrowser]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let value = super::no_severe_entries(results, |entry| entry.is_script());
        RatingRecord::boolean(value, self.max_score())
    }
}

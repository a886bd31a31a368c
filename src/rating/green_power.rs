use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// Some host is known to run on green power.
pub struct GreenPower;

impl Rater for GreenPower {
    fn criterion(&self) -> &'static str {
        "GREEN_POWER"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::GreenPower]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let value = results
            .green_power()
            .is_some_and(|records| records.values().any(|r| r.green));
        RatingRecord::boolean(value, self.max_score())
    }
}

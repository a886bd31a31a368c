use super::{Rater, RatingRecord, RatingType};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// Largest number of requests any page load issued.
pub struct NetworkRequests;

impl Rater for NetworkRequests {
    fn criterion(&self) -> &'static str {
        "NETWORK_REQUESTS"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::LoadInBrowser]
    }

    fn rating_type(&self) -> RatingType {
        RatingType::Number
    }

    fn rate(&self, results: &ResultStore, config: &RatingConfig) -> RatingRecord {
        let Some(largest) = super::largest_measured(results, |r| r.network_requests) else {
            return self.default_record();
        };
        let score = if largest <= config.few_requests {
            1.0
        } else if largest <= config.many_requests {
            0.5
        } else {
            0.0
        };
        RatingRecord::number(largest, score, self.max_score())
    }
}

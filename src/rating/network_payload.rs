use super::{Rater, RatingRecord, RatingType};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// Largest number of bytes any page load transferred.
pub struct NetworkPayload;

impl Rater for NetworkPayload {
    fn criterion(&self) -> &'static str {
        "NETWORK_PAYLOAD"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::LoadInBrowser]
    }

    fn rating_type(&self) -> RatingType {
        RatingType::Number
    }

    fn rate(&self, results: &ResultStore, config: &RatingConfig) -> RatingRecord {
        let Some(largest) = super::largest_measured(results, |r| r.network_payload) else {
            return self.default_record();
        };
        let score = if largest < config.small_payload_bytes {
            1.0
        } else if largest < config.large_payload_bytes {
            0.5
        } else {
            0.0
        };
        RatingRecord::number(largest, score, self.max_score())
    }
}

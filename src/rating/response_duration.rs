use super::{Rater, RatingRecord, RatingType};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// Average download time of the pages, in milliseconds. Full score below
/// the fast threshold, half below the slow one.
pub struct HttpResponseDuration;

impl Rater for HttpResponseDuration {
    fn criterion(&self) -> &'static str {
        "HTTP_RESPONSE_DURATION"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::PageContent]
    }

    fn rating_type(&self) -> RatingType {
        RatingType::Number
    }

    fn rate(&self, results: &ResultStore, config: &RatingConfig) -> RatingRecord {
        let durations: Vec<u64> = results
            .page_content()
            .into_iter()
            .flatten()
            .filter(|(_, page)| page.exception.is_none())
            .filter_map(|(_, page)| page.duration)
            .collect();
        if durations.is_empty() {
            return self.default_record();
        }

        let total = durations.iter().sum::<u64>() as f64;
        let average = (total / durations.len() as f64).round() as u64;
        let score = if average < config.fast_response_ms {
            self.max_score()
        } else if average < config.slow_response_ms {
            self.max_score() * 0.5
        } else {
            0.0
        };
        RatingRecord::number(average, score, self.max_score())
    }
}

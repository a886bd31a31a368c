use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// Every `https://` URL checked was reachable, and there was at least one.
/// Counts double.
pub struct Https;

impl Rater for Https {
    fn criterion(&self) -> &'static str {
        "HTTPS"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::UrlReachability]
    }

    fn max_score(&self) -> f64 {
        2.0
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let (reachable, unreachable) = results
            .url_reachability()
            .into_iter()
            .flatten()
            .filter(|(url, _)| url.starts_with("https://"))
            .fold((0, 0), |(ok, failed), (_, record)| {
                if record.exception.is_none() {
                    (ok + 1, failed)
                } else {
                    (ok, failed + 1)
                }
            });
        RatingRecord::boolean(reachable > 0 && unreachable == 0, self.max_score())
    }
}

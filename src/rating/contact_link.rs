use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// Every page links to a contact page.
pub struct ContactLink;

impl Rater for ContactLink {
    fn criterion(&self) -> &'static str {
        "CONTACT_LINK"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::Hyperlinks]
    }

    fn rate(&self, results: &ResultStore, config: &RatingConfig) -> RatingRecord {
        let pages = results
            .hyperlinks()
            .map(|m| m.values().collect::<Vec<_>>())
            .unwrap_or_default();
        let expected = config.contact_link_text.to_lowercase();
        let value = !pages.is_empty()
            && pages.iter().all(|page| {
                page.links
                    .iter()
                    .any(|link| link.text.to_lowercase() == expected)
            });
        RatingRecord::boolean(value, self.max_score())
    }
}

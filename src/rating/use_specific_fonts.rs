use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// The configured font family is in use, and fonts could be read on every page.
pub struct UseSpecificFonts;

impl Rater for UseSpecificFonts {
    fn criterion(&self) -> &'static str {
        "USE_SPECIFIC_FONTS"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::LoadInBrowser]
    }

    fn rate(&self, results: &ResultStore, config: &RatingConfig) -> RatingRecord {
        let Some(records) = results.load_in_browser() else {
            return self.default_record();
        };
        let font = config.specific_font.to_lowercase();
        let mut with_font = 0;
        let mut unknown = 0;
        for record in records.values() {
            match &record.font_families {
                Some(families) if families.join(" ").contains(&font) => with_font += 1,
                Some(_) => {}
                None => unknown += 1,
            }
        }
        RatingRecord::boolean(with_font > 0 && unknown == 0, self.max_score())
    }
}

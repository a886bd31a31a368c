use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};
use log::debug;
use url::Url;

/// No page set a cookie for a foreign domain.
pub struct NoThirdPartyCookies;

impl Rater for NoThirdPartyCookies {
    fn criterion(&self) -> &'static str {
        "NO_THIRD_PARTY_COOKIES"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::LoadInBrowser]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let Some(records) = results.load_in_browser() else {
            return self.default_record();
        };
        let with_third_party = records
            .iter()
            .filter(|(url, record)| {
                let netloc = netloc(url);
                record.cookies.iter().flatten().any(|cookie| {
                    let foreign = !netloc.ends_with(&cookie.host_key);
                    if foreign {
                        debug!("Cookie for {} on {} is third party", cookie.host_key, url);
                    }
                    foreign
                })
            })
            .count();
        RatingRecord::boolean(!records.is_empty() && with_third_party == 0, self.max_score())
    }
}

/// `host[:port]` of `url`.
fn netloc(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.host_str().map(|host| match u.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            })
        })
        .unwrap_or_default()
}

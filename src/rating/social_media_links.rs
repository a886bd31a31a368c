use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, Hyperlink, ResultStore};
use log::debug;
use url::Url;

/// Every page links to a social media profile.
pub struct SocialMediaLinks;

impl Rater for SocialMediaLinks {
    fn criterion(&self) -> &'static str {
        "SOCIAL_MEDIA_LINKS"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::Hyperlinks]
    }

    fn rate(&self, results: &ResultStore, config: &RatingConfig) -> RatingRecord {
        let Some(pages) = results.hyperlinks() else {
            return self.default_record();
        };
        let value = !pages.is_empty()
            && pages.iter().all(|(url, page)| {
                page.links.iter().any(|link| {
                    let social = is_social_media_link(link, &config.social_media_hosts);
                    if social {
                        debug!("Found social media link on {}: {:?}", url, link.href);
                    }
                    social
                })
            });
        RatingRecord::boolean(value, self.max_score())
    }
}

/// Only absolute `http(s)` links count.
fn is_social_media_link(link: &Hyperlink, hosts: &[String]) -> bool {
    let Some(href) = link.href.as_deref() else {
        return false;
    };
    if !(href.starts_with("http:") || href.starts_with("https:")) {
        return false;
    }
    Url::parse(href)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .is_some_and(|host| hosts.iter().any(|social| host.contains(social.as_str())))
}

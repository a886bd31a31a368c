//! Scoring a site from the evidence its checks collected.
//!
//! Every [`Rater`] is a pure function of the [`ResultStore`]: it looks at one
//! or two check results and produces a [`RatingRecord`]. Raters are
//! independent of each other, so the total is a plain sum with no
//! normalisation. Totals are only comparable between reports rated with the
//! same set of raters.
//!
//! A rater whose checks produced no result entry (because the pipeline skipped
//! them) reports its default value with a score of zero.

mod canonical_url;
mod contact_link;
mod favicon;
mod feeds;
mod green_power;
mod https;
mod network_payload;
mod network_requests;
mod no_network_errors;
mod no_script_errors;
mod no_third_party_cookies;
mod reachable;
mod resolvable;
mod response_duration;
mod responsive;
mod social_media_links;
mod use_specific_fonts;
mod www_optional;

pub use canonical_url::CanonicalUrl;
pub use contact_link::ContactLink;
pub use favicon::Favicon;
pub use feeds::Feeds;
pub use green_power::GreenPower;
pub use https::Https;
pub use network_payload::NetworkPayload;
pub use network_requests::NetworkRequests;
pub use no_network_errors::NoNetworkErrors;
pub use no_script_errors::NoScriptErrors;
pub use no_third_party_cookies::NoThirdPartyCookies;
pub use reachable::SiteReachable;
pub use resolvable::DnsResolvableIpv4;
pub use response_duration::HttpResponseDuration;
pub use responsive::Responsive;
pub use social_media_links::SocialMediaLinks;
pub use use_specific_fonts::UseSpecificFonts;
pub use www_optional::WwwOptional;

use crate::collaborators::browser::ConsoleLogEntry;
use crate::config::RatingConfig;
use crate::errors::PipelineError;
use crate::observability::{set_phase, Phase};
use crate::pipeline::Pipeline;
use crate::results::{BrowserRecord, CheckName, ResultStore};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingType {
    Boolean,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    Bool(bool),
    Number(u64),
}

/// One scored criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(rename = "type")]
    pub rating_type: RatingType,
    pub value: RatingValue,
    pub score: f64,
    pub max_score: f64,
}

impl RatingRecord {
    /// Full score when `value` holds, nothing otherwise.
    pub fn boolean(value: bool, max_score: f64) -> Self {
        Self {
            rating_type: RatingType::Boolean,
            value: RatingValue::Bool(value),
            score: if value { max_score } else { 0.0 },
            max_score,
        }
    }

    pub fn number(value: u64, score: f64, max_score: f64) -> Self {
        Self {
            rating_type: RatingType::Number,
            value: RatingValue::Number(value),
            score,
            max_score,
        }
    }
}

/// Criterion name to its rating, e.g. `"HTTPS"`.
pub type Ratings = BTreeMap<String, RatingRecord>;

pub fn total_score(ratings: &Ratings) -> f64 {
    ratings.values().map(|r| r.score).sum()
}

pub trait Rater: Send + Sync {
    /// Upper-case criterion key, e.g. `SITE_REACHABLE`.
    fn criterion(&self) -> &'static str;

    fn depends_on_checks(&self) -> &'static [CheckName];

    fn rating_type(&self) -> RatingType {
        RatingType::Boolean
    }

    fn max_score(&self) -> f64 {
        1.0
    }

    /// Called only when every dependency has a result entry.
    fn rate(&self, results: &ResultStore, config: &RatingConfig) -> RatingRecord;

    /// Reported when a dependency is missing.
    fn default_record(&self) -> RatingRecord {
        match self.rating_type() {
            RatingType::Boolean => RatingRecord::boolean(false, self.max_score()),
            RatingType::Number => RatingRecord::number(0, 0.0, self.max_score()),
        }
    }
}

/// The fixed set of raters applied to every site.
pub struct RatingEngine {
    raters: Vec<Box<dyn Rater>>,
}

impl Default for RatingEngine {
    fn default() -> Self {
        Self::new(vec![
            Box::new(CanonicalUrl),
            Box::new(ContactLink),
            Box::new(DnsResolvableIpv4),
            Box::new(Favicon),
            Box::new(Feeds),
            Box::new(Https),
            Box::new(HttpResponseDuration),
            Box::new(NoNetworkErrors),
            Box::new(NoScriptErrors),
            Box::new(NoThirdPartyCookies),
            Box::new(Responsive),
            Box::new(SiteReachable),
            Box::new(SocialMediaLinks),
            Box::new(UseSpecificFonts),
            Box::new(WwwOptional),
            Box::new(GreenPower),
            Box::new(NetworkPayload),
            Box::new(NetworkRequests),
        ])
    }
}

impl RatingEngine {
    pub fn new(raters: Vec<Box<dyn Rater>>) -> Self {
        Self { raters }
    }

    pub fn criteria(&self) -> Vec<&'static str> {
        self.raters.iter().map(|r| r.criterion()).collect()
    }

    pub fn rate(&self, results: &ResultStore, config: &RatingConfig) -> Ratings {
        let _phase = set_phase(Phase::Rating);
        self.raters
            .iter()
            .map(|rater| {
                let record = if rater
                    .depends_on_checks()
                    .iter()
                    .all(|dep| results.contains(*dep))
                {
                    rater.rate(results, config)
                } else {
                    debug!("{} lacks evidence, using its default", rater.criterion());
                    rater.default_record()
                };
                (rater.criterion().to_string(), record)
            })
            .collect()
    }

    /// Every rater dependency must be produced by some check of `pipeline`.
    pub fn validate_against(&self, pipeline: &Pipeline) -> Result<(), PipelineError> {
        let produced: HashSet<CheckName> = pipeline.check_names().into_iter().collect();
        let missing: Vec<String> = self
            .raters
            .iter()
            .flat_map(|rater| {
                rater
                    .depends_on_checks()
                    .iter()
                    .filter(|dep| !produced.contains(*dep))
                    .map(move |dep| format!("{} needs {}", rater.criterion(), dep))
            })
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::Misconfigured(missing.join(", ")))
        }
    }
}

/// At least one page loaded in the browser, and none logged a `SEVERE`
/// entry matching `kind`.
fn no_severe_entries(results: &ResultStore, kind: impl Fn(&ConsoleLogEntry) -> bool) -> bool {
    let loads: Vec<&BrowserRecord> = results
        .load_in_browser()
        .into_iter()
        .flat_map(|records| records.values())
        .filter(|record| record.exception.is_none())
        .collect();
    !loads.is_empty()
        && loads.iter().all(|record| {
            !record
                .logs
                .iter()
                .any(|entry| entry.level == "SEVERE" && kind(entry))
        })
}

/// Maximum of `measure` over page loads that recorded network traffic.
fn largest_measured(
    results: &ResultStore,
    measure: impl Fn(&BrowserRecord) -> Option<u64>,
) -> Option<u64> {
    results
        .load_in_browser()?
        .values()
        .filter(|record| record.exception.is_none())
        .filter(|record| record.network_requests.is_some_and(|n| n > 0))
        .filter_map(measure)
        .max()
}

/// Test fixtures shared by the rater unit tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use crate::collaborators::browser::{ConsoleLogEntry, Cookie, ViewportWidth};
    use crate::errors::CheckException;
    use crate::results::{
        BrowserRecord, CheckName, CheckOutput, DnsRecord, HtmlHeadRecord, Hyperlink,
        HyperlinksRecord, PageContentRecord, ReachabilityRecord, ResultStore,
    };
    use std::collections::BTreeMap;

    pub fn store(entries: Vec<(CheckName, CheckOutput)>) -> ResultStore {
        let mut store = ResultStore::new();
        for (name, output) in entries {
            store.insert(name, output).unwrap();
        }
        store
    }

    pub fn keyed<T>(entries: Vec<(&str, T)>) -> BTreeMap<String, T> {
        entries
            .into_iter()
            .map(|(url, value)| (url.to_string(), value))
            .collect()
    }

    pub fn reachable(url: &str) -> ReachabilityRecord {
        ReachabilityRecord {
            url: url.to_string(),
            status: Some(200),
            duration: Some(80),
            redirect_history: Vec::new(),
            exception: None,
        }
    }

    pub fn unreachable(url: &str) -> ReachabilityRecord {
        ReachabilityRecord {
            status: None,
            duration: None,
            exception: Some(CheckException::connection("refused")),
            ..reachable(url)
        }
    }

    pub fn resolved(hostname: &str, ipv4: &[&str]) -> DnsRecord {
        DnsRecord {
            hostname: hostname.to_string(),
            resolvable: !ipv4.is_empty(),
            resolvable_ipv4: !ipv4.is_empty(),
            resolvable_ipv6: false,
            aliases: Vec::new(),
            ipv4_addresses: ipv4.iter().map(|a| a.to_string()).collect(),
            ipv6_addresses: Vec::new(),
        }
    }

    pub fn page(duration: u64) -> PageContentRecord {
        PageContentRecord {
            url: "http://example.com/".to_string(),
            content: Some("<html></html>".to_string()),
            status_code: Some(200),
            duration: Some(duration),
            ..Default::default()
        }
    }

    pub fn head_with_canonical(canonical: Option<&str>) -> HtmlHeadRecord {
        HtmlHeadRecord {
            link_canonical: canonical.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn links(links: &[(&str, &str)]) -> HyperlinksRecord {
        HyperlinksRecord {
            links: links
                .iter()
                .map(|(href, text)| Hyperlink {
                    href: Some(href.to_string()),
                    text: text.to_string(),
                })
                .collect(),
            exception: None,
        }
    }

    pub fn loaded() -> BrowserRecord {
        BrowserRecord {
            sizes: vec![ViewportWidth {
                viewport_width: 360,
                document_width: 360,
            }],
            min_document_width: Some(360),
            font_families: Some(Vec::new()),
            cookies: Some(Vec::new()),
            network_payload: Some(0),
            network_requests: Some(0),
            ..Default::default()
        }
    }

    pub fn log(level: &str, source: &str) -> ConsoleLogEntry {
        ConsoleLogEntry {
            level: level.to_string(),
            source: source.to_string(),
            message: "failed".to_string(),
        }
    }

    pub fn cookie(host_key: &str) -> Cookie {
        Cookie {
            host_key: host_key.to_string(),
            name: "session".to_string(),
            path: "/".to_string(),
            is_secure: true,
            is_httponly: true,
        }
    }
}

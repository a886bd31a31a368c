//! Tunables for checks, collaborators and raters.
//!
//! Every default lives in one `default_*` function so a partial
//! `.siterate.toml` only needs to name what it changes:
//!
//! ```toml
//! user_agent = "my-crawler/1.0"
//! similarity_threshold = 0.95
//!
//! [rating]
//! specific_font = "roboto"
//!
//! [browser_retry]
//! max_retries = 5
//! ```

mod loader;
pub mod retry;

pub use loader::{
    config_path_in, directory_ancestors, load_config, load_config_from, CONFIG_FILE_NAME,
};
pub use retry::{retry_with, RetryConfig, RetryStrategy};

use crate::collaborators::Timeouts;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

/// Browser window size used for one responsiveness measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRateConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Per-request timeout of reachability probes and favicon checks
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Pages more similar than this are considered duplicates
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Redirect targets that mean the site itself is gone
    #[serde(default = "default_blocked_redirect_hosts")]
    pub blocked_redirect_hosts: Vec<String>,

    /// Assumed when neither header nor markup declares a charset
    #[serde(default = "default_charset")]
    pub default_charset: String,

    #[serde(default = "default_viewport_sizes")]
    pub viewport_sizes: Vec<Viewport>,

    #[serde(default = "default_green_power_endpoint")]
    pub green_power_endpoint: String,

    #[serde(default)]
    pub browser_retry: RetryConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub rating: RatingConfig,
}

impl Default for SiteRateConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            similarity_threshold: default_similarity_threshold(),
            blocked_redirect_hosts: default_blocked_redirect_hosts(),
            default_charset: default_charset(),
            viewport_sizes: default_viewport_sizes(),
            green_power_endpoint: default_green_power_endpoint(),
            browser_retry: RetryConfig::default(),
            generator: GeneratorConfig::default(),
            rating: RatingConfig::default(),
        }
    }
}

impl SiteRateConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: self.connect_timeout(),
            read: self.read_timeout(),
        }
    }

    pub fn is_blocked_redirect_host(&self, host: &str) -> bool {
        self.blocked_redirect_hosts
            .iter()
            .any(|blocked| blocked.eq_ignore_ascii_case(host))
    }

    /// Collects every problem rather than stopping at the first one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = Vec::new();

        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            problems.push(format!(
                "similarity_threshold out of range: {} (must be 0.0-1.0)",
                self.similarity_threshold
            ));
        }
        for (name, secs) in [
            ("connect_timeout_secs", self.connect_timeout_secs),
            ("read_timeout_secs", self.read_timeout_secs),
            ("probe_timeout_secs", self.probe_timeout_secs),
        ] {
            if secs == 0 {
                problems.push(format!("{} must be greater than zero", name));
            }
        }
        if self.viewport_sizes.is_empty() {
            problems.push("viewport_sizes must not be empty".to_string());
        }
        if self.viewport_sizes.iter().any(|v| v.width == 0 || v.height == 0) {
            problems.push("viewport sizes must have non-zero width and height".to_string());
        }
        if self.user_agent.trim().is_empty() {
            problems.push("user_agent must not be empty".to_string());
        }
        problems.extend(self.rating.problems());

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(problems))
        }
    }
}

/// CMS fingerprinting knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Server address of the shared GCMS hosting; sites resolving to it are `typo3-gcms`
    #[serde(default = "default_gcms_ip")]
    pub gcms_ip: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            gcms_ip: default_gcms_ip(),
        }
    }
}

/// Thresholds used by the raters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Responses faster than this earn the full duration score
    #[serde(default = "default_fast_response_ms")]
    pub fast_response_ms: u64,

    /// Responses faster than this earn half the duration score
    #[serde(default = "default_slow_response_ms")]
    pub slow_response_ms: u64,

    #[serde(default = "default_small_payload_bytes")]
    pub small_payload_bytes: u64,

    #[serde(default = "default_large_payload_bytes")]
    pub large_payload_bytes: u64,

    #[serde(default = "default_few_requests")]
    pub few_requests: u64,

    #[serde(default = "default_many_requests")]
    pub many_requests: u64,

    /// Lower-case font family name the site is expected to use
    #[serde(default = "default_specific_font")]
    pub specific_font: String,

    /// Text of a contact page link, compared case-insensitively
    #[serde(default = "default_contact_link_text")]
    pub contact_link_text: String,

    #[serde(default = "default_social_media_hosts")]
    pub social_media_hosts: Vec<String>,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            fast_response_ms: default_fast_response_ms(),
            slow_response_ms: default_slow_response_ms(),
            small_payload_bytes: default_small_payload_bytes(),
            large_payload_bytes: default_large_payload_bytes(),
            few_requests: default_few_requests(),
            many_requests: default_many_requests(),
            specific_font: default_specific_font(),
            contact_link_text: default_contact_link_text(),
            social_media_hosts: default_social_media_hosts(),
        }
    }
}

impl RatingConfig {
    fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.fast_response_ms > self.slow_response_ms {
            problems.push("rating.fast_response_ms exceeds rating.slow_response_ms".to_string());
        }
        if self.small_payload_bytes > self.large_payload_bytes {
            problems.push(
                "rating.small_payload_bytes exceeds rating.large_payload_bytes".to_string(),
            );
        }
        if self.few_requests > self.many_requests {
            problems.push("rating.few_requests exceeds rating.many_requests".to_string());
        }
        problems
    }
}

// Default value functions for serde
fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) \
         Chrome/120.0.0.0 Safari/537.36 siterate/{}",
        env!("CARGO_PKG_VERSION")
    )
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_read_timeout_secs() -> u64 {
    20
}

fn default_probe_timeout_secs() -> u64 {
    20
}

fn default_similarity_threshold() -> f64 {
    0.99999
}

fn default_blocked_redirect_hosts() -> Vec<String> {
    vec![
        "www.facebook.com".to_string(),
        "www.denic.de".to_string(),
        "sedo.com".to_string(),
    ]
}

fn default_charset() -> String {
    "iso-8859-1".to_string()
}

fn default_viewport_sizes() -> Vec<Viewport> {
    vec![
        Viewport::new(360, 640),
        Viewport::new(768, 1024),
        Viewport::new(1024, 768),
        Viewport::new(1920, 1080),
    ]
}

fn default_green_power_endpoint() -> String {
    "http://api.thegreenwebfoundation.org/greencheck/".to_string()
}

fn default_gcms_ip() -> String {
    "91.102.13.20".to_string()
}

fn default_fast_response_ms() -> u64 {
    100
}

fn default_slow_response_ms() -> u64 {
    1000
}

fn default_small_payload_bytes() -> u64 {
    994_000
}

fn default_large_payload_bytes() -> u64 {
    1_496_000
}

fn default_few_requests() -> u64 {
    28
}

fn default_many_requests() -> u64 {
    38
}

fn default_specific_font() -> String {
    "arvo".to_string()
}

fn default_contact_link_text() -> String {
    "kontakt".to_string()
}

fn default_social_media_hosts() -> Vec<String> {
    ["facebook.com", "twitter.com", "instagram.com", "gruene.social"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

//! Capabilities the pipeline consumes but does not own.
//!
//! Each external concern (HTTP, DNS, TLS, browser, feeds, ...) sits behind a
//! small trait so checks can be exercised against the in-memory
//! [`crate::testkit::FakeWeb`] and so deployments can swap implementations.
//! All traits are `Send + Sync`: one [`Collaborators`] value is shared by
//! every pipeline run in a batch, while each run keeps its own working set
//! and result store.
//!
//! Collaborators report per-item failures as [`CheckException`] values
//! instead of panicking, and every network call is bounded by a timeout.

pub mod browser;
pub mod dns;
pub mod feed;
pub mod html;
pub mod http;
pub mod similarity;
pub mod tls;
pub mod unavailable;

pub use browser::{Browser, BrowserMeasurement};
pub use dns::SystemResolver;
pub use feed::{FeedDocument, FeedEntry};
pub use http::HttpClient;
pub use similarity::{SimilarityError, SimilarityScorer, StructuralSimilarity};
pub use tls::OpensslCertificates;
pub use unavailable::Unavailable;

use crate::config::SiteRateConfig;
use crate::errors::{CheckException, PipelineError};
use crate::results::RedirectHop;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Connect and read timeouts for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
}

/// Result of a full GET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchResponse {
    pub final_url: String,
    pub status: Option<u16>,
    /// Header names lower-cased
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    /// Milliseconds
    pub duration: Option<u64>,
    pub exception: Option<CheckException>,
}

impl FetchResponse {
    pub fn failed(url: &str, exception: CheckException) -> Self {
        Self {
            final_url: url.to_string(),
            exception: Some(exception),
            ..Default::default()
        }
    }
}

/// Result of a body-less probe that followed redirects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeResponse {
    /// Effective URL after the redirect chain
    pub final_url: String,
    pub status: Option<u16>,
    pub duration: Option<u64>,
    pub redirect_chain: Vec<RedirectHop>,
    pub exception: Option<CheckException>,
}

impl ProbeResponse {
    pub fn failed(url: &str, redirect_chain: Vec<RedirectHop>, exception: CheckException) -> Self {
        Self {
            final_url: url.to_string(),
            redirect_chain,
            exception: Some(exception),
            ..Default::default()
        }
    }
}

/// Addresses for one hostname in one address family.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub resolvable: bool,
    pub addresses: Vec<String>,
    pub aliases: Vec<String>,
}

/// Facts from a server certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    pub serial_number: String,
    pub subject: BTreeMap<String, String>,
    pub issuer: BTreeMap<String, String>,
    pub not_before: DateTime<Utc>,
    pub not_after: DateTime<Utc>,
}

pub trait ContentFetcher: Send + Sync {
    fn fetch(&self, url: &str, user_agent: &str, timeouts: Timeouts) -> FetchResponse;
}

pub trait ReachabilityProbe: Send + Sync {
    fn probe(&self, url: &str, user_agent: &str) -> ProbeResponse;
}

pub trait DnsResolver: Send + Sync {
    fn resolve(&self, hostname: &str) -> Resolution;
    fn resolve_ipv6(&self, hostname: &str) -> Resolution;

    /// IPv4 and IPv6 resolution of one host. Resolvers that answer both
    /// families from a single query override this.
    fn resolve_both(&self, hostname: &str) -> (Resolution, Resolution) {
        (self.resolve(hostname), self.resolve_ipv6(hostname))
    }
}

pub trait CertificateSource: Send + Sync {
    fn get_certificate(&self, host: &str, port: u16) -> Result<CertificateInfo, CheckException>;
}

pub trait FeedSource: Send + Sync {
    fn parse_feed(&self, url: &str, user_agent: &str) -> FeedDocument;
}

pub trait GreenPowerLookup: Send + Sync {
    fn is_green(&self, hostname: &str) -> Result<bool, CheckException>;
}

/// Everything a pipeline run may call out to.
#[derive(Clone)]
pub struct Collaborators {
    pub fetcher: Arc<dyn ContentFetcher>,
    pub prober: Arc<dyn ReachabilityProbe>,
    pub resolver: Arc<dyn DnsResolver>,
    pub certificates: Arc<dyn CertificateSource>,
    pub similarity: Arc<dyn SimilarityScorer>,
    pub browser: Arc<dyn Browser>,
    pub feeds: Arc<dyn FeedSource>,
    pub green_power: Arc<dyn GreenPowerLookup>,
}

impl Collaborators {
    /// Network-backed collaborators. No browser backend ships with the crate,
    /// so browser measurements are recorded as unavailable.
    pub fn production(config: &SiteRateConfig) -> Result<Self, PipelineError> {
        let http = Arc::new(HttpClient::new(config)?);
        Ok(Self {
            fetcher: http.clone(),
            prober: http.clone(),
            resolver: Arc::new(SystemResolver::new(config.connect_timeout())),
            certificates: Arc::new(OpensslCertificates::new(config.timeouts())),
            similarity: Arc::new(StructuralSimilarity::default()),
            browser: Arc::new(Unavailable),
            feeds: http.clone(),
            green_power: http,
        })
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

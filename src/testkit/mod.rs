//! In-memory stand-ins for every collaborator.
//!
//! [`FakeWeb`] models a tiny internet: hostnames with addresses, pages with
//! status and body, redirects, per-URL failures, certificates, browser
//! measurements and green-hosting facts. Unit tests and the integration
//! tests under `tests/` build one per scenario.
//!
//! ```rust
//! use siterate::testkit::FakeWeb;
//!
//! let web = FakeWeb::new()
//!     .host("example.com", &["93.184.216.34"])
//!     .page("http://example.com/", 200, "<html><body>hi</body></html>");
//! let services = web.collaborators();
//! # let _ = services;
//! ```

use crate::collaborators::browser::{Browser, BrowserMeasurement};
use crate::collaborators::feed::parse_feed_document;
use crate::collaborators::{
    CertificateInfo, CertificateSource, Collaborators, ContentFetcher, DnsResolver,
    FeedDocument, FeedSource, FetchResponse, GreenPowerLookup, ProbeResponse,
    ReachabilityProbe, Resolution, StructuralSimilarity, Timeouts,
};
use crate::config::Viewport;
use crate::errors::{CheckException, ExceptionKind};
use crate::results::RedirectHop;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

const MAX_REDIRECTS: usize = 10;

/// A page the fake web serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakePage {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
    /// Milliseconds reported for the request
    pub duration: u64,
}

impl FakePage {
    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: BTreeMap::from([(
                "content-type".to_string(),
                "text/html; charset=utf-8".to_string(),
            )]),
            body: body.into(),
            duration: 50,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_duration(mut self, duration: u64) -> Self {
        self.duration = duration;
        self
    }
}

#[derive(Debug, Clone)]
enum BrowserBehavior {
    Measure(BrowserMeasurement),
    Fail(CheckException),
    /// Time out this many times, then measure
    Flaky(u32, BrowserMeasurement),
}

#[derive(Debug, Clone, Default)]
pub struct FakeWeb {
    ipv4: BTreeMap<String, Vec<String>>,
    ipv6: BTreeMap<String, Vec<String>>,
    pages: BTreeMap<String, FakePage>,
    redirects: BTreeMap<String, (u16, String)>,
    failures: BTreeMap<String, CheckException>,
    certificates: BTreeMap<String, CertificateInfo>,
    browser: BTreeMap<String, BrowserBehavior>,
    green_hosts: BTreeSet<String>,
    green_lookup_down: bool,
    browser_attempts: Arc<Mutex<BTreeMap<String, u32>>>,
}

impl FakeWeb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(mut self, hostname: &str, ipv4: &[&str]) -> Self {
        self.ipv4.insert(
            hostname.to_string(),
            ipv4.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    pub fn host_v6(mut self, hostname: &str, ipv6: &[&str]) -> Self {
        self.ipv6.insert(
            hostname.to_string(),
            ipv6.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    pub fn page(self, url: &str, status: u16, body: &str) -> Self {
        self.serve(url, FakePage::html(status, body))
    }

    pub fn serve(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn redirect(mut self, from: &str, status: u16, to: &str) -> Self {
        self.redirects
            .insert(from.to_string(), (status, to.to_string()));
        self
    }

    /// Every request to `url` fails with `exception`.
    pub fn failure(mut self, url: &str, exception: CheckException) -> Self {
        self.failures.insert(url.to_string(), exception);
        self
    }

    pub fn certificate(mut self, host: &str, info: CertificateInfo) -> Self {
        self.certificates.insert(host.to_string(), info);
        self
    }

    pub fn browser(mut self, url: &str, measurement: BrowserMeasurement) -> Self {
        self.browser
            .insert(url.to_string(), BrowserBehavior::Measure(measurement));
        self
    }

    pub fn browser_failure(mut self, url: &str, exception: CheckException) -> Self {
        self.browser
            .insert(url.to_string(), BrowserBehavior::Fail(exception));
        self
    }

    /// The browser times out `failures` times before measuring `url`.
    pub fn flaky_browser(
        mut self,
        url: &str,
        failures: u32,
        measurement: BrowserMeasurement,
    ) -> Self {
        self.browser
            .insert(url.to_string(), BrowserBehavior::Flaky(failures, measurement));
        self
    }

    pub fn green(mut self, hostname: &str) -> Self {
        self.green_hosts.insert(hostname.to_string());
        self
    }

    pub fn green_lookup_down(mut self) -> Self {
        self.green_lookup_down = true;
        self
    }

    /// Serve the same page for `http`/`https` with and without `www.`.
    pub fn site(self, domain: &str, ip: &str, body: &str) -> Self {
        let www = format!("www.{}", domain);
        let mut web = self.host(domain, &[ip]).host(&www, &[ip]);
        for scheme in ["http", "https"] {
            for host in [domain, www.as_str()] {
                web = web.page(&format!("{}://{}/", scheme, host), 200, body);
            }
        }
        web
    }

    /// How often the browser was asked to load `url`.
    pub fn browser_attempts(&self, url: &str) -> u32 {
        self.browser_attempts
            .lock()
            .map(|attempts| attempts.get(url).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn collaborators(&self) -> Collaborators {
        let web = Arc::new(self.clone());
        Collaborators {
            fetcher: web.clone(),
            prober: web.clone(),
            resolver: web.clone(),
            certificates: web.clone(),
            similarity: Arc::new(StructuralSimilarity::default()),
            browser: web.clone(),
            feeds: web.clone(),
            green_power: web,
        }
    }

    /// Follow redirects from `url`. Returns the chain and the final URL, or
    /// the failure that stopped the walk.
    #[allow(clippy::type_complexity)]
    fn walk(
        &self,
        url: &str,
    ) -> Result<(Vec<RedirectHop>, String), (Vec<RedirectHop>, CheckException)> {
        let mut chain = Vec::new();
        let mut current = url.to_string();
        for _ in 0..=MAX_REDIRECTS {
            if let Some(exception) = self.failures.get(&current) {
                return Err((chain, exception.clone()));
            }
            match self.redirects.get(&current) {
                Some((status, target)) => {
                    chain.push(RedirectHop {
                        status: *status,
                        duration: 10,
                        redirect_to: target.clone(),
                    });
                    current = target.clone();
                }
                None => return Ok((chain, current)),
            }
        }
        Err((
            chain,
            CheckException::new(ExceptionKind::Other, "too many redirects"),
        ))
    }

    fn refused(url: &str) -> CheckException {
        CheckException::connection(format!("connection refused: {}", url))
    }
}

impl ContentFetcher for FakeWeb {
    fn fetch(&self, url: &str, _user_agent: &str, _timeouts: Timeouts) -> FetchResponse {
        let (_, final_url) = match self.walk(url) {
            Ok(walked) => walked,
            Err((_, exception)) => return FetchResponse::failed(url, exception),
        };
        match self.pages.get(&final_url) {
            Some(page) => FetchResponse {
                final_url,
                status: Some(page.status),
                headers: page.headers.clone(),
                body: Some(page.body.clone()),
                duration: Some(page.duration),
                exception: None,
            },
            None => FetchResponse::failed(url, Self::refused(&final_url)),
        }
    }
}

impl ReachabilityProbe for FakeWeb {
    fn probe(&self, url: &str, _user_agent: &str) -> ProbeResponse {
        let (chain, final_url) = match self.walk(url) {
            Ok(walked) => walked,
            Err((chain, exception)) => return ProbeResponse::failed(url, chain, exception),
        };
        match self.pages.get(&final_url) {
            Some(page) => ProbeResponse {
                final_url,
                status: Some(page.status),
                duration: Some(page.duration),
                redirect_chain: chain,
                exception: None,
            },
            None => ProbeResponse::failed(url, chain, Self::refused(&final_url)),
        }
    }
}

impl DnsResolver for FakeWeb {
    fn resolve(&self, hostname: &str) -> Resolution {
        resolution(self.ipv4.get(hostname))
    }

    fn resolve_ipv6(&self, hostname: &str) -> Resolution {
        resolution(self.ipv6.get(hostname))
    }
}

fn resolution(addresses: Option<&Vec<String>>) -> Resolution {
    let addresses = addresses.cloned().unwrap_or_default();
    Resolution {
        resolvable: !addresses.is_empty(),
        addresses,
        aliases: Vec::new(),
    }
}

impl CertificateSource for FakeWeb {
    fn get_certificate(&self, host: &str, _port: u16) -> Result<CertificateInfo, CheckException> {
        self.certificates.get(host).cloned().ok_or_else(|| {
            CheckException::new(ExceptionKind::Tls, format!("handshake with {} failed", host))
        })
    }
}

impl FeedSource for FakeWeb {
    fn parse_feed(&self, url: &str, user_agent: &str) -> FeedDocument {
        let response = self.fetch(url, user_agent, Timeouts {
            connect: std::time::Duration::ZERO,
            read: std::time::Duration::ZERO,
        });
        match (response.exception, response.body) {
            (Some(exception), _) => FeedDocument::failed(None, exception),
            (None, Some(body)) => parse_feed_document(response.status, &body),
            (None, None) => FeedDocument::failed(response.status, CheckException::parse("empty")),
        }
    }
}

impl Browser for FakeWeb {
    fn load_and_measure(
        &self,
        url: &str,
        viewports: &[Viewport],
    ) -> Result<BrowserMeasurement, CheckException> {
        let attempt = match self.browser_attempts.lock() {
            Ok(mut attempts) => {
                let count = attempts.entry(url.to_string()).or_insert(0);
                *count += 1;
                *count
            }
            Err(_) => 1,
        };
        match self.browser.get(url) {
            Some(BrowserBehavior::Measure(m)) => Ok(fit_viewports(m, viewports)),
            Some(BrowserBehavior::Fail(e)) => Err(e.clone()),
            Some(BrowserBehavior::Flaky(failures, m)) if attempt > *failures => {
                Ok(fit_viewports(m, viewports))
            }
            Some(BrowserBehavior::Flaky(..)) => Err(CheckException::new(
                ExceptionKind::ReadTimeout,
                "page load timed out",
            )),
            None => Err(CheckException::unavailable("headless browser")),
        }
    }
}

/// Measurements registered without sizes report the viewport width as document width.
fn fit_viewports(measurement: &BrowserMeasurement, viewports: &[Viewport]) -> BrowserMeasurement {
    let mut measurement = measurement.clone();
    if measurement.sizes.is_empty() {
        measurement.sizes = viewports
            .iter()
            .map(|v| crate::collaborators::browser::ViewportWidth {
                viewport_width: v.width,
                document_width: v.width,
            })
            .collect();
    }
    measurement
}

impl GreenPowerLookup for FakeWeb {
    fn is_green(&self, hostname: &str) -> Result<bool, CheckException> {
        if self.green_lookup_down {
            return Err(CheckException::connection("green check API unreachable"));
        }
        Ok(self.green_hosts.contains(hostname))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_follows_redirect_chain() {
        let web = FakeWeb::new()
            .redirect("http://example.com/", 301, "https://example.com/")
            .page("https://example.com/", 200, "<html></html>");
        let res = web.probe("http://example.com/", "test");
        assert_eq!(res.final_url, "https://example.com/");
        assert_eq!(res.status, Some(200));
        assert_eq!(res.redirect_chain.len(), 1);
        assert_eq!(res.redirect_chain[0].redirect_to, "https://example.com/");
    }

    #[test]
    fn test_unknown_url_is_refused() {
        let res = FakeWeb::new().probe("http://nowhere.example/", "test");
        assert_eq!(res.exception.unwrap().kind, ExceptionKind::Connection);
    }

    #[test]
    fn test_flaky_browser_counts_attempts() {
        let web =
            FakeWeb::new().flaky_browser("https://example.com/", 1, BrowserMeasurement::default());
        let services = web.collaborators();
        assert!(services.browser.load_and_measure("https://example.com/", &[]).is_err());
        assert!(services.browser.load_and_measure("https://example.com/", &[]).is_ok());
        assert_eq!(web.browser_attempts("https://example.com/"), 2);
    }
}

//! Blocking HTTP collaborators built on `reqwest`.
//!
//! One [`HttpClient`] serves page fetches, reachability probes, feed
//! downloads and green-power lookups. Probes use a second client with
//! redirects disabled so every hop of a chain can be recorded.

use super::feed::{parse_feed_document, FeedDocument};
use super::{
    ContentFetcher, FeedSource, FetchResponse, GreenPowerLookup, ProbeResponse,
    ReachabilityProbe, Timeouts,
};
use crate::config::SiteRateConfig;
use crate::errors::{CheckException, ExceptionKind, PipelineError};
use crate::results::RedirectHop;
use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, LOCATION, USER_AGENT};
use reqwest::redirect::Policy;
use std::collections::BTreeMap;
use std::time::Instant;
use url::Url;

const MAX_REDIRECTS: usize = 10;

pub struct HttpClient {
    client: Client,
    probe_client: Client,
    timeouts: Timeouts,
    green_power_endpoint: String,
}

impl HttpClient {
    pub fn new(config: &SiteRateConfig) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.read_timeout())
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PipelineError::Collaborator(format!("http client: {}", e)))?;
        let probe_client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.probe_timeout())
            .redirect(Policy::none())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PipelineError::Collaborator(format!("probe client: {}", e)))?;

        Ok(Self {
            client,
            probe_client,
            timeouts: config.timeouts(),
            green_power_endpoint: config.green_power_endpoint.clone(),
        })
    }

    fn get(
        &self,
        url: &str,
        user_agent: &str,
        timeouts: Timeouts,
    ) -> Result<Response, CheckException> {
        self.client
            .get(url)
            .header(USER_AGENT, user_agent)
            .timeout(timeouts.read)
            .send()
            .map_err(|e| classify(&e))
    }
}

impl ContentFetcher for HttpClient {
    fn fetch(&self, url: &str, user_agent: &str, timeouts: Timeouts) -> FetchResponse {
        let started = Instant::now();
        let response = match self.get(url, user_agent, timeouts) {
            Ok(response) => response,
            Err(exception) => return FetchResponse::failed(url, exception),
        };

        let final_url = response.url().to_string();
        let status = response.status().as_u16();
        let headers = lowercase_headers(response.headers());
        match response.text() {
            Ok(body) => FetchResponse {
                final_url,
                status: Some(status),
                headers,
                body: Some(body),
                duration: Some(elapsed_ms(started)),
                exception: None,
            },
            Err(e) => FetchResponse::failed(url, classify(&e)),
        }
    }
}

impl ReachabilityProbe for HttpClient {
    fn probe(&self, url: &str, user_agent: &str) -> ProbeResponse {
        let mut current = url.to_string();
        let mut chain = Vec::new();

        for _ in 0..=MAX_REDIRECTS {
            let started = Instant::now();
            let response = match self
                .probe_client
                .head(&current)
                .header(USER_AGENT, user_agent)
                .send()
            {
                Ok(response) => response,
                Err(e) => return ProbeResponse::failed(url, chain, classify(&e)),
            };
            let duration = elapsed_ms(started);
            let status = response.status();

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok());
            match (status.is_redirection(), location) {
                (true, Some(location)) => {
                    let target = resolve_location(&current, location);
                    debug!("{} redirects to {} ({})", current, target, status);
                    chain.push(RedirectHop {
                        status: status.as_u16(),
                        duration,
                        redirect_to: target.clone(),
                    });
                    current = target;
                }
                _ => {
                    return ProbeResponse {
                        final_url: current,
                        status: Some(status.as_u16()),
                        duration: Some(duration),
                        redirect_chain: chain,
                        exception: None,
                    }
                }
            }
        }

        ProbeResponse::failed(
            url,
            chain,
            CheckException::new(
                ExceptionKind::Other,
                format!("more than {} redirects", MAX_REDIRECTS),
            ),
        )
    }
}

impl FeedSource for HttpClient {
    fn parse_feed(&self, url: &str, user_agent: &str) -> FeedDocument {
        let response = self.fetch(url, user_agent, self.timeouts);
        match (response.exception, response.body) {
            (Some(exception), _) => FeedDocument::failed(response.status, exception),
            (None, Some(body)) => parse_feed_document(response.status, &body),
            (None, None) => FeedDocument::failed(
                response.status,
                CheckException::parse("feed response had no body"),
            ),
        }
    }
}

impl GreenPowerLookup for HttpClient {
    fn is_green(&self, hostname: &str) -> Result<bool, CheckException> {
        let url = format!("{}{}", self.green_power_endpoint, hostname);
        let response = self.get(&url, USER_AGENT_GREEN_CHECK, self.timeouts)?;
        let body: serde_json::Value = response
            .json()
            .map_err(|e| CheckException::parse(format!("green check response: {}", e)))?;
        Ok(body
            .get("green")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false))
    }
}

const USER_AGENT_GREEN_CHECK: &str = concat!("siterate/", env!("CARGO_PKG_VERSION"));

/// Absolute target of a `Location` header, resolved against the requesting URL.
fn resolve_location(current: &str, location: &str) -> String {
    Url::parse(current)
        .and_then(|base| base.join(location))
        .map(|target| target.to_string())
        .unwrap_or_else(|_| location.to_string())
}

fn lowercase_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_ascii_lowercase(),
                value.to_str().unwrap_or("").to_string(),
            )
        })
        .collect()
}

fn classify(error: &reqwest::Error) -> CheckException {
    let kind = if error.is_timeout() && error.is_connect() {
        ExceptionKind::ConnectionTimeout
    } else if error.is_timeout() {
        ExceptionKind::ReadTimeout
    } else if error.is_connect() {
        ExceptionKind::Connection
    } else if error.is_decode() || error.is_body() {
        ExceptionKind::Parse
    } else {
        ExceptionKind::Other
    };
    CheckException::new(kind, error.to_string())
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

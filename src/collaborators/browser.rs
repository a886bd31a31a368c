//! Headless-browser measurements.
//!
//! A browser loads a page once per configured viewport and reports what it
//! saw: document widths, console errors, cookies, fonts and the raw network
//! events. The check turns one [`BrowserMeasurement`] into a
//! [`crate::results::BrowserRecord`].

use crate::config::Viewport;
use crate::errors::CheckException;
use serde::{Deserialize, Serialize};

/// Document width observed at one viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportWidth {
    pub viewport_width: u32,
    pub document_width: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleLogEntry {
    /// `WARNING` or `SEVERE`; lower levels are not recorded
    pub level: String,
    pub source: String,
    pub message: String,
}

impl ConsoleLogEntry {
    pub fn is_network(&self) -> bool {
        self.source == "network"
    }

    pub fn is_script(&self) -> bool {
        self.source == "javascript"
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Domain the cookie is scoped to, possibly with a leading dot
    pub host_key: String,
    pub name: String,
    pub path: String,
    pub is_secure: bool,
    pub is_httponly: bool,
}

/// One `Network.*` event from the browser's performance log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceEvent {
    pub method: String,
    /// Set on `Network.loadingFinished`
    pub encoded_data_length: Option<u64>,
}

pub const LOADING_FINISHED: &str = "Network.loadingFinished";
pub const REQUEST_WILL_BE_SENT: &str = "Network.requestWillBeSent";

/// Everything one page load produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowserMeasurement {
    pub sizes: Vec<ViewportWidth>,
    pub logs: Vec<ConsoleLogEntry>,
    pub font_families: Vec<String>,
    pub cookies: Vec<Cookie>,
    pub performance_log: Vec<PerformanceEvent>,
}

pub trait Browser: Send + Sync {
    fn load_and_measure(
        &self,
        url: &str,
        viewports: &[Viewport],
    ) -> Result<BrowserMeasurement, CheckException>;
}

/// Sum of encoded bytes and count of issued requests over a performance log.
pub fn network_totals(events: &[PerformanceEvent]) -> (u64, u64) {
    events.iter().fold((0, 0), |(payload, requests), event| {
        match event.method.as_str() {
            LOADING_FINISHED => (payload + event.encoded_data_length.unwrap_or(0), requests),
            REQUEST_WILL_BE_SENT => (payload, requests + 1),
            _ => (payload, requests),
        }
    })
}

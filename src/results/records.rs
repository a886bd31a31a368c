//! Per-check result records.
//!
//! Most checks produce one record per URL. Records carry an `exception` field
//! for per-item failures; a record without an exception does not imply the URL
//! survived the check, survival is decided by the working set alone.

use crate::collaborators::browser::{ConsoleLogEntry, Cookie, PerformanceEvent, ViewportWidth};
use crate::errors::CheckException;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// DNS facts for one URL's hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub hostname: String,
    /// Either address family resolved
    pub resolvable: bool,
    pub resolvable_ipv4: bool,
    pub resolvable_ipv6: bool,
    pub aliases: Vec<String>,
    pub ipv4_addresses: Vec<String>,
    pub ipv6_addresses: Vec<String>,
}

impl DnsRecord {
    pub fn unresolvable(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            resolvable: false,
            resolvable_ipv4: false,
            resolvable_ipv6: false,
            aliases: Vec::new(),
            ipv4_addresses: Vec::new(),
            ipv6_addresses: Vec::new(),
        }
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.ipv4_addresses
            .iter()
            .chain(self.ipv6_addresses.iter())
            .map(String::as_str)
    }
}

/// One hop of a redirect chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    pub status: u16,
    /// Milliseconds
    pub duration: u64,
    pub redirect_to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachabilityRecord {
    pub url: String,
    pub status: Option<u16>,
    /// Milliseconds, final hop only
    pub duration: Option<u64>,
    pub redirect_history: Vec<RedirectHop>,
    pub exception: Option<CheckException>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    pub serial_number: Option<String>,
    pub subject: Option<BTreeMap<String, String>>,
    pub issuer: Option<BTreeMap<String, String>>,
    /// RFC 3339
    pub not_before: Option<String>,
    /// RFC 3339
    pub not_after: Option<String>,
    pub exception: Option<CheckException>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContentRecord {
    /// Effective URL after redirects
    pub url: String,
    /// Stripped from the report once rating is done
    pub content: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<usize>,
    pub status_code: Option<u16>,
    /// Header names lower-cased
    pub response_headers: Option<BTreeMap<String, String>>,
    pub duration: Option<u64>,
    pub exception: Option<CheckException>,
}

/// Similarity of one unordered URL pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityRecord {
    pub similarity: Option<f64>,
    pub exception: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharsetRecord {
    pub meta_charset_tag: Option<String>,
    pub content_type_header_charset: Option<String>,
    pub charset: String,
    /// `None` when the charset is not one we can verify
    pub valid: Option<bool>,
    pub exception: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HtmlHeadRecord {
    pub title: Option<String>,
    pub link_canonical: Option<String>,
    pub link_rss_atom: Option<Vec<String>>,
    pub link_icon: Option<String>,
    pub generator: Option<String>,
    pub opengraph: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramesetRecord {
    pub frameset: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub href: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperlinksRecord {
    pub links: Vec<Hyperlink>,
    pub exception: Option<CheckException>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaviconRecord {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    pub title: Option<String>,
    pub num_entries: Option<usize>,
    pub first_entry: Option<DateTime<Utc>>,
    pub latest_entry: Option<DateTime<Utc>>,
    /// Seconds between entries, on average
    pub average_interval: Option<i64>,
    pub exception: Option<CheckException>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserRecord {
    pub sizes: Vec<ViewportWidth>,
    pub min_document_width: Option<u32>,
    /// Console entries of level WARNING or SEVERE
    pub logs: Vec<ConsoleLogEntry>,
    pub font_families: Option<Vec<String>>,
    pub cookies: Option<Vec<Cookie>>,
    /// Raw events; folded into the two totals below and dropped by the post hook
    pub performance_log: Option<Vec<PerformanceEvent>>,
    /// Bytes transferred (encoded) for the page load
    pub network_payload: Option<u64>,
    pub network_requests: Option<u64>,
    pub exception: Option<CheckException>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreenPowerRecord {
    pub green: bool,
    pub exception: Option<CheckException>,
}

//! The result store: named, typed check outputs accumulated during one run.
//!
//! Entries are keyed by [`CheckName`] and kept in execution order. The store
//! is append-only while a pipeline runs; only the driver writes to it, right
//! after a check returns (and again if the check's post hook replaces the
//! value). Checks and raters read it through the typed accessors, e.g.
//! [`ResultStore::dns_resolution`].

pub mod records;

pub use records::*;

use crate::errors::PipelineError;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Identity of a check, and the key of its entry in the [`ResultStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckName {
    DomainVariations,
    HttpAndHttps,
    DnsResolution,
    UrlReachability,
    Certificate,
    UrlCanonicalization,
    PageContent,
    DuplicateContent,
    Charset,
    HtmlHead,
    Frameset,
    Hyperlinks,
    Generator,
    LoadFavicons,
    LoadFeeds,
    LoadInBrowser,
    GreenPower,
}

impl CheckName {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DomainVariations => "domain_variations",
            Self::HttpAndHttps => "http_and_https",
            Self::DnsResolution => "dns_resolution",
            Self::UrlReachability => "url_reachability",
            Self::Certificate => "certificate",
            Self::UrlCanonicalization => "url_canonicalization",
            Self::PageContent => "page_content",
            Self::DuplicateContent => "duplicate_content",
            Self::Charset => "charset",
            Self::HtmlHead => "html_head",
            Self::Frameset => "frameset",
            Self::Hyperlinks => "hyperlinks",
            Self::Generator => "generator",
            Self::LoadFavicons => "load_favicons",
            Self::LoadFeeds => "load_feeds",
            Self::LoadInBrowser => "load_in_browser",
            Self::GreenPower => "green_power",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one check. Map keys are URLs unless noted otherwise.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CheckOutput {
    /// Expanders report nothing; serialized as `null`
    Empty,
    DnsResolution(BTreeMap<String, DnsRecord>),
    UrlReachability(BTreeMap<String, ReachabilityRecord>),
    Certificate(BTreeMap<String, CertificateRecord>),
    /// The canonical URL list
    UrlCanonicalization(Vec<String>),
    PageContent(BTreeMap<String, PageContentRecord>),
    /// Keyed by the sorted URL pair joined with a space
    DuplicateContent(BTreeMap<String, SimilarityRecord>),
    Charset(BTreeMap<String, CharsetRecord>),
    HtmlHead(BTreeMap<String, HtmlHeadRecord>),
    Frameset(BTreeMap<String, FramesetRecord>),
    Hyperlinks(BTreeMap<String, HyperlinksRecord>),
    Generator(BTreeMap<String, Option<String>>),
    LoadFavicons(BTreeMap<String, FaviconRecord>),
    /// Keyed by feed URL
    LoadFeeds(BTreeMap<String, FeedRecord>),
    LoadInBrowser(BTreeMap<String, BrowserRecord>),
    GreenPower(BTreeMap<String, GreenPowerRecord>),
}

impl CheckOutput {
    /// `Empty` and empty collections count as "no evidence".
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::DnsResolution(m) => m.is_empty(),
            Self::UrlReachability(m) => m.is_empty(),
            Self::Certificate(m) => m.is_empty(),
            Self::UrlCanonicalization(v) => v.is_empty(),
            Self::PageContent(m) => m.is_empty(),
            Self::DuplicateContent(m) => m.is_empty(),
            Self::Charset(m) => m.is_empty(),
            Self::HtmlHead(m) => m.is_empty(),
            Self::Frameset(m) => m.is_empty(),
            Self::Hyperlinks(m) => m.is_empty(),
            Self::Generator(m) => m.is_empty(),
            Self::LoadFavicons(m) => m.is_empty(),
            Self::LoadFeeds(m) => m.is_empty(),
            Self::LoadInBrowser(m) => m.is_empty(),
            Self::GreenPower(m) => m.is_empty(),
        }
    }
}

/// Named check outputs in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    entries: Vec<(CheckName, CheckOutput)>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry. Names are unique per run.
    pub fn insert(&mut self, name: CheckName, output: CheckOutput) -> Result<(), PipelineError> {
        if self.contains(name) {
            return Err(PipelineError::Misconfigured(format!(
                "result for {} recorded twice",
                name
            )));
        }
        self.entries.push((name, output));
        Ok(())
    }

    /// Replace an existing entry in place, keeping its position.
    pub(crate) fn replace(&mut self, name: CheckName, output: CheckOutput) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = output;
        }
    }

    pub fn get(&self, name: CheckName) -> Option<&CheckOutput> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, output)| output)
    }

    pub fn contains(&self, name: CheckName) -> bool {
        self.get(name).is_some()
    }

    /// Present and non-empty.
    pub fn is_satisfied(&self, name: CheckName) -> bool {
        self.get(name).is_some_and(|output| !output.is_empty())
    }

    pub fn names(&self) -> impl Iterator<Item = CheckName> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (CheckName, &CheckOutput)> {
        self.entries.iter().map(|(name, output)| (*name, output))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop downloaded page bodies. Only done on a finished run, before persisting.
    pub(crate) fn strip_page_bodies(&mut self) {
        for (name, output) in &mut self.entries {
            if let (CheckName::PageContent, CheckOutput::PageContent(pages)) = (*name, output) {
                for page in pages.values_mut() {
                    page.content = None;
                }
            }
        }
    }
}

macro_rules! typed_accessors {
    ($($method:ident => $variant:ident : $ty:ty),* $(,)?) => {
        impl ResultStore {
            $(
                pub fn $method(&self) -> Option<&$ty> {
                    match self.get(CheckName::$variant) {
                        Some(CheckOutput::$variant(value)) => Some(value),
                        _ => None,
                    }
                }
            )*
        }
    };
}

typed_accessors! {
    dns_resolution => DnsResolution: BTreeMap<String, DnsRecord>,
    url_reachability => UrlReachability: BTreeMap<String, ReachabilityRecord>,
    certificate => Certificate: BTreeMap<String, CertificateRecord>,
    url_canonicalization => UrlCanonicalization: Vec<String>,
    page_content => PageContent: BTreeMap<String, PageContentRecord>,
    duplicate_content => DuplicateContent: BTreeMap<String, SimilarityRecord>,
    charset => Charset: BTreeMap<String, CharsetRecord>,
    html_head => HtmlHead: BTreeMap<String, HtmlHeadRecord>,
    frameset => Frameset: BTreeMap<String, FramesetRecord>,
    hyperlinks => Hyperlinks: BTreeMap<String, HyperlinksRecord>,
    generator => Generator: BTreeMap<String, Option<String>>,
    load_favicons => LoadFavicons: BTreeMap<String, FaviconRecord>,
    load_feeds => LoadFeeds: BTreeMap<String, FeedRecord>,
    load_in_browser => LoadInBrowser: BTreeMap<String, BrowserRecord>,
    green_power => GreenPower: BTreeMap<String, GreenPowerRecord>,
}

impl Serialize for ResultStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, output) in &self.entries {
            map.serialize_entry(name.as_str(), output)?;
        }
        map.end()
    }
}

//! The checks, and the order they run in.
//!
//! Expanders come first so every variant of the site is known before the
//! pruners narrow the set. Content-dependent observers come after
//! `page_content`, and `load_feeds` after `html_head`.

mod certificate;
mod charset;
mod dns_resolution;
mod domain_variations;
mod duplicate_content;
mod frameset;
mod generator;
mod green_power;
mod html_head;
mod http_and_https;
mod hyperlinks;
mod load_favicons;
mod load_feeds;
mod load_in_browser;
mod page_content;
mod url_canonicalization;
mod url_reachability;

pub use certificate::Certificate;
pub use charset::Charset;
pub use dns_resolution::DnsResolution;
pub use domain_variations::DomainVariations;
pub use duplicate_content::{select_url_to_reject, DuplicateContent};
pub use frameset::Frameset;
pub use generator::{detect_generator, Generator};
pub use green_power::GreenPower;
pub use html_head::HtmlHead;
pub use http_and_https::HttpAndHttps;
pub use hyperlinks::Hyperlinks;
pub use load_favicons::LoadFavicons;
pub use load_feeds::LoadFeeds;
pub use load_in_browser::LoadInBrowser;
pub use page_content::PageContent;
pub use url_canonicalization::UrlCanonicalization;
pub use url_reachability::UrlReachability;

use crate::errors::PipelineError;
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::results::{CheckName, PageContentRecord, ResultStore};
use url::Url;

/// The full battery, in execution order.
pub fn default_pipeline() -> Pipeline {
    PipelineBuilder::new()
        .check(DomainVariations)
        .check(HttpAndHttps)
        .check(DnsResolution)
        .check(UrlReachability)
        .check(Certificate)
        .check(UrlCanonicalization)
        .check(PageContent)
        .check(DuplicateContent)
        .check(Charset)
        .check(HtmlHead)
        .check(Frameset)
        .check(Hyperlinks)
        .check(Generator)
        .check(LoadFavicons)
        .check(LoadFeeds)
        .check(LoadInBrowser)
        .check(GreenPower)
        .build()
}

pub(crate) fn hostname(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// The downloaded page for `url`. Content observers only see URLs that
/// survived `page_content`, so a missing entry is a pipeline defect.
pub(crate) fn downloaded_page<'a>(
    results: &'a ResultStore,
    check: CheckName,
    url: &str,
) -> Result<&'a PageContentRecord, PipelineError> {
    results
        .page_content()
        .and_then(|pages| pages.get(url))
        .ok_or_else(|| PipelineError::missing_result(check, CheckName::PageContent, url))
}

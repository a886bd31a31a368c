//! Minimal RSS/Atom reading: enough to count entries and date them.

use crate::errors::CheckException;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedDocument {
    pub status: Option<u16>,
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
    pub exception: Option<CheckException>,
}

impl FeedDocument {
    pub fn failed(status: Option<u16>, exception: CheckException) -> Self {
        Self {
            status,
            exception: Some(exception),
            ..Default::default()
        }
    }
}

static FEED_ROOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<(rss|feed|rdf:RDF)[\s>]").expect("valid regex"));
static ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(item|entry)[\s>].*?</(item|entry)>").expect("valid regex"));
static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));
static PUB_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(pubDate|dc:date)>(.*?)</(pubDate|dc:date)>").expect("valid regex"));
static ATOM_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<(published|updated)>(.*?)</(published|updated)>").expect("valid regex"));
static CDATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("valid regex"));

/// Interpret a downloaded feed body.
pub fn parse_feed_document(status: Option<u16>, body: &str) -> FeedDocument {
    if !FEED_ROOT.is_match(body) {
        return FeedDocument::failed(status, CheckException::parse("not an RSS or Atom document"));
    }

    // The channel title precedes the first item.
    let head = ITEM.find(body).map_or(body, |m| &body[..m.start()]);
    let title = TITLE
        .captures(head)
        .map(|c| clean_text(&c[1]))
        .filter(|t| !t.is_empty());

    let entries = ITEM
        .find_iter(body)
        .map(|item| FeedEntry {
            published: entry_date(item.as_str()),
        })
        .collect();

    FeedDocument {
        status,
        title,
        entries,
        exception: None,
    }
}

fn entry_date(item: &str) -> Option<DateTime<Utc>> {
    if let Some(c) = PUB_DATE.captures(item) {
        let text = clean_text(&c[2]);
        return DateTime::parse_from_rfc2822(&text)
            .or_else(|_| DateTime::parse_from_rfc3339(&text))
            .ok()
            .map(|d| d.with_timezone(&Utc));
    }
    ATOM_DATE.captures(item).and_then(|c| {
        DateTime::parse_from_rfc3339(&clean_text(&c[2]))
            .ok()
            .map(|d| d.with_timezone(&Utc))
    })
}

fn clean_text(raw: &str) -> String {
    let unwrapped = CDATA.replace_all(raw, "$1");
    unwrapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

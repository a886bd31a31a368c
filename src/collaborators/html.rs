//! Lightweight markup extraction.
//!
//! These helpers scan HTML with regular expressions instead of building a DOM.
//! They are tolerant by construction: malformed markup yields fewer matches,
//! never an error. Relative links are resolved against the page URL with
//! [`url::Url::join`].

use crate::results::{HtmlHeadRecord, Hyperlink};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

static HEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<head(?:\s[^>]*)?>(.*?)(?:</head\s*>|<body[\s>]|\z)").expect("valid regex")
});
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<([a-zA-Z][a-zA-Z0-9:-]*)((?:\s[^>]*)?)/?>").expect("valid regex")
});
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
        .expect("valid regex")
});
static TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title(?:\s[^>]*)?>(.*?)</title\s*>").expect("valid regex"));
static ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<a(\s[^>]*)?>(.*?)</a\s*>").expect("valid regex"));
static FRAMESET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<frameset[\s>/]").expect("valid regex"));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)(?:\s[^>]*)?>.*?</(script|style)\s*>").expect("valid regex")
});

/// A start tag with lower-cased name and attribute names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
}

impl Tag {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn attr_eq_ignore_case(&self, name: &str, expected: &str) -> bool {
        self.attr(name)
            .is_some_and(|value| value.trim().eq_ignore_ascii_case(expected))
    }
}

fn parse_attributes(raw: &str) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    for c in ATTRIBUTE.captures_iter(raw) {
        let name = c[1].to_ascii_lowercase();
        let value = c
            .get(2)
            .or_else(|| c.get(3))
            .or_else(|| c.get(4))
            .map_or("", |m| m.as_str());
        // First occurrence wins, as in browsers
        attributes.entry(name).or_insert_with(|| value.to_string());
    }
    attributes
}

/// All start tags in document order. Comments, scripts and styles are skipped.
pub fn tags(html: &str) -> Vec<Tag> {
    let cleaned = strip_invisible(html);
    TAG.captures_iter(&cleaned)
        .map(|c| Tag {
            name: c[1].to_ascii_lowercase(),
            attributes: parse_attributes(&c[2]),
        })
        .collect()
}

fn strip_invisible(html: &str) -> String {
    let without_comments = COMMENT.replace_all(html, "");
    SCRIPT_OR_STYLE
        .replace_all(&without_comments, "")
        .into_owned()
}

fn text_content(fragment: &str) -> String {
    let text = ANY_TAG.replace_all(fragment, " ");
    decode_entities(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

fn absolute(page_url: &str, href: &str) -> String {
    Url::parse(page_url)
        .and_then(|base| base.join(href.trim()))
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// The `<head>` section, if the document has one.
fn head_section(html: &str) -> Option<&str> {
    HEAD.captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Facts from the document head. All fields are `None` without a `<head>`.
pub fn extract_head(html: &str, page_url: &str) -> HtmlHeadRecord {
    let Some(head) = head_section(html) else {
        return HtmlHeadRecord::default();
    };
    let head_tags = tags(head);
    let links: Vec<&Tag> = head_tags.iter().filter(|t| t.name == "link").collect();

    let title = TITLE.captures(head).map(|c| {
        decode_entities(&c[1])
            .replace('\u{a0}', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    });

    let link_canonical = links
        .iter()
        .find(|t| t.attr_eq_ignore_case("rel", "canonical"))
        .and_then(|t| t.attr("href"))
        .map(|href| absolute(page_url, href));

    let feeds: Vec<String> = links
        .iter()
        .filter(|t| {
            t.attr_eq_ignore_case("type", "application/rss+xml")
                || t.attr_eq_ignore_case("type", "application/atom+xml")
        })
        .filter_map(|t| t.attr("href"))
        .map(|href| absolute(page_url, href))
        .collect();

    let link_icon = ["icon", "shortcut icon"].iter().find_map(|rel| {
        links
            .iter()
            .find(|t| t.attr_eq_ignore_case("rel", rel))
            .and_then(|t| t.attr("href"))
            .map(|href| absolute(page_url, href))
    });

    let generator = head_tags
        .iter()
        .find(|t| t.name == "meta" && t.attr_eq_ignore_case("name", "generator"))
        .and_then(|t| t.attr("content"))
        .map(str::to_string);

    let opengraph: BTreeSet<String> = head_tags
        .iter()
        .flat_map(|t| [t.attr("property"), t.attr("itemprop")])
        .flatten()
        .filter(|value| value.starts_with("og:"))
        .map(str::to_string)
        .collect();

    HtmlHeadRecord {
        title,
        link_canonical,
        link_rss_atom: Some(feeds),
        link_icon,
        generator,
        opengraph: (!opengraph.is_empty()).then(|| opengraph.into_iter().collect()),
    }
}

/// Lower-cased value of the last `<meta charset>` in the document.
pub fn extract_meta_charset(html: &str) -> Option<String> {
    tags(html)
        .iter()
        .filter(|t| t.name == "meta")
        .filter_map(|t| t.attr("charset"))
        .last()
        .map(|charset| charset.trim().to_ascii_lowercase())
}

/// Lower-cased `charset` parameter of a `Content-Type` header value.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    let lower = content_type.to_ascii_lowercase();
    let (_, rest) = lower.split_once("charset=")?;
    let value = rest
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .trim_matches(|c| c == '"' || c == '\'');
    (!value.is_empty()).then(|| value.to_string())
}

pub fn has_frameset(html: &str) -> bool {
    FRAMESET.is_match(&strip_invisible(html))
}

/// Every `<a>` element with its raw `href` and visible text.
pub fn extract_links(html: &str) -> Vec<Hyperlink> {
    let cleaned = strip_invisible(html);
    ANCHOR
        .captures_iter(&cleaned)
        .map(|c| {
            let href = c
                .get(1)
                .map(|attrs| parse_attributes(attrs.as_str()))
                .and_then(|attrs| attrs.get("href").cloned());
            Hyperlink {
                href,
                text: text_content(&c[2]),
            }
        })
        .collect()
}

/// Tag names in document order; the structure used for similarity.
pub fn tag_sequence(html: &str) -> Vec<String> {
    tags(html).into_iter().map(|t| t.name).collect()
}

/// Distinct class names used anywhere in the document.
pub fn class_names(html: &str) -> BTreeSet<String> {
    tags(html)
        .iter()
        .filter_map(|t| t.attr("class"))
        .flat_map(|classes| classes.split_whitespace())
        .map(str::to_string)
        .collect()
}

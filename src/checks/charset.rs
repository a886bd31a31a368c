use super::downloaded_page;
use crate::collaborators::html::{charset_from_content_type, extract_meta_charset};
use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CharsetRecord, CheckName, CheckOutput};
use std::collections::BTreeMap;

/// Determines the declared character set of every page and whether the
/// content fits it.
pub struct Charset;

impl Check for Charset {
    fn name(&self) -> CheckName {
        CheckName::Charset
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Observer
    }

    fn depends_on_results(&self) -> &'static [CheckName] {
        &[CheckName::PageContent]
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let mut records = BTreeMap::new();
        for url in ctx.urls.list() {
            let page = downloaded_page(ctx.results, self.name(), url)?;
            let Some(content) = page.content.as_deref() else {
                continue;
            };
            let header = page
                .response_headers
                .as_ref()
                .and_then(|headers| headers.get("content-type"))
                .and_then(|value| charset_from_content_type(value));
            records.insert(
                url.to_string(),
                charset_record(content, header, &ctx.config.default_charset),
            );
        }
        Ok(CheckOutput::Charset(records))
    }
}

/// The header overrides the default, a `<meta charset>` overrides the header.
fn charset_record(content: &str, header: Option<String>, default: &str) -> CharsetRecord {
    let meta = extract_meta_charset(content);
    let charset = meta
        .clone()
        .or_else(|| header.clone())
        .unwrap_or_else(|| default.to_ascii_lowercase());

    let (valid, exception) = match charset.as_str() {
        "utf-8" => (Some(true), None),
        "iso-8859-1" => match content.char_indices().find(|(_, c)| u32::from(*c) > 0xff) {
            Some((position, c)) => (
                Some(false),
                Some(format!(
                    "character {:?} at position {} cannot be encoded as iso-8859-1",
                    c, position
                )),
            ),
            None => (Some(true), None),
        },
        _ => (None, None),
    };

    CharsetRecord {
        meta_charset_tag: meta,
        content_type_header_charset: header,
        charset,
        valid,
        exception,
    }
}

use super::downloaded_page;
use crate::collaborators::html::extract_head;
use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput};
use std::collections::BTreeMap;

/// Extracts title, canonical link, feed links, icon, generator and
/// OpenGraph properties from every page head.
pub struct HtmlHead;

impl Check for HtmlHead {
    fn name(&self) -> CheckName {
        CheckName::HtmlHead
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
            if let Some(content) = page.content.as_deref() {
                records.insert(url.to_string(), extract_head(content, url));
            }
        }
        Ok(CheckOutput::HtmlHead(records))
    }
}

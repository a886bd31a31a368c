use super::downloaded_page;
use crate::collaborators::html::has_frameset;
use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput, FramesetRecord};
use std::collections::BTreeMap;

pub struct Frameset;

impl Check for Frameset {
    fn name(&self) -> CheckName {
        CheckName::Frameset
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
            let frameset = page.content.as_deref().is_some_and(has_frameset);
            records.insert(url.to_string(), FramesetRecord { frameset });
        }
        Ok(CheckOutput::Frameset(records))
    }
}

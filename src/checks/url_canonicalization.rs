use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput};

/// Records the URLs left after expansion and pruning.
pub struct UrlCanonicalization;

impl Check for UrlCanonicalization {
    fn name(&self) -> CheckName {
        CheckName::UrlCanonicalization
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Observer
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        Ok(CheckOutput::UrlCanonicalization(ctx.urls.snapshot()))
    }
}

use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput};

/// Adds the other-scheme counterpart of every URL.
pub struct HttpAndHttps;

impl Check for HttpAndHttps {
    fn name(&self) -> CheckName {
        CheckName::HttpAndHttps
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Expander
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        for url in ctx.urls.snapshot() {
            if let Some(counterpart) = swap_scheme(&url) {
                ctx.urls.add(counterpart);
            }
        }
        Ok(CheckOutput::Empty)
    }
}

fn swap_scheme(url: &str) -> Option<String> {
    if let Some(rest) = url.strip_prefix("https://") {
        Some(format!("http://{}", rest))
    } else {
        url.strip_prefix("http://")
            .map(|rest| format!("https://{}", rest))
    }
}

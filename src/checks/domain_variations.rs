use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput};
use log::debug;
use url::Url;

/// Adds the `www.` toggled variant of every URL.
pub struct DomainVariations;

impl Check for DomainVariations {
    fn name(&self) -> CheckName {
        CheckName::DomainVariations
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Expander
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        for url in ctx.urls.snapshot() {
            if let Some(variant) = toggle_www(&url) {
                debug!("Adding domain variation {}", variant);
                ctx.urls.add(variant);
            }
        }
        Ok(CheckOutput::Empty)
    }
}

/// `url` with `www.` removed from, or prepended to, its hostname.
/// IP literals have no variants.
fn toggle_www(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    let domain = parsed.domain()?.to_string();
    let toggled = match domain.strip_prefix("www.") {
        Some(bare) if !bare.is_empty() => bare.to_string(),
        Some(_) => return None,
        None => format!("www.{}", domain),
    };
    parsed.set_host(Some(&toggled)).ok()?;
    Some(parsed.to_string())
}

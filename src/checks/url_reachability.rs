use super::hostname;
use crate::errors::{CheckException, ExceptionKind, PipelineError};
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput, ReachabilityRecord};
use log::{debug, info};
use std::collections::BTreeMap;

/// Probes every URL, collapses redirects onto their targets and drops URLs
/// that cannot be reached or that end up on a blocked host.
pub struct UrlReachability;

impl Check for UrlReachability {
    fn name(&self) -> CheckName {
        CheckName::UrlReachability
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Pruner
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let mut records = BTreeMap::new();

        for url in ctx.urls.snapshot() {
            debug!("Checking reachability of {}", url);
            let response = ctx.services.prober.probe(&url, ctx.user_agent());
            let mut record = ReachabilityRecord {
                url: url.clone(),
                status: response.status,
                duration: response.duration,
                redirect_history: response.redirect_chain,
                exception: response.exception,
            };

            if let Some(exception) = &record.exception {
                info!("{} is unreachable: {}", url, exception);
                ctx.urls.remove(&url);
            } else if response.final_url != url {
                debug!("{} redirects to {}", url, response.final_url);
                ctx.urls.remove(&url);
                ctx.urls.add(response.final_url.clone());
            }

            if let Some(target) = blocked_target(ctx, &record) {
                info!("{} redirects to blocked host {}", url, target);
                record.exception = Some(CheckException::new(
                    ExceptionKind::BadTargetDomain,
                    format!(
                        "The URL redirects to {}, which does not qualify as an owned website",
                        target
                    ),
                ));
                ctx.urls.remove(&url);
                ctx.urls.remove(&response.final_url);
            }

            records.insert(url, record);
        }

        Ok(CheckOutput::UrlReachability(records))
    }
}

/// Host of the last redirect target, when it is on the block list.
fn blocked_target(ctx: &CheckContext<'_>, record: &ReachabilityRecord) -> Option<String> {
    let last = record.redirect_history.last()?;
    let host = hostname(&last.redirect_to)?;
    ctx.config.is_blocked_redirect_host(&host).then_some(host)
}

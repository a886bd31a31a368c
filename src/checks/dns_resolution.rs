use super::hostname;
use crate::collaborators::DnsResolver;
use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput, DnsRecord};
use log::debug;
use std::collections::BTreeMap;

/// Resolves every hostname and drops URLs whose host resolves in neither
/// address family.
pub struct DnsResolution;

impl Check for DnsResolution {
    fn name(&self) -> CheckName {
        CheckName::DnsResolution
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Pruner
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let resolver = ctx.services.resolver.as_ref();
        let mut by_host: BTreeMap<String, DnsRecord> = BTreeMap::new();
        let mut records = BTreeMap::new();

        for url in ctx.urls.snapshot() {
            let record = match hostname(&url) {
                Some(host) => by_host
                    .entry(host.clone())
                    .or_insert_with(|| resolve_host(resolver, &host))
                    .clone(),
                None => DnsRecord::unresolvable(""),
            };
            if !record.resolvable {
                debug!("{} does not resolve, removing {}", record.hostname, url);
                ctx.urls.remove(&url);
            }
            records.insert(url, record);
        }
        Ok(CheckOutput::DnsResolution(records))
    }
}

fn resolve_host(resolver: &dyn DnsResolver, host: &str) -> DnsRecord {
    let (v4, v6) = resolver.resolve_both(host);
    let mut aliases = v4.aliases;
    for alias in v6.aliases {
        if !aliases.contains(&alias) {
            aliases.push(alias);
        }
    }
    DnsRecord {
        hostname: host.to_string(),
        resolvable: v4.resolvable || v6.resolvable,
        resolvable_ipv4: v4.resolvable,
        resolvable_ipv6: v6.resolvable,
        aliases,
        ipv4_addresses: v4.addresses,
        ipv6_addresses: v6.addresses,
    }
}

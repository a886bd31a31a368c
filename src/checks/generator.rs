use super::downloaded_page;
use crate::errors::PipelineError;
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CheckName, CheckOutput, DnsRecord};
use std::collections::BTreeMap;

/// Fingerprints the CMS (and for some, the theme or hosting flavour) behind
/// every page.
pub struct Generator;

impl Check for Generator {
    fn name(&self) -> CheckName {
        CheckName::Generator
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Observer
    }

    fn depends_on_results(&self) -> &'static [CheckName] {
        &[
            CheckName::PageContent,
            CheckName::HtmlHead,
            CheckName::DnsResolution,
        ]
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let heads = ctx.results.html_head();
        let dns = ctx.results.dns_resolution();
        let mut records = BTreeMap::new();

        for url in ctx.urls.list() {
            let page = downloaded_page(ctx.results, self.name(), url)?;
            let meta = heads
                .and_then(|heads| heads.get(url))
                .and_then(|head| head.generator.as_deref());
            let generator = detect_generator(
                meta,
                page.content.as_deref().unwrap_or(""),
                dns.and_then(|dns| dns.get(url)),
                &ctx.config.generator.gcms_ip,
            );
            records.insert(url.to_string(), generator);
        }

        Ok(CheckOutput::Generator(records))
    }
}

/// Well-known generator names, matched as substrings of the lower-cased meta tag.
const KNOWN_GENERATORS: [&str; 4] = ["typo3", "wordpress", "drupal", "joomla"];

/// Markers in the page body and the generator they identify, in priority order.
const CONTENT_MARKERS: [(&[&str], &str); 7] = [
    (&["blum-o-matic"], "wordpress-blumomatic"),
    (&["gruenes-internet.de"], "wordpress-gruenes-internet"),
    (&["Urwahl3000", "/themes/urwahl3000"], "wordpress-urwahl"),
    (&["/themes/sunflower"], "wordpress-sunflower"),
    (
        &["josephknowsbest", "Joseph-knows-best"],
        "wordpress-josephknowsbest",
    ),
    (&["wordpress"], "wordpress"),
    (&["jimdo"], "jimdo"),
];

pub fn detect_generator(
    meta: Option<&str>,
    content: &str,
    dns: Option<&DnsRecord>,
    gcms_ip: &str,
) -> Option<String> {
    let generator = meta.map(|raw| {
        let lower = raw.to_lowercase();
        KNOWN_GENERATORS
            .iter()
            .rev()
            .find(|known| lower.contains(*known))
            .map_or(lower, |known| known.to_string())
    });

    if generator.as_deref() == Some("typo3") {
        let flavour = if content.contains("typo3-gruene.de") {
            "typo3-gruene"
        } else if content.contains("ntc_gcms")
            || dns.is_some_and(|record| record.ipv4_addresses.iter().any(|ip| ip == gcms_ip))
        {
            "typo3-gcms"
        } else {
            "typo3"
        };
        return Some(flavour.to_string());
    }

    CONTENT_MARKERS
        .iter()
        .find(|(markers, _)| markers.iter().any(|marker| content.contains(marker)))
        .map(|(_, name)| name.to_string())
        .or(generator)
}

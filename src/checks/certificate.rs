use crate::errors::{CheckException, PipelineError};
use crate::pipeline::{Check, CheckContext, CheckKind};
use crate::results::{CertificateRecord, CheckName, CheckOutput};
use chrono::SecondsFormat;
use log::debug;
use std::collections::BTreeMap;
use url::Url;

/// Reads the server certificate of every `https://` URL.
pub struct Certificate;

impl Check for Certificate {
    fn name(&self) -> CheckName {
        CheckName::Certificate
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Observer
    }

    fn run(&self, ctx: &mut CheckContext<'_>) -> Result<CheckOutput, PipelineError> {
        let mut records = BTreeMap::new();
        for url in ctx.urls.list() {
            let Ok(parsed) = Url::parse(url) else {
                continue;
            };
            if parsed.scheme() != "https" {
                continue;
            }
            let record = match parsed.host_str() {
                Some(host) => {
                    let port = parsed.port_or_known_default().unwrap_or(443);
                    certificate_record(ctx, host, port)
                }
                None => CertificateRecord {
                    exception: Some(CheckException::parse(format!("{} has no host", url))),
                    ..Default::default()
                },
            };
            records.insert(url.to_string(), record);
        }
        Ok(CheckOutput::Certificate(records))
    }
}

fn certificate_record(ctx: &CheckContext<'_>, host: &str, port: u16) -> CertificateRecord {
    match ctx.services.certificates.get_certificate(host, port) {
        Ok(info) => CertificateRecord {
            serial_number: Some(info.serial_number),
            subject: Some(info.subject),
            issuer: Some(info.issuer),
            not_before: Some(info.not_before.to_rfc3339_opts(SecondsFormat::Secs, true)),
            not_after: Some(info.not_after.to_rfc3339_opts(SecondsFormat::Secs, true)),
            exception: None,
        },
        Err(exception) => {
            debug!("No certificate for {}:{}: {}", host, port, exception);
            CertificateRecord {
                exception: Some(exception),
                ..Default::default()
            }
        }
    }
}

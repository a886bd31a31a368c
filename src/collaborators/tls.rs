use super::{CertificateInfo, CertificateSource, Timeouts};
use crate::errors::{CheckException, ExceptionKind};
use chrono::{DateTime, NaiveDateTime, Utc};
use openssl::asn1::Asn1TimeRef;
use openssl::error::ErrorStack;
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode};
use openssl::x509::X509NameRef;
use std::collections::BTreeMap;
use std::net::{TcpStream, ToSocketAddrs};

/// Reads the peer certificate with a plain TLS handshake.
///
/// Verification is off: expired or mismatched certificates are exactly what
/// the report should show, so they must not abort the handshake.
#[derive(Debug, Clone, Copy)]
pub struct OpensslCertificates {
    timeouts: Timeouts,
}

impl OpensslCertificates {
    pub fn new(timeouts: Timeouts) -> Self {
        Self { timeouts }
    }
}

impl CertificateSource for OpensslCertificates {
    fn get_certificate(&self, host: &str, port: u16) -> Result<CertificateInfo, CheckException> {
        let addr = (host, port)
            .to_socket_addrs()
            .map_err(|e| CheckException::new(ExceptionKind::Dns, e.to_string()))?
            .next()
            .ok_or_else(|| {
                CheckException::new(ExceptionKind::Dns, format!("no address for {}", host))
            })?;

        let stream = TcpStream::connect_timeout(&addr, self.timeouts.connect)
            .map_err(|e| CheckException::connection(e.to_string()))?;
        stream
            .set_read_timeout(Some(self.timeouts.read))
            .and_then(|_| stream.set_write_timeout(Some(self.timeouts.read)))
            .map_err(|e| CheckException::connection(e.to_string()))?;

        let mut builder = SslConnector::builder(SslMethod::tls()).map_err(tls_error)?;
        builder.set_verify(SslVerifyMode::NONE);
        let connector = builder.build();
        let tls = connector
            .connect(host, stream)
            .map_err(|e| CheckException::new(ExceptionKind::Tls, e.to_string()))?;

        let cert = tls.ssl().peer_certificate().ok_or_else(|| {
            CheckException::new(ExceptionKind::Tls, "server presented no certificate")
        })?;
        let serial_number = cert
            .serial_number()
            .to_bn()
            .and_then(|bn| bn.to_dec_str().map(|s| s.to_string()))
            .map_err(tls_error)?;

        Ok(CertificateInfo {
            serial_number,
            subject: name_entries(cert.subject_name()),
            issuer: name_entries(cert.issuer_name()),
            not_before: asn1_to_utc(cert.not_before())?,
            not_after: asn1_to_utc(cert.not_after())?,
        })
    }
}

fn tls_error(e: ErrorStack) -> CheckException {
    CheckException::new(ExceptionKind::Tls, e.to_string())
}

/// Short attribute names (`CN`, `O`, `C`, ...) mapped to their values.
fn name_entries(name: &X509NameRef) -> BTreeMap<String, String> {
    name.entries()
        .filter_map(|entry| {
            let key = entry.object().nid().short_name().ok()?;
            let value = entry.data().as_utf8().ok()?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

fn asn1_to_utc(time: &Asn1TimeRef) -> Result<DateTime<Utc>, CheckException> {
    parse_asn1_display(&time.to_string())
}

/// OpenSSL prints times as `Jun  7 00:00:00 2018 GMT`.
fn parse_asn1_display(text: &str) -> Result<DateTime<Utc>, CheckException> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&normalized, "%b %d %H:%M:%S %Y GMT")
        .map(|naive| naive.and_utc())
        .map_err(|e| CheckException::parse(format!("certificate time {:?}: {}", text, e)))
}

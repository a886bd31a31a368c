use super::{Rater, RatingRecord};
use crate::config::RatingConfig;
use crate::results::{CheckName, ResultStore};

/// At least one hostname has an IPv4 address.
pub struct DnsResolvableIpv4;

impl Rater for DnsResolvableIpv4 {
    fn criterion(&self) -> &'static str {
        "DNS_RESOLVABLE_IPV4"
    }

    fn depends_on_checks(&self) -> &'static [CheckName] {
        &[CheckName::DnsResolution]
    }

    fn rate(&self, results: &ResultStore, _config: &RatingConfig) -> RatingRecord {
        let value = results
            .dns_resolution()
            .is_some_and(|records| records.values().any(|r| r.resolvable_ipv4));
        RatingRecord::boolean(value, self.max_score())
    }
}

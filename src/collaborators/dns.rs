use super::{DnsResolver, Resolution};
use log::{debug, warn};
use std::net::{IpAddr, ToSocketAddrs};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Resolver backed by the operating system's name service.
///
/// The system resolver exposes neither CNAME aliases nor per-family queries,
/// so one lookup is split by address family and `aliases` stays empty.
/// `getaddrinfo` cannot be cancelled, so each lookup runs on its own thread
/// and is abandoned once `timeout` has passed.
#[derive(Debug, Clone, Copy)]
pub struct SystemResolver {
    timeout: Duration,
}

impl SystemResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn lookup(&self, hostname: &str) -> Vec<IpAddr> {
        let (tx, rx) = mpsc::channel();
        let host = hostname.to_string();
        thread::spawn(move || {
            let result = (host.as_str(), 0u16)
                .to_socket_addrs()
                .map(|addrs| addrs.map(|addr| addr.ip()).collect::<Vec<_>>());
            let _ = tx.send(result);
        });

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(addresses)) => addresses,
            Ok(Err(e)) => {
                debug!("Lookup of {} failed: {}", hostname, e);
                Vec::new()
            }
            Err(_) => {
                warn!("Lookup of {} timed out after {:?}", hostname, self.timeout);
                Vec::new()
            }
        }
    }
}

impl Default for SystemResolver {
    fn default() -> Self {
        Self::new(Duration::from_secs(10))
    }
}

fn resolution(addresses: &[IpAddr], family: fn(&IpAddr) -> bool) -> Resolution {
    let mut found: Vec<String> = Vec::new();
    for ip in addresses.iter().filter(|ip| family(ip)) {
        let text = ip.to_string();
        if !found.contains(&text) {
            found.push(text);
        }
    }
    Resolution {
        resolvable: !found.is_empty(),
        addresses: found,
        aliases: Vec::new(),
    }
}

impl DnsResolver for SystemResolver {
    fn resolve(&self, hostname: &str) -> Resolution {
        resolution(&self.lookup(hostname), IpAddr::is_ipv4)
    }

    fn resolve_ipv6(&self, hostname: &str) -> Resolution {
        resolution(&self.lookup(hostname), IpAddr::is_ipv6)
    }

    fn resolve_both(&self, hostname: &str) -> (Resolution, Resolution) {
        let addresses = self.lookup(hostname);
        (
            resolution(&addresses, IpAddr::is_ipv4),
            resolution(&addresses, IpAddr::is_ipv6),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv6Addr;

    #[test]
    fn test_localhost_literal_resolves_to_itself() {
        let resolver = SystemResolver::default();
        let res = resolver.resolve("127.0.0.1");
        assert!(res.resolvable);
        assert_eq!(res.addresses, vec!["127.0.0.1".to_string()]);
        assert!(!resolver.resolve_ipv6("127.0.0.1").resolvable);
    }

    #[test]
    fn test_invalid_hostname_is_unresolvable() {
        let res = SystemResolver::default().resolve("not a hostname.invalid");
        assert!(!res.resolvable);
        assert!(res.addresses.is_empty());
    }

    #[test]
    fn test_resolve_both_splits_one_lookup_by_family() {
        let (v4, v6) = SystemResolver::default().resolve_both("127.0.0.1");
        assert!(v4.resolvable);
        assert_eq!(v4.addresses, vec!["127.0.0.1".to_string()]);
        assert!(!v6.resolvable);
    }

    #[test]
    fn test_resolution_deduplicates_and_filters_family() {
        let addresses = vec![
            IpAddr::from([192, 0, 2, 10]),
            IpAddr::from(Ipv6Addr::LOCALHOST),
            IpAddr::from([192, 0, 2, 10]),
        ];
        let v4 = resolution(&addresses, IpAddr::is_ipv4);
        assert_eq!(v4.addresses, vec!["192.0.2.10".to_string()]);
        let v6 = resolution(&addresses, IpAddr::is_ipv6);
        assert_eq!(v6.addresses, vec!["::1".to_string()]);
    }
}

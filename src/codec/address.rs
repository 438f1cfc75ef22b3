/// Textual forms of the IPv6 loopback address. Anything starting with one
/// of these (zone suffixes included) counts as loopback.
const IPV6_LOOPBACK: [&str; 2] = ["::1", "0:0:0:0:0:0:0:1"];

/// Maps a client address to something the gateway accepts.
///
/// The gateway only understands IPv4. Empty input, IPv6 loopback and any
/// other IPv6 address collapse to `fallback`; no translation between the
/// address families is attempted. Everything else passes through unchanged.
pub fn normalize_ip(ip: &str, fallback: &str) -> String {
    let ip = ip.trim();
    if ip.is_empty() || is_ipv6_loopback(ip) || is_ipv6(ip) {
        return fallback.to_string();
    }
    ip.to_string()
}

fn is_ipv6_loopback(ip: &str) -> bool {
    IPV6_LOOPBACK.iter().any(|lo| ip.starts_with(lo))
}

fn is_ipv6(ip: &str) -> bool {
    ip.contains(':') && !ip.contains('.')
}

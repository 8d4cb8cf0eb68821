//! Address validation for feed entries.
//!
//! Two layers are provided:
//! - [`is_ipv4`] / [`is_ipv6`] - pattern checks applied to every feed entry
//! - [`parse_network`] - strict parsing with `ipnet`, used for diagnostics
//!
//! The IPv6 pattern is a loose shape check. It accepts prefixes up to three
//! digits and does not enforce RFC 4291 group counts, so a full eight-group
//! address is rejected while some malformed ones pass. Entries are forwarded
//! to the router verbatim, which performs its own parsing.

use ipnet::IpNet;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

static IPV4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)(?:/[0-9]{1,2})?$",
    )
    .expect("IPv4 pattern is valid")
});

static IPV6_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9a-fA-F]{1,4}:){1,7}(:[0-9a-fA-F]{1,4}|:)(?:/[0-9]{1,3})?$")
        .expect("IPv6 pattern is valid")
});

/// Signature shared by the per-family validators.
pub type Validator = fn(&str) -> bool;

/// Address family of a feed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    #[value(name = "v4")]
    V4,
    #[value(name = "v6")]
    V6,
}

impl AddressFamily {
    /// Families in processing order.
    pub const ALL: [AddressFamily; 2] = [AddressFamily::V4, AddressFamily::V6];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressFamily::V4 => "v4",
            AddressFamily::V6 => "v6",
        }
    }

    /// RouterOS menu holding this family's firewall.
    pub fn command_path(&self) -> &'static str {
        match self {
            AddressFamily::V4 => "/ip",
            AddressFamily::V6 => "/ipv6",
        }
    }

    pub fn validator(&self) -> Validator {
        match self {
            AddressFamily::V4 => is_ipv4,
            AddressFamily::V6 => is_ipv6,
        }
    }

    pub fn validate(&self, candidate: &str) -> bool {
        (self.validator())(candidate)
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dotted-quad IPv4 address with an optional one or two digit prefix.
///
/// # Examples
/// ```
/// use rosdrop::validation::is_ipv4;
/// assert!(is_ipv4("192.0.2.0/24"));
/// assert!(!is_ipv4("256.0.0.0"));
/// ```
pub fn is_ipv4(candidate: &str) -> bool {
    IPV4_PATTERN.is_match(candidate)
}

/// Loosely shaped IPv6 address with an optional prefix of up to three digits.
///
/// # Examples
/// ```
/// use rosdrop::validation::is_ipv6;
/// assert!(is_ipv6("2001:db8::/32"));
/// assert!(!is_ipv6("192.0.2.1"));
/// ```
pub fn is_ipv6(candidate: &str) -> bool {
    IPV6_PATTERN.is_match(candidate)
}

/// Strictly parse an IP address or CIDR into an [`IpNet`].
///
/// A bare address becomes a /32 (IPv4) or /128 (IPv6) network.
pub fn parse_network(candidate: &str) -> Option<IpNet> {
    if candidate.contains('/') {
        candidate.parse().ok()
    } else {
        candidate.parse::<IpAddr>().ok().map(IpNet::from)
    }
}

use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// IPv4 network in `a.b.c.d/prefix` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cidr {
    address: Ipv4Addr,
    prefix: u8,
}

impl Cidr {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingField { field: "cidr" });
        }

        let (address, prefix) = raw.split_once('/').ok_or_else(|| ValidationError::InvalidCidr {
            value: raw.to_owned(),
        })?;

        let prefix = prefix
            .parse::<u8>()
            .ok()
            .filter(|prefix| *prefix <= 32)
            .ok_or_else(|| ValidationError::PrefixOutOfRange {
                prefix: prefix.to_owned(),
            })?;

        let octets: Vec<&str> = address.split('.').collect();
        if octets.len() != 4 {
            return Err(ValidationError::InvalidCidr {
                value: raw.to_owned(),
            });
        }
        let mut parsed = [0_u8; 4];
        for (slot, octet) in parsed.iter_mut().zip(&octets) {
            let well_formed = !octet.is_empty() && octet.len() <= 3 && octet.bytes().all(|b| b.is_ascii_digit());
            *slot = well_formed
                .then(|| octet.parse::<u8>().ok())
                .flatten()
                .ok_or_else(|| ValidationError::InvalidOctet {
                    value: (*octet).to_owned(),
                })?;
        }

        Ok(Self {
            address: Ipv4Addr::from(parsed),
            prefix,
        })
    }

    pub const fn prefix(self) -> u8 {
        self.prefix
    }

    pub fn mask(self) -> u32 {
        u32::MAX.checked_shl(32 - u32::from(self.prefix)).unwrap_or(0)
    }

    pub fn network(self) -> u32 {
        u32::from(self.address) & self.mask()
    }

    pub fn broadcast(self) -> u32 {
        self.network() | !self.mask()
    }

    /// Computes the subnet summary. `/31` and `/32` have no reserved
    /// addresses: first/last host are the network and broadcast addresses.
    pub fn summarize(self) -> SubnetInfo {
        let network = self.network();
        let broadcast = self.broadcast();
        let size = 1_u64 << (32 - u32::from(self.prefix));

        let (first_host, last_host, usable_hosts) = if self.prefix >= 31 {
            (network, broadcast, size)
        } else {
            (network + 1, broadcast - 1, size - 2)
        };

        SubnetInfo {
            cidr: self.to_string(),
            network: Ipv4Addr::from(network),
            broadcast: Ipv4Addr::from(broadcast),
            mask: Ipv4Addr::from(self.mask()),
            prefix: self.prefix,
            first_host: Ipv4Addr::from(first_host),
            last_host: Ipv4Addr::from(last_host),
            usable_hosts,
        }
    }
}

impl Display for Cidr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetInfo {
    pub cidr: String,
    pub network: Ipv4Addr,
    pub broadcast: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub prefix: u8,
    pub first_host: Ipv4Addr,
    pub last_host: Ipv4Addr,
    pub usable_hosts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(raw: &str) -> SubnetInfo {
        Cidr::parse(raw).expect("valid cidr").summarize()
    }

    #[test]
    fn host_ranges_stay_inside_the_network() {
        for prefix in 0..=32 {
            let info = summary(&format!("172.16.33.77/{prefix}"));
            let (network, broadcast) = (u32::from(info.network), u32::from(info.broadcast));
            let (first, last) = (u32::from(info.first_host), u32::from(info.last_host));
            assert!(network <= first && first <= last && last <= broadcast, "prefix {prefix}");

            let expected = match prefix {
                31 => 2,
                32 => 1,
                _ => (1_u64 << (32 - prefix)) - 2,
            };
            assert_eq!(info.usable_hosts, expected, "prefix {prefix}");
        }
    }

    #[test]
    fn point_to_point_and_host_routes() {
        let p2p = summary("10.0.0.5/31");
        assert_eq!(p2p.first_host, Ipv4Addr::new(10, 0, 0, 4));
        assert_eq!(p2p.last_host, Ipv4Addr::new(10, 0, 0, 5));

        let host = summary("10.0.0.5/32");
        assert_eq!(host.network, Ipv4Addr::new(10, 0, 0, 5));
        assert_eq!(host.usable_hosts, 1);
    }

    #[test]
    fn zero_prefix_covers_everything() {
        let all = summary("8.8.8.8/0");
        assert_eq!(all.mask, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(all.broadcast, Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(all.usable_hosts, 4_294_967_294);
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert!(matches!(Cidr::parse("10.0.0.0/33"), Err(ValidationError::PrefixOutOfRange { .. })));
        assert!(matches!(Cidr::parse("10.0.0.0/-1"), Err(ValidationError::PrefixOutOfRange { .. })));
        assert!(matches!(Cidr::parse("10.0.256.0/24"), Err(ValidationError::InvalidOctet { .. })));
        assert!(matches!(Cidr::parse("10.0.0/24"), Err(ValidationError::InvalidCidr { .. })));
        assert!(matches!(Cidr::parse("10.0.0.0"), Err(ValidationError::InvalidCidr { .. })));
        assert!(matches!(Cidr::parse(""), Err(ValidationError::MissingField { field: "cidr" })));
    }
}

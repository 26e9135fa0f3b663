//! Closed catalogue of gateway capabilities.
//!
//! Each variant knows its route, a human description for `/api/endpoints`,
//! and the providers it is statically wired to, in chain order.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ProviderId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Health,
    WebSearch,
    Weather,
    Timezone,
    Timezones,
    Geocode,
    ReverseGeocode,
    Ip,
    Phone,
    Dns,
    Ping,
    WeatherAlerts,
    Apod,
    NewsSearch,
    Time,
    Hash,
    Base64,
    Subnet,
    Whois,
    Asn,
    Crypto,
    Cve,
    Ssl,
    HttpStatus,
    Endpoints,
}

/// HTTP verb a capability is served on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

/// One row of the endpoint listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointDescriptor {
    pub method: Method,
    pub path: &'static str,
    pub description: &'static str,
}

impl Capability {
    pub const ALL: [Self; 25] = [
        Self::Health,
        Self::WebSearch,
        Self::Weather,
        Self::Timezone,
        Self::Timezones,
        Self::Geocode,
        Self::ReverseGeocode,
        Self::Ip,
        Self::Phone,
        Self::Dns,
        Self::Ping,
        Self::WeatherAlerts,
        Self::Apod,
        Self::NewsSearch,
        Self::Time,
        Self::Hash,
        Self::Base64,
        Self::Subnet,
        Self::Whois,
        Self::Asn,
        Self::Crypto,
        Self::Cve,
        Self::Ssl,
        Self::HttpStatus,
        Self::Endpoints,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::WebSearch => "web-search",
            Self::Weather => "weather",
            Self::Timezone => "timezone",
            Self::Timezones => "timezones",
            Self::Geocode => "geocode",
            Self::ReverseGeocode => "reverse-geocode",
            Self::Ip => "ip",
            Self::Phone => "phone",
            Self::Dns => "dns",
            Self::Ping => "ping",
            Self::WeatherAlerts => "weather-alerts",
            Self::Apod => "apod",
            Self::NewsSearch => "news-search",
            Self::Time => "time",
            Self::Hash => "hash",
            Self::Base64 => "base64",
            Self::Subnet => "subnet",
            Self::Whois => "whois",
            Self::Asn => "asn",
            Self::Crypto => "crypto",
            Self::Cve => "cve",
            Self::Ssl => "ssl",
            Self::HttpStatus => "http-status",
            Self::Endpoints => "endpoints",
        }
    }

    pub const fn method(self) -> Method {
        match self {
            Self::WebSearch | Self::Hash | Self::Base64 | Self::Subnet => Method::Post,
            _ => Method::Get,
        }
    }

    pub const fn path(self) -> &'static str {
        match self {
            Self::Health => "/health",
            Self::WebSearch => "/api/search",
            Self::Weather => "/api/weather/:location",
            Self::Timezone => "/api/timezone/:zone",
            Self::Timezones => "/api/timezones",
            Self::Geocode => "/api/geocode/:location",
            Self::ReverseGeocode => "/api/reverse-geocode/:lat/:lon",
            Self::Ip => "/api/ip/:ip?",
            Self::Phone => "/api/phone/:number",
            Self::Dns => "/api/dns/:hostname",
            Self::Ping => "/api/ping/:host",
            Self::WeatherAlerts => "/api/weather-alerts/:location",
            Self::Apod => "/api/apod",
            Self::NewsSearch => "/api/news/:query",
            Self::Time => "/api/time",
            Self::Hash => "/api/hash",
            Self::Base64 => "/api/base64",
            Self::Subnet => "/api/subnet",
            Self::Whois => "/api/whois/:domain",
            Self::Asn => "/api/asn/:ip",
            Self::Crypto => "/api/crypto/:symbol",
            Self::Cve => "/api/cve/:id",
            Self::Ssl => "/api/ssl/:hostname",
            Self::HttpStatus => "/api/http-status",
            Self::Endpoints => "/api/endpoints",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Health => "Health check",
            Self::WebSearch => "Web search. Body: {query, num_results?}",
            Self::Weather => "Get weather for location",
            Self::Timezone => "Get timezone info for an IANA zone such as Europe/London",
            Self::Timezones => "List all timezones",
            Self::Geocode => "Get coordinates for location",
            Self::ReverseGeocode => "Get location from coordinates",
            Self::Ip => "IP lookup (optional IP param, defaults to requester)",
            Self::Phone => {
                "Phone number validation, formatting, country, and type. Optional ?country=US hint \
                 for local numbers. Enriched with carrier/line type if NUMVERIFY_API_KEY is configured."
            }
            Self::Dns => "DNS lookup (A and AAAA)",
            Self::Ping => "Ping test",
            Self::WeatherAlerts => {
                "Get active weather alerts for location (NWS for US, wttr.in condition fallback)"
            }
            Self::Apod => "NASA Astronomy Picture of the Day",
            Self::NewsSearch => "News search. Query: num_results?",
            Self::Time => "Get current time",
            Self::Hash => "Hash text (md5/sha1/sha256/sha512). Body: {text, algorithm?}",
            Self::Base64 => "Base64 encode or decode. Body: {text, mode?}",
            Self::Subnet => "CIDR subnet calculator. Body: {cidr}",
            Self::Whois => "WHOIS/RDAP domain lookup",
            Self::Asn => "ASN/BGP info for an IP address",
            Self::Crypto => "Cryptocurrency price (BTC, ETH, etc.)",
            Self::Cve => "CVE vulnerability details from NVD",
            Self::Ssl => "TLS/SSL certificate info. Query: port? (default 443)",
            Self::HttpStatus => "Check if a URL is reachable. Query: url",
            Self::Endpoints => "List all endpoints",
        }
    }

    /// Upstreams behind this capability, in the order they are consulted.
    /// Local computations have none.
    pub const fn providers(self) -> &'static [ProviderId] {
        match self {
            Self::Health | Self::Endpoints | Self::Time | Self::Hash | Self::Base64 | Self::Subnet => &[],
            Self::WebSearch | Self::NewsSearch => &[ProviderId::Duckduckgo],
            Self::Weather => &[ProviderId::Wttr],
            Self::Timezone | Self::Timezones => &[ProviderId::Worldtime],
            Self::Geocode | Self::ReverseGeocode => &[ProviderId::Nominatim],
            Self::Ip => &[ProviderId::IpApi],
            Self::Phone => &[ProviderId::Libphonenumber, ProviderId::Numverify],
            Self::Dns => &[ProviderId::SystemDns],
            Self::Ping => &[ProviderId::SystemPing],
            Self::WeatherAlerts => &[ProviderId::Nominatim, ProviderId::Nws, ProviderId::Wttr],
            Self::Apod => &[ProviderId::Nasa],
            Self::Whois => &[ProviderId::Rdap],
            Self::Asn => &[ProviderId::Bgpview],
            Self::Crypto => &[ProviderId::Coingecko],
            Self::Cve => &[ProviderId::Nvd],
            Self::Ssl => &[ProviderId::TlsProbe],
            Self::HttpStatus => &[ProviderId::HttpProbe],
        }
    }

    pub const fn descriptor(self) -> EndpointDescriptor {
        EndpointDescriptor {
            method: self.method(),
            path: self.path(),
            description: self.description(),
        }
    }

    pub fn catalogue() -> Vec<EndpointDescriptor> {
        Self::ALL.into_iter().map(Self::descriptor).collect()
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

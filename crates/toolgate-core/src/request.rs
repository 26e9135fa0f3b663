//! Validated request inputs.
//!
//! Each type can only be built through its `parse` constructor, so a handler
//! holding one never re-checks format. All inputs are immutable once built.

use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::str::FromStr;

use phonenumber::PhoneNumber;
use reqwest::Url;

use crate::normalize::result_count;
use crate::ValidationError;

const MAX_LOCATION_CHARS: usize = 256;
const MAX_HOST_CHARS: usize = 253;
pub const DEFAULT_PHONE_REGION: &str = "US";
pub const DEFAULT_TLS_PORT: u16 = 443;

fn required(raw: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}

/// Free-form place name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(String);

impl Location {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = required(raw, "location")?;
        if value.chars().count() > MAX_LOCATION_CHARS || value.chars().any(char::is_control) {
            return Err(ValidationError::InvalidLocation { value });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host name or IP literal. Never starts with `-`, so it is safe to pass as a
/// command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostName(String);

impl HostName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = required(raw, "host")?;
        let invalid = || ValidationError::InvalidHost {
            value: value.clone(),
        };

        if value.len() > MAX_HOST_CHARS || value.starts_with(['-', '.']) {
            return Err(invalid());
        }
        if IpAddr::from_str(&value).is_ok() {
            return Ok(Self(value));
        }
        let labels_ok = value.trim_end_matches('.').split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && label
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });
        if !labels_ok {
            return Err(invalid());
        }
        Ok(Self(value.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<IpAddr> for HostName {
    fn from(ip: IpAddr) -> Self {
        Self(ip.to_string())
    }
}

impl Display for HostName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registrable domain name (at least two labels, no IP literals).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain(String);

impl Domain {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let host = HostName::parse(raw).map_err(|_| ValidationError::InvalidHost {
            value: raw.trim().to_owned(),
        })?;
        let value = host.0.trim_end_matches('.').to_owned();
        if IpAddr::from_str(&value).is_ok() || !value.contains('.') {
            return Err(ValidationError::InvalidHost { value });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        let in_range = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !in_range {
            return Err(ValidationError::InvalidCoordinates {
                lat: latitude.to_string(),
                lon: longitude.to_string(),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn parse(lat: &str, lon: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidCoordinates {
            lat: lat.to_owned(),
            lon: lon.to_owned(),
        };
        let latitude = lat.trim().parse::<f64>().map_err(|_| invalid())?;
        let longitude = lon.trim().parse::<f64>().map_err(|_| invalid())?;
        Self::new(latitude, longitude).map_err(|_| invalid())
    }
}

/// CVE identifier, upper-cased (`CVE-YYYY-NNNN+`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CveId(String);

impl CveId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = required(raw, "id")?.to_ascii_uppercase();
        let mut parts = value.splitn(3, '-');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some("CVE"), Some(year), Some(seq))
                if year.len() == 4
                    && year.chars().all(|c| c.is_ascii_digit())
                    && seq.len() >= 4
                    && seq.chars().all(|c| c.is_ascii_digit())
        );
        if !well_formed {
            return Err(ValidationError::InvalidCveId { value });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

const COIN_ALIASES: &[(&str, &str)] = &[
    ("btc", "bitcoin"),
    ("eth", "ethereum"),
    ("ltc", "litecoin"),
    ("doge", "dogecoin"),
    ("sol", "solana"),
    ("ada", "cardano"),
    ("xrp", "ripple"),
    ("bnb", "binancecoin"),
    ("matic", "matic-network"),
    ("dot", "polkadot"),
    ("link", "chainlink"),
    ("avax", "avalanche-2"),
    ("atom", "cosmos"),
    ("near", "near"),
    ("shib", "shiba-inu"),
];

/// Ticker symbol resolved to the price service's coin id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSymbol {
    symbol: String,
    id: String,
}

impl CoinSymbol {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let symbol = required(raw, "symbol")?.to_ascii_lowercase();
        let well_formed = symbol.len() <= 64
            && symbol
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !well_formed {
            return Err(ValidationError::InvalidSymbol { value: symbol });
        }

        let id = COIN_ALIASES
            .iter()
            .find(|(alias, _)| *alias == symbol)
            .map_or_else(|| symbol.clone(), |(_, id)| (*id).to_owned());
        Ok(Self { symbol, id })
    }

    /// Lower-case symbol as supplied.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Phone number parsed under a region hint.
#[derive(Debug, Clone)]
pub struct PhoneQuery {
    input: String,
    region: String,
    number: PhoneNumber,
}

impl PhoneQuery {
    /// Parses `input` using `region` (ISO 3166 alpha-2, default `US`) for
    /// numbers written without a leading `+`.
    pub fn parse(input: &str, region: Option<&str>) -> Result<Self, ValidationError> {
        let input = input.trim().to_owned();
        if input.is_empty() {
            return Err(ValidationError::UnparseablePhone {
                input,
                reason: String::from("number is empty"),
            });
        }

        let region = region
            .map(str::trim)
            .filter(|region| !region.is_empty())
            .unwrap_or(DEFAULT_PHONE_REGION)
            .to_ascii_uppercase();
        let hint = region.parse::<phonenumber::country::Id>().ok();

        let number = phonenumber::parse(hint, &input).map_err(|error| {
            ValidationError::UnparseablePhone {
                input: input.clone(),
                reason: error.to_string(),
            }
        })?;

        Ok(Self {
            input,
            region,
            number,
        })
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn number(&self) -> &PhoneNumber {
        &self.number
    }

    /// E.164 form without the leading `+`.
    pub fn e164_digits(&self) -> String {
        self.number
            .format()
            .mode(phonenumber::Mode::E164)
            .to_string()
            .trim_start_matches('+')
            .to_owned()
    }
}

/// Which results page a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Web,
    News,
}

/// Search terms plus the clamped number of wanted results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    query: String,
    limit: usize,
    kind: SearchKind,
}

impl SearchQuery {
    pub fn parse(raw: &str, num_results: Option<i64>, kind: SearchKind) -> Result<Self, ValidationError> {
        Ok(Self {
            query: required(raw, "query")?,
            limit: result_count(num_results),
            kind,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }

    pub const fn kind(&self) -> SearchKind {
        self.kind
    }
}

/// IANA zone name such as `Europe/London`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimezoneName(String);

impl TimezoneName {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = required(raw.trim_matches('/'), "timezone")?;
        let well_formed = !value.contains("..")
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '+'));
        if !well_formed {
            return Err(ValidationError::InvalidTimezone { value });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Absolute http(s) URL to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeUrl(Url);

impl ProbeUrl {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = required(raw, "url")?;
        let url = Url::parse(&value).map_err(|_| ValidationError::InvalidUrl {
            value: value.clone(),
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(ValidationError::InvalidUrl { value });
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Endpoint whose certificate is inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsTarget {
    pub host: HostName,
    pub port: u16,
}

impl TlsTarget {
    pub fn parse(host: &str, port: Option<&str>) -> Result<Self, ValidationError> {
        let host = HostName::parse(host)?;
        let port = match port.map(str::trim).filter(|port| !port.is_empty()) {
            None => DEFAULT_TLS_PORT,
            Some(raw) => raw
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .ok_or_else(|| ValidationError::InvalidPort {
                    value: raw.to_owned(),
                })?,
        };
        Ok(Self { host, port })
    }
}

/// Parses an IP literal.
pub fn parse_ip(raw: &str) -> Result<IpAddr, ValidationError> {
    let value = required(raw, "ip")?;
    IpAddr::from_str(&value).map_err(|_| ValidationError::InvalidIp { value })
}

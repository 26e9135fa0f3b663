use serde::{Deserialize, Serialize};

use crate::UtcDateTime;

/// IP geolocation and ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpInfo {
    pub ip: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub isp: Option<String>,
    pub org: Option<String>,
    #[serde(rename = "as")]
    pub autonomous_system: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsnInfo {
    pub asn: Option<u32>,
    pub asn_name: Option<String>,
    pub description: Option<String>,
    pub country: Option<String>,
    pub prefix: Option<String>,
    pub rir: Option<String>,
}

/// Registration data for a domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisRecord {
    pub domain: String,
    pub status: Vec<String>,
    pub registrar: Option<String>,
    pub created: Option<String>,
    pub expires: Option<String>,
    pub updated: Option<String>,
    pub nameservers: Vec<String>,
}

/// Leaf certificate presented by a TLS endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateInfo {
    pub valid: bool,
    pub subject_cn: Option<String>,
    pub issuer: Option<String>,
    pub issued: UtcDateTime,
    pub expires: UtcDateTime,
    pub days_remaining: i64,
    pub san: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpStatusReport {
    pub status: u16,
    pub status_text: Option<String>,
    pub server: Option<String>,
    pub content_type: Option<String>,
    pub latency_ms: u64,
    pub final_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingReport {
    pub alive: bool,
    pub output: Vec<String>,
}

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use super::{settle, Gateway, Reply};
use crate::adapters::IpLookup;
use crate::domain::{AsnInfo, CertificateInfo, HttpStatusReport, IpInfo, WhoisRecord};
use crate::provider::{invoke, ProviderOutcome};
use crate::request::{parse_ip, Domain, HostName, ProbeUrl, TlsTarget};
use crate::{CapabilityError, Envelope};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsResponse {
    pub hostname: String,
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub host: String,
    pub alive: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub output: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsnResponse {
    pub ip: String,
    #[serde(flatten)]
    pub info: AsnInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SslResponse {
    pub hostname: String,
    #[serde(flatten)]
    pub certificate: CertificateInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpStatusResponse {
    pub url: String,
    #[serde(flatten)]
    pub report: HttpStatusReport,
}

impl Gateway {
    /// Looks up `target`, or the caller's own address when no target is given.
    pub async fn ip(&self, target: Option<&str>, caller: Option<IpAddr>) -> Reply<IpInfo> {
        let target = match target.map(str::trim).filter(|target| !target.is_empty()) {
            Some(raw) => Some(HostName::parse(raw)?),
            None => caller.map(HostName::from),
        };

        let outcome = invoke(self.ip_lookup.as_ref(), &target).await;
        match settle(outcome, "IP lookup failed", || CapabilityError::not_found("IP not found"))? {
            IpLookup::Found(info) => Ok(Envelope::new(info)),
            IpLookup::Rejected(message) => Err(CapabilityError::rejected(message)),
        }
    }

    /// Resolves A and AAAA concurrently. Either side failing yields an empty list.
    pub async fn dns(&self, hostname: &str) -> Reply<DnsResponse> {
        let host = HostName::parse(hostname)?;
        let (ipv4, ipv6) = tokio::join!(
            invoke(self.dns_v4.as_ref(), &host),
            invoke(self.dns_v6.as_ref(), &host)
        );

        Ok(Envelope::new(DnsResponse {
            hostname: host.as_str().to_owned(),
            ipv4: ipv4.into_data().unwrap_or_default(),
            ipv6: ipv6.into_data().unwrap_or_default(),
        }))
    }

    /// An unreachable host is still a 200: `alive: false` plus the reason.
    pub async fn ping(&self, host: &str) -> Reply<PingResponse> {
        let host = HostName::parse(host)?;
        let response = match invoke(self.ping.as_ref(), &host).await {
            ProviderOutcome::Success { data, .. } => PingResponse {
                host: host.as_str().to_owned(),
                alive: data.alive,
                output: data.output,
                error: None,
            },
            ProviderOutcome::Empty { .. } => PingResponse {
                host: host.as_str().to_owned(),
                alive: false,
                output: Vec::new(),
                error: Some(String::from("no reply")),
            },
            ProviderOutcome::Failure { failure, .. } => PingResponse {
                host: host.as_str().to_owned(),
                alive: false,
                output: Vec::new(),
                error: Some(failure.message().to_owned()),
            },
        };
        Ok(Envelope::new(response))
    }

    pub async fn whois(&self, domain: &str) -> Reply<WhoisRecord> {
        let domain = Domain::parse(domain)?;
        let outcome = invoke(self.whois.as_ref(), &domain).await;
        let record = settle(outcome, "WHOIS lookup failed", || {
            CapabilityError::not_found("Domain not found")
        })?;
        Ok(Envelope::new(record))
    }

    pub async fn asn(&self, ip: &str) -> Reply<AsnResponse> {
        let ip = parse_ip(ip)?;
        let outcome = invoke(self.asn.as_ref(), &ip).await;
        let info = settle(outcome, "ASN lookup failed", || CapabilityError::not_found("ASN not found"))?;
        Ok(Envelope::new(AsnResponse {
            ip: ip.to_string(),
            info,
        }))
    }

    pub async fn ssl(&self, hostname: &str, port: Option<&str>) -> Reply<SslResponse> {
        let target = TlsTarget::parse(hostname, port)?;
        let outcome = invoke(self.tls.as_ref(), &target).await;
        let certificate = settle(outcome, "SSL check failed", || {
            CapabilityError::rejected("No certificate returned")
        })?;
        Ok(Envelope::new(SslResponse {
            hostname: target.host.as_str().to_owned(),
            certificate,
        }))
    }

    pub async fn http_status(&self, url: Option<&str>) -> Reply<HttpStatusResponse> {
        let url = ProbeUrl::parse(url.unwrap_or_default())?;
        let outcome = invoke(self.http_probe.as_ref(), &url).await;
        let report = settle(outcome, "HTTP status check failed", || {
            CapabilityError::internal("http probe returned no report")
        })?;
        Ok(Envelope::new(HttpStatusResponse {
            url: url.as_str().to_owned(),
            report,
        }))
    }
}

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{get_json, timeout_ms};
use crate::domain::AsnInfo;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{Provider, ProviderFuture};
use crate::ProviderId;

const IP_URL: &str = "https://api.bgpview.io/ip";

/// Origin AS and prefix for an address.
#[derive(Clone)]
pub struct BgpViewAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl BgpViewAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Wrapper {
    data: Option<IpData>,
}

#[derive(Debug, Deserialize)]
struct IpData {
    #[serde(default)]
    prefixes: Vec<PrefixPayload>,
    rir_allocation: Option<RirPayload>,
}

#[derive(Debug, Deserialize)]
struct PrefixPayload {
    prefix: Option<String>,
    asn: Option<AsnPayload>,
}

#[derive(Debug, Deserialize)]
struct AsnPayload {
    asn: Option<u32>,
    name: Option<String>,
    description: Option<String>,
    country_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RirPayload {
    rir_name: Option<String>,
}

impl Provider<IpAddr, AsnInfo> for BgpViewAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Bgpview
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    // Unrouted addresses still answer, with every field null.
    fn fetch<'a>(&'a self, input: &'a IpAddr) -> ProviderFuture<'a, AsnInfo> {
        Box::pin(async move {
            let request =
                HttpRequest::get(format!("{IP_URL}/{input}")).with_timeout_ms(timeout_ms(self.timeout));
            let wrapper: Wrapper = get_json(self.http_client.as_ref(), ProviderId::Bgpview, request).await?;
            Ok(Some(normalize_asn(wrapper.data)))
        })
    }
}

fn normalize_asn(data: Option<IpData>) -> AsnInfo {
    let (prefix, rir) = match data {
        Some(data) => (
            data.prefixes.into_iter().next(),
            data.rir_allocation.and_then(|rir| rir.rir_name),
        ),
        None => (None, None),
    };
    let (cidr, asn) = prefix.map_or((None, None), |prefix| (prefix.prefix, prefix.asn));

    AsnInfo {
        asn: asn.as_ref().and_then(|asn| asn.asn),
        asn_name: asn.as_ref().and_then(|asn| asn.name.clone()),
        description: asn.as_ref().and_then(|asn| asn.description.clone()),
        country: asn.and_then(|asn| asn.country_code),
        prefix: cidr,
        rir,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_prefix_wins() {
        let wrapper: Wrapper = serde_json::from_str(
            r#"{"status":"ok","data":{"prefixes":[
                {"prefix":"8.8.8.0/24","asn":{"asn":15169,"name":"GOOGLE","description":"Google LLC","country_code":"US"}},
                {"prefix":"8.0.0.0/9","asn":{"asn":3356,"name":"LEVEL3"}}],
                "rir_allocation":{"rir_name":"ARIN"}}}"#,
        )
        .expect("valid payload");

        let info = normalize_asn(wrapper.data);
        assert_eq!(info.asn, Some(15169));
        assert_eq!(info.prefix.as_deref(), Some("8.8.8.0/24"));
        assert_eq!(info.rir.as_deref(), Some("ARIN"));
    }

    #[test]
    fn missing_data_yields_nulls() {
        let info = normalize_asn(None);
        assert_eq!(info.asn, None);
        assert_eq!(info.rir, None);
    }
}

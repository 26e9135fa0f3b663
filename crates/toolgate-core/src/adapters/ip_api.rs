use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{get_json, timeout_ms};
use crate::domain::IpInfo;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{Provider, ProviderFuture};
use crate::request::HostName;
use crate::ProviderId;

const BASE_URL: &str = "http://ip-api.com/json";

/// Result of an ip-api query. The service reports bad input in-band.
#[derive(Debug, Clone, PartialEq)]
pub enum IpLookup {
    Found(IpInfo),
    Rejected(String),
}

/// ip-api.com geolocation. `None` input looks up the gateway's own address.
#[derive(Clone)]
pub struct IpApiAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl IpApiAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IpPayload {
    status: Option<String>,
    message: Option<String>,
    query: Option<String>,
    country: Option<String>,
    country_code: Option<String>,
    region_name: Option<String>,
    city: Option<String>,
    zip: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    timezone: Option<String>,
    isp: Option<String>,
    org: Option<String>,
    #[serde(rename = "as")]
    autonomous_system: Option<String>,
}

impl Provider<Option<HostName>, IpLookup> for IpApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::IpApi
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a Option<HostName>) -> ProviderFuture<'a, IpLookup> {
        Box::pin(async move {
            let target = input.as_ref().map(HostName::as_str).unwrap_or_default();
            let request =
                HttpRequest::get(format!("{BASE_URL}/{target}")).with_timeout_ms(timeout_ms(self.timeout));
            let payload: IpPayload = get_json(self.http_client.as_ref(), ProviderId::IpApi, request).await?;
            Ok(Some(normalize_lookup(payload)))
        })
    }
}

fn normalize_lookup(payload: IpPayload) -> IpLookup {
    if payload.status.as_deref() == Some("fail") {
        return IpLookup::Rejected(payload.message.unwrap_or_else(|| String::from("invalid query")));
    }

    IpLookup::Found(IpInfo {
        ip: payload.query,
        country: payload.country,
        country_code: payload.country_code,
        region: payload.region_name,
        city: payload.city,
        zip: payload.zip,
        latitude: payload.lat,
        longitude: payload.lon,
        timezone: payload.timezone,
        isp: payload.isp,
        org: payload.org,
        autonomous_system: payload.autonomous_system,
    })
}

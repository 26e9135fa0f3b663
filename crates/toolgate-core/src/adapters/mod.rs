//! Provider adapters, one per upstream.
//!
//! HTTP-backed adapters take an `Arc<dyn HttpClient>` so tests can swap in
//! [`StaticHttpClient`](crate::http_client::StaticHttpClient). Adapters that
//! need the system (DNS, ping, raw TLS) or no I/O at all (phone parsing) own
//! their collaborator directly.

mod bgpview;
mod coingecko;
mod dns;
mod duckduckgo;
mod http_probe;
mod ip_api;
mod nasa;
mod nominatim;
mod numverify;
mod nvd;
mod nws;
mod phone;
mod ping;
mod rdap;
mod tls;
mod worldtime;
mod wttr;

pub use bgpview::BgpViewAdapter;
pub use coingecko::CoinGeckoAdapter;
pub use dns::{RecordKind, SystemDnsAdapter};
pub use duckduckgo::DuckDuckGoAdapter;
pub use http_probe::HttpProbeAdapter;
pub use ip_api::{IpApiAdapter, IpLookup};
pub use nasa::NasaApodAdapter;
pub use nominatim::NominatimAdapter;
pub use numverify::NumverifyAdapter;
pub use nvd::NvdAdapter;
pub use nws::NwsAlertsAdapter;
pub use phone::LocalPhoneAdapter;
pub use ping::SystemPingAdapter;
pub use rdap::RdapAdapter;
pub use tls::TlsProbeAdapter;
pub use worldtime::WorldTimeAdapter;
pub use wttr::{WttrAdapter, WttrStormHeuristic};

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::provider::ProviderFailure;
use crate::ProviderId;

/// Input carried through the weather-alert chain: the place as typed plus the
/// coordinates the geocoder resolved it to.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertQuery {
    pub location: crate::request::Location,
    pub latitude: f64,
    pub longitude: f64,
}

pub(crate) fn timeout_ms(bound: Duration) -> u64 {
    u64::try_from(bound.as_millis()).unwrap_or(u64::MAX)
}

/// Executes a request and rejects non-2xx statuses.
pub(crate) async fn fetch(
    client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
) -> Result<HttpResponse, ProviderFailure> {
    let response = client.execute(request).await?;
    if !response.is_success() {
        return Err(ProviderFailure::from_status(provider, response.status));
    }
    Ok(response)
}

/// Like [`fetch`] but reports a 404 as `None`.
pub(crate) async fn fetch_optional(
    client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
) -> Result<Option<HttpResponse>, ProviderFailure> {
    let response = client.execute(request).await?;
    match response.status {
        404 => Ok(None),
        _ if response.is_success() => Ok(Some(response)),
        status => Err(ProviderFailure::from_status(provider, status)),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(provider: ProviderId, body: &str) -> Result<T, ProviderFailure> {
    serde_json::from_str(body)
        .map_err(|error| ProviderFailure::unparseable(format!("{provider} returned malformed JSON: {error}")))
}

pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &dyn HttpClient,
    provider: ProviderId,
    request: HttpRequest,
) -> Result<T, ProviderFailure> {
    let response = fetch(client, provider, request).await?;
    decode(provider, &response.body)
}

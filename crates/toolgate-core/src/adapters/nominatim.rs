use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use super::{decode, get_json, timeout_ms};
use crate::domain::{GeoLocation, ReverseGeocode};
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalize;
use crate::provider::{Provider, ProviderFailure, ProviderFuture};
use crate::request::{Coordinates, Location};
use crate::ProviderId;

const BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// OpenStreetMap geocoder: forward search and reverse lookup.
#[derive(Clone)]
pub struct NominatimAdapter {
    http_client: Arc<dyn HttpClient>,
    user_agent: String,
    timeout: Duration,
}

impl NominatimAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client,
            user_agent: user_agent.into(),
            timeout,
        }
    }

    fn request(&self, url: String) -> HttpRequest {
        HttpRequest::get(url)
            .with_header("user-agent", &self.user_agent)
            .with_header("accept", "application/json")
            .with_timeout_ms(timeout_ms(self.timeout))
    }
}

#[derive(Debug, Deserialize)]
struct SearchPayload {
    display_name: Option<String>,
    lat: Value,
    lon: Value,
    #[serde(rename = "type")]
    kind: Option<String>,
    importance: Option<f64>,
    #[serde(default)]
    boundingbox: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ReversePayload {
    error: Option<String>,
    display_name: Option<String>,
    #[serde(default)]
    address: BTreeMap<String, Value>,
}

impl Provider<Location, GeoLocation> for NominatimAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Nominatim
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a Location) -> ProviderFuture<'a, GeoLocation> {
        Box::pin(async move {
            let url = format!(
                "{BASE_URL}/search?q={}&format=json&limit=1",
                urlencoding::encode(input.as_str())
            );
            let payload: Vec<SearchPayload> =
                get_json(self.http_client.as_ref(), ProviderId::Nominatim, self.request(url)).await?;
            payload.into_iter().next().map(normalize_search).transpose()
        })
    }
}

impl Provider<Coordinates, ReverseGeocode> for NominatimAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Nominatim
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a Coordinates) -> ProviderFuture<'a, ReverseGeocode> {
        Box::pin(async move {
            let url = format!(
                "{BASE_URL}/reverse?lat={}&lon={}&format=json",
                input.latitude, input.longitude
            );
            let response = super::fetch(self.http_client.as_ref(), ProviderId::Nominatim, self.request(url)).await?;
            let payload: ReversePayload = decode(ProviderId::Nominatim, &response.body)?;
            if payload.error.is_some() {
                return Ok(None);
            }
            Ok(Some(normalize_reverse(payload)))
        })
    }
}

fn normalize_search(payload: SearchPayload) -> Result<GeoLocation, ProviderFailure> {
    let (Some(latitude), Some(longitude)) = (
        normalize::number(Some(&payload.lat)),
        normalize::number(Some(&payload.lon)),
    ) else {
        return Err(ProviderFailure::unparseable("nominatim result has no coordinates"));
    };

    Ok(GeoLocation {
        location: payload.display_name.unwrap_or_default(),
        latitude,
        longitude,
        kind: payload.kind,
        importance: payload.importance,
        bounding_box: payload
            .boundingbox
            .iter()
            .filter_map(|corner| normalize::number(Some(corner)))
            .collect(),
    })
}

fn normalize_reverse(payload: ReversePayload) -> ReverseGeocode {
    ReverseGeocode {
        location: payload.display_name,
        address: payload
            .address
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(text) => Some((key, text)),
                Value::Number(number) => Some((key, number.to_string())),
                _ => None,
            })
            .collect(),
    }
}

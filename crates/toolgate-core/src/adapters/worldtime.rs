use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{decode, fetch_optional, get_json, timeout_ms};
use crate::domain::TimezoneInfo;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{non_empty, Provider, ProviderFuture};
use crate::request::TimezoneName;
use crate::ProviderId;

const BASE_URL: &str = "http://worldtimeapi.org/api/timezone";

/// WorldTimeAPI: zone details and the zone catalogue.
#[derive(Clone)]
pub struct WorldTimeAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl WorldTimeAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ZonePayload {
    timezone: String,
    datetime: Option<String>,
    utc_offset: Option<String>,
    day_of_week: Option<u8>,
    day_of_year: Option<u16>,
    week_number: Option<u8>,
}

impl Provider<TimezoneName, TimezoneInfo> for WorldTimeAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Worldtime
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a TimezoneName) -> ProviderFuture<'a, TimezoneInfo> {
        Box::pin(async move {
            let request = HttpRequest::get(format!("{BASE_URL}/{}", input.as_str()))
                .with_timeout_ms(timeout_ms(self.timeout));
            let Some(response) =
                fetch_optional(self.http_client.as_ref(), ProviderId::Worldtime, request).await?
            else {
                return Ok(None);
            };
            let payload: ZonePayload = decode(ProviderId::Worldtime, &response.body)?;
            Ok(Some(TimezoneInfo {
                timezone: payload.timezone,
                datetime: payload.datetime,
                utc_offset: payload.utc_offset,
                day_of_week: payload.day_of_week,
                day_of_year: payload.day_of_year,
                week_number: payload.week_number,
            }))
        })
    }
}

/// Zone catalogue; takes no input.
impl Provider<(), Vec<String>> for WorldTimeAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Worldtime
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, _input: &'a ()) -> ProviderFuture<'a, Vec<String>> {
        Box::pin(async move {
            let request = HttpRequest::get(BASE_URL).with_timeout_ms(timeout_ms(self.timeout));
            let zones: Vec<String> =
                get_json(self.http_client.as_ref(), ProviderId::Worldtime, request).await?;
            Ok(non_empty(zones))
        })
    }
}

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use super::{get_json, timeout_ms, AlertQuery};
use crate::domain::{AreaInfo, CurrentConditions, DailyForecast, WeatherAlert, WeatherReport};
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalize;
use crate::provider::{Provider, ProviderFailure, ProviderFuture};
use crate::request::Location;
use crate::{ProviderId, UtcDateTime};

const STORM_KEYWORDS: [&str; 6] = ["thunder", "storm", "tornado", "blizzard", "hurricane", "typhoon"];

#[derive(Debug, Default, Deserialize)]
struct WttrPayload {
    #[serde(default)]
    current_condition: Vec<CurrentPayload>,
    #[serde(default)]
    nearest_area: Vec<AreaPayload>,
    #[serde(default)]
    weather: Vec<DayPayload>,
}

#[derive(Debug, Deserialize)]
struct Labelled {
    value: String,
}

fn first_label(labels: &[Labelled]) -> Option<String> {
    labels
        .first()
        .map(|label| label.value.trim().to_owned())
        .filter(|label| !label.is_empty())
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    #[serde(rename = "temp_C")]
    temp_c: Option<Value>,
    #[serde(rename = "temp_F")]
    temp_f: Option<Value>,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: Option<Value>,
    #[serde(rename = "FeelsLikeF")]
    feels_like_f: Option<Value>,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<Labelled>,
    humidity: Option<Value>,
    #[serde(rename = "windspeedMiles")]
    wind_mph: Option<Value>,
    #[serde(rename = "windspeedKmph")]
    wind_kph: Option<Value>,
    #[serde(rename = "precipMM")]
    precip_mm: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct AreaPayload {
    #[serde(rename = "areaName", default)]
    area_name: Vec<Labelled>,
    #[serde(default)]
    region: Vec<Labelled>,
    #[serde(default)]
    country: Vec<Labelled>,
    latitude: Option<Value>,
    longitude: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct DayPayload {
    #[serde(rename = "maxtempC")]
    max_c: Option<Value>,
    #[serde(rename = "maxtempF")]
    max_f: Option<Value>,
    #[serde(rename = "mintempC")]
    min_c: Option<Value>,
    #[serde(rename = "mintempF")]
    min_f: Option<Value>,
    #[serde(default)]
    astronomy: Vec<AstronomyPayload>,
}

#[derive(Debug, Deserialize)]
struct AstronomyPayload {
    sunrise: Option<String>,
    sunset: Option<String>,
}

async fn fetch_conditions(
    client: &dyn HttpClient,
    location: &Location,
    timeout: Duration,
) -> Result<WttrPayload, ProviderFailure> {
    let request = HttpRequest::get(format!(
        "https://wttr.in/{}?format=j1",
        urlencoding::encode(location.as_str())
    ))
    .with_header("accept", "application/json")
    .with_timeout_ms(timeout_ms(timeout));
    get_json(client, ProviderId::Wttr, request).await
}

/// Current conditions and today's forecast from wttr.in.
#[derive(Clone)]
pub struct WttrAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl WttrAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

impl Provider<Location, WeatherReport> for WttrAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Wttr
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a Location) -> ProviderFuture<'a, WeatherReport> {
        Box::pin(async move {
            let payload = fetch_conditions(self.http_client.as_ref(), input, self.timeout).await?;
            Ok(normalize_report(payload))
        })
    }
}

fn normalize_report(payload: WttrPayload) -> Option<WeatherReport> {
    let current = payload.current_condition.into_iter().next()?;
    let number = |value: &Option<Value>| normalize::number(value.as_ref());

    let location = payload
        .nearest_area
        .first()
        .map(|area| AreaInfo {
            area: first_label(&area.area_name),
            region: first_label(&area.region),
            country: first_label(&area.country),
            latitude: number(&area.latitude),
            longitude: number(&area.longitude),
        })
        .unwrap_or_default();

    let forecast = payload
        .weather
        .first()
        .map(|day| {
            let astronomy = day.astronomy.first();
            DailyForecast {
                max_temp_c: number(&day.max_c),
                max_temp_f: number(&day.max_f),
                min_temp_c: number(&day.min_c),
                min_temp_f: number(&day.min_f),
                sunrise: astronomy.and_then(|a| a.sunrise.clone()),
                sunset: astronomy.and_then(|a| a.sunset.clone()),
            }
        })
        .unwrap_or_default();

    Some(WeatherReport {
        location,
        current: CurrentConditions {
            temp_c: number(&current.temp_c),
            temp_f: number(&current.temp_f),
            feels_like_c: number(&current.feels_like_c),
            feels_like_f: number(&current.feels_like_f),
            condition: first_label(&current.weather_desc),
            humidity: number(&current.humidity),
            wind_mph: number(&current.wind_mph),
            wind_kph: number(&current.wind_kph),
            precipitation_mm: number(&current.precip_mm),
        },
        forecast,
    })
}

/// Secondary alert source: turns severe current conditions into one alert.
///
/// Only meaningful behind a primary alert service; it never corroborates.
#[derive(Clone)]
pub struct WttrStormHeuristic {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl WttrStormHeuristic {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

impl Provider<AlertQuery, Vec<WeatherAlert>> for WttrStormHeuristic {
    fn id(&self) -> ProviderId {
        ProviderId::Wttr
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a AlertQuery) -> ProviderFuture<'a, Vec<WeatherAlert>> {
        Box::pin(async move {
            let payload =
                fetch_conditions(self.http_client.as_ref(), &input.location, self.timeout).await?;
            let condition = payload
                .current_condition
                .first()
                .and_then(|current| first_label(&current.weather_desc))
                .unwrap_or_default();
            Ok(storm_alert(&input.location, &condition, UtcDateTime::now()).map(|alert| vec![alert]))
        })
    }
}

fn storm_alert(location: &Location, condition: &str, now: UtcDateTime) -> Option<WeatherAlert> {
    let lowered = condition.to_lowercase();
    if !STORM_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
        return None;
    }

    Some(WeatherAlert {
        id: format!("wttr-{}", now.unix_millis()),
        title: format!("Severe Weather: {condition}"),
        severity: Some(String::from("Severe")),
        urgency: Some(String::from("Immediate")),
        description: format!("Current conditions in {location}: {condition}"),
        effective: Some(now.format_rfc3339()),
        expires: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::StaticHttpClient;
    use crate::provider::{invoke, ProviderOutcome};

    const LONDON: &str = r#"{
        "current_condition":[{"temp_C":"12","temp_F":"54","FeelsLikeC":"10","FeelsLikeF":"50",
            "weatherDesc":[{"value":"Partly cloudy"}],"humidity":"71","windspeedMiles":"9",
            "windspeedKmph":"15","precipMM":"0.0"}],
        "nearest_area":[{"areaName":[{"value":"London"}],"region":[{"value":"City of London, Greater London"}],
            "country":[{"value":"United Kingdom"}],"latitude":"51.517","longitude":"-0.106"}],
        "weather":[{"maxtempC":"14","maxtempF":"57","mintempC":"8","mintempF":"46",
            "astronomy":[{"sunrise":"07:12 AM","sunset":"05:53 PM"}]}]}"#;

    #[tokio::test]
    async fn report_pairs_come_from_single_fields() {
        let adapter = WttrAdapter::new(
            Arc::new(StaticHttpClient::new().json("wttr.in/London", LONDON)),
            Duration::from_secs(1),
        );
        let location = Location::parse("London").expect("valid");

        let outcome = invoke::<Location, WeatherReport, _>(&adapter, &location).await;
        let ProviderOutcome::Success { data, .. } = outcome else {
            panic!("expected success, got {outcome:?}");
        };
        assert_eq!(data.current.temp_c, Some(12.0));
        assert_eq!(data.current.temp_f, Some(54.0));
        assert_eq!(data.current.condition.as_deref(), Some("Partly cloudy"));
        assert_eq!(data.location.country.as_deref(), Some("United Kingdom"));
        assert_eq!(data.forecast.sunset.as_deref(), Some("05:53 PM"));
    }

    #[tokio::test]
    async fn missing_current_conditions_is_empty() {
        let adapter = WttrAdapter::new(
            Arc::new(StaticHttpClient::new().json("wttr.in", r#"{"current_condition":[]}"#)),
            Duration::from_secs(1),
        );
        let location = Location::parse("Atlantis").expect("valid");

        let outcome = invoke::<Location, WeatherReport, _>(&adapter, &location).await;
        assert!(matches!(outcome, ProviderOutcome::Empty { .. }));
    }

    #[test]
    fn storm_keywords_match_case_insensitively() {
        let location = Location::parse("Oslo").expect("valid");
        let now = UtcDateTime::from_any_offset(time::macros::datetime!(2024-06-01 12:00:00 UTC));

        let alert = storm_alert(&location, "Patchy light rain with THUNDER", now).expect("storm");
        assert_eq!(alert.id, "wttr-1717243200000");
        assert_eq!(alert.title, "Severe Weather: Patchy light rain with THUNDER");
        assert_eq!(alert.description, "Current conditions in Oslo: Patchy light rain with THUNDER");
        assert_eq!(alert.effective.as_deref(), Some("2024-06-01T12:00:00Z"));

        assert!(storm_alert(&location, "Sunny", now).is_none());
        assert!(storm_alert(&location, "", now).is_none());
    }
}

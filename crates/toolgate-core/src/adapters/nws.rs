use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{get_json, timeout_ms, AlertQuery};
use crate::domain::WeatherAlert;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{non_empty, Provider, ProviderFuture};
use crate::ProviderId;

const ALERTS_URL: &str = "https://api.weather.gov/alerts/active";

/// US National Weather Service active alerts for a point.
#[derive(Clone)]
pub struct NwsAlertsAdapter {
    http_client: Arc<dyn HttpClient>,
    user_agent: String,
    timeout: Duration,
}

impl NwsAlertsAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client,
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlertCollection {
    #[serde(default)]
    features: Vec<AlertFeature>,
}

#[derive(Debug, Deserialize)]
struct AlertFeature {
    properties: AlertProperties,
}

#[derive(Debug, Deserialize)]
struct AlertProperties {
    id: Option<String>,
    event: Option<String>,
    severity: Option<String>,
    urgency: Option<String>,
    description: Option<String>,
    effective: Option<String>,
    expires: Option<String>,
}

impl Provider<AlertQuery, Vec<WeatherAlert>> for NwsAlertsAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Nws
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a AlertQuery) -> ProviderFuture<'a, Vec<WeatherAlert>> {
        Box::pin(async move {
            let request = HttpRequest::get(format!(
                "{ALERTS_URL}?point={},{}",
                input.latitude, input.longitude
            ))
            .with_header("user-agent", &self.user_agent)
            .with_header("accept", "application/geo+json")
            .with_timeout_ms(timeout_ms(self.timeout));

            let collection: AlertCollection =
                get_json(self.http_client.as_ref(), ProviderId::Nws, request).await?;
            Ok(non_empty(
                collection
                    .features
                    .into_iter()
                    .map(|feature| normalize_alert(feature.properties))
                    .collect(),
            ))
        })
    }
}

fn normalize_alert(props: AlertProperties) -> WeatherAlert {
    WeatherAlert {
        id: props.id.unwrap_or_default(),
        title: props.event.unwrap_or_default(),
        severity: props.severity,
        urgency: props.urgency,
        description: props.description.unwrap_or_default(),
        effective: props.effective,
        expires: props.expires,
    }
}

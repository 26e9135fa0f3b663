use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{settle, Gateway, Reply};
use crate::adapters::AlertQuery;
use crate::domain::{WeatherAlert, WeatherReport};
use crate::provider::{invoke, ProviderOutcome};
use crate::request::Location;
use crate::{normalize, CapabilityError, Envelope};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertsResponse {
    pub location: String,
    pub alerts: Vec<WeatherAlert>,
}

impl Gateway {
    pub async fn weather(&self, location: &str) -> Reply<WeatherReport> {
        let location = Location::parse(location)?;
        let outcome = invoke(self.weather.as_ref(), &location).await;
        let report = settle(outcome, "Weather lookup failed", || {
            CapabilityError::not_found("No weather data for location")
        })?;
        Ok(Envelope::new(report))
    }

    /// Geocodes the location, then walks the alert chain.
    ///
    /// An exhausted chain is a valid "no alerts" answer unless every
    /// provider failed outright.
    pub async fn weather_alerts(&self, location: &str) -> Reply<AlertsResponse> {
        let location = Location::parse(location)?;

        let place = match invoke(self.geocoder.as_ref(), &location).await {
            ProviderOutcome::Success { data, .. } => data,
            ProviderOutcome::Empty { .. } => {
                return Err(CapabilityError::not_found("Location not found").with_extra("alerts", json!([])));
            }
            ProviderOutcome::Failure { failure, .. } => {
                return Err(CapabilityError::upstream("Weather alerts lookup failed", &failure));
            }
        };

        let query = AlertQuery {
            location: location.clone(),
            latitude: place.latitude,
            longitude: place.longitude,
        };

        let alerts = match self.alerts.run(&query).await {
            Ok(success) => success.data,
            Err(exhausted) if exhausted.all_failed() => {
                let summary = "Weather alerts lookup failed";
                return Err(match exhausted.last_failure() {
                    Some(failure) => CapabilityError::upstream(summary, failure),
                    None => CapabilityError::internal("alert chain failed without a recorded failure"),
                });
            }
            Err(_) => Vec::new(),
        };

        Ok(Envelope::new(AlertsResponse {
            location: location.as_str().to_owned(),
            alerts: normalize::alerts(alerts),
        }))
    }
}

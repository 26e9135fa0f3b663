use serde::{Deserialize, Serialize};

/// Normalized weather alert, shared by every alert provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub id: String,
    pub title: String,
    pub severity: Option<String>,
    pub urgency: Option<String>,
    pub description: String,
    pub effective: Option<String>,
    pub expires: Option<String>,
}

/// Area the weather service resolved the query to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AreaInfo {
    pub area: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: Option<f64>,
    pub temp_f: Option<f64>,
    pub feels_like_c: Option<f64>,
    pub feels_like_f: Option<f64>,
    pub condition: Option<String>,
    pub humidity: Option<f64>,
    pub wind_mph: Option<f64>,
    pub wind_kph: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub max_temp_c: Option<f64>,
    pub max_temp_f: Option<f64>,
    pub min_temp_c: Option<f64>,
    pub min_temp_f: Option<f64>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
}

/// Current conditions plus today's forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: AreaInfo,
    pub current: CurrentConditions,
    pub forecast: DailyForecast,
}

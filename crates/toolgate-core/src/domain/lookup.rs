use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One web or news search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Forward geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub importance: Option<f64>,
    /// `[south, north, west, east]`.
    pub bounding_box: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseGeocode {
    pub location: Option<String>,
    pub address: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneInfo {
    pub timezone: String,
    pub datetime: Option<String>,
    pub utc_offset: Option<String>,
    pub day_of_week: Option<u8>,
    pub day_of_year: Option<u16>,
    pub week_number: Option<u8>,
}

/// Astronomy picture of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apod {
    pub title: Option<String>,
    pub date: Option<String>,
    pub explanation: Option<String>,
    pub url: Option<String>,
    pub hdurl: Option<String>,
    pub media_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinPrice {
    pub price_usd: Option<f64>,
    pub change_24h: Option<f64>,
    pub market_cap_usd: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CveRecord {
    pub description: String,
    pub severity: Option<String>,
    pub score: Option<f64>,
    pub published: Option<String>,
    pub modified: Option<String>,
    pub references: Vec<String>,
}

use serde::{Deserialize, Serialize};

use super::{settle, Gateway, Reply};
use crate::domain::{Apod, CoinPrice, CveRecord, GeoLocation, ReverseGeocode, SearchHit, TimezoneInfo};
use crate::provider::{invoke, ProviderOutcome};
use crate::request::{CoinSymbol, Coordinates, CveId, Location, SearchKind, SearchQuery, TimezoneName};
use crate::{normalize, CapabilityError, Envelope};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezonesResponse {
    pub timezones: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReverseGeocodeResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub place: ReverseGeocode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoResponse {
    /// Upper-cased ticker as requested.
    pub symbol: String,
    pub id: String,
    #[serde(flatten)]
    pub price: CoinPrice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CveResponse {
    pub id: String,
    #[serde(flatten)]
    pub record: CveRecord,
}

impl Gateway {
    pub async fn search(&self, query: Option<&str>, num_results: Option<i64>) -> Reply<SearchResponse> {
        let query = SearchQuery::parse(query.unwrap_or_default(), num_results, SearchKind::Web)?;
        self.run_search(query, "Search failed").await
    }

    pub async fn news(&self, query: &str, num_results: Option<i64>) -> Reply<SearchResponse> {
        let query = SearchQuery::parse(query, num_results, SearchKind::News)?;
        self.run_search(query, "News search failed").await
    }

    // No results is a valid answer for search.
    async fn run_search(&self, query: SearchQuery, failed: &str) -> Reply<SearchResponse> {
        let hits = match invoke(self.search.as_ref(), &query).await {
            ProviderOutcome::Success { data, .. } => data,
            ProviderOutcome::Empty { .. } => Vec::new(),
            ProviderOutcome::Failure { failure, .. } => {
                return Err(CapabilityError::upstream(failed, &failure));
            }
        };

        let results = normalize::search_hits(hits, query.limit());
        Ok(Envelope::new(SearchResponse {
            query: query.query().to_owned(),
            count: results.len(),
            results,
        }))
    }

    pub async fn timezone(&self, zone: &str) -> Reply<TimezoneInfo> {
        let zone = TimezoneName::parse(zone)?;
        let outcome = invoke(self.timezone.as_ref(), &zone).await;
        let info = settle(outcome, "Timezone lookup failed", || {
            CapabilityError::not_found(format!("Unknown timezone: {}", zone.as_str()))
        })?;
        Ok(Envelope::new(info))
    }

    pub async fn timezones(&self) -> Reply<TimezonesResponse> {
        let timezones = match invoke(self.timezones.as_ref(), &()).await {
            ProviderOutcome::Success { data, .. } => data,
            ProviderOutcome::Empty { .. } => Vec::new(),
            ProviderOutcome::Failure { failure, .. } => {
                return Err(CapabilityError::upstream("Failed to fetch timezones", &failure));
            }
        };
        Ok(Envelope::new(TimezonesResponse { timezones }))
    }

    pub async fn geocode(&self, location: &str) -> Reply<GeoLocation> {
        let location = Location::parse(location)?;
        let outcome = invoke(self.geocoder.as_ref(), &location).await;
        let place = settle(outcome, "Geocoding failed", || CapabilityError::not_found("Location not found"))?;
        Ok(Envelope::new(place))
    }

    pub async fn reverse_geocode(&self, lat: &str, lon: &str) -> Reply<ReverseGeocodeResponse> {
        let coordinates = Coordinates::parse(lat, lon)?;
        let outcome = invoke(self.reverse_geocoder.as_ref(), &coordinates).await;
        let place = settle(outcome, "Reverse geocoding failed", || {
            CapabilityError::not_found("Location not found")
        })?;
        Ok(Envelope::new(ReverseGeocodeResponse {
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            place,
        }))
    }

    pub async fn apod(&self) -> Reply<Apod> {
        let outcome = invoke(self.apod.as_ref(), &()).await;
        let apod = settle(outcome, "APOD fetch failed", || {
            CapabilityError::not_found("No picture published")
        })?;
        Ok(Envelope::new(apod))
    }

    pub async fn crypto(&self, symbol: &str) -> Reply<CryptoResponse> {
        let symbol = CoinSymbol::parse(symbol)?;
        let outcome = invoke(self.crypto.as_ref(), &symbol).await;
        let price = settle(outcome, "Crypto price fetch failed", || {
            CapabilityError::not_found(format!("Coin not found: {}", symbol.symbol()))
        })?;
        Ok(Envelope::new(CryptoResponse {
            symbol: symbol.symbol().to_ascii_uppercase(),
            id: symbol.id().to_owned(),
            price,
        }))
    }

    pub async fn cve(&self, id: &str) -> Reply<CveResponse> {
        let id = CveId::parse(id)?;
        let outcome = invoke(self.cve.as_ref(), &id).await;
        let record = settle(outcome, "CVE lookup failed", || CapabilityError::not_found("CVE not found"))?;
        Ok(Envelope::new(CveResponse {
            id: id.as_str().to_owned(),
            record: normalize::cve(record),
        }))
    }
}

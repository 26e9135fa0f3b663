use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{get_json, timeout_ms};
use crate::domain::CoinPrice;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{Provider, ProviderFuture};
use crate::request::CoinSymbol;
use crate::ProviderId;

const PRICE_URL: &str = "https://api.coingecko.com/api/v3/simple/price";

/// Spot price in USD.
#[derive(Clone)]
pub struct CoinGeckoAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl CoinGeckoAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PricePayload {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
    usd_market_cap: Option<f64>,
}

impl Provider<CoinSymbol, CoinPrice> for CoinGeckoAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Coingecko
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    // Unknown ids come back as `{}`.
    fn fetch<'a>(&'a self, input: &'a CoinSymbol) -> ProviderFuture<'a, CoinPrice> {
        Box::pin(async move {
            let request = HttpRequest::get(format!(
                "{PRICE_URL}?ids={}&vs_currencies=usd&include_24hr_change=true&include_market_cap=true",
                urlencoding::encode(input.id())
            ))
            .with_timeout_ms(timeout_ms(self.timeout));

            let mut prices: HashMap<String, PricePayload> =
                get_json(self.http_client.as_ref(), ProviderId::Coingecko, request).await?;
            Ok(prices.remove(input.id()).map(|price| CoinPrice {
                price_usd: price.usd,
                change_24h: price.usd_24h_change,
                market_cap_usd: price.usd_market_cap,
            }))
        })
    }
}

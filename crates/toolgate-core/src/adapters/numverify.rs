use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{get_json, timeout_ms};
use crate::domain::PhoneEnrichment;
use crate::http_client::{HttpClient, HttpRequest};
use crate::normalize;
use crate::provider::{Provider, ProviderFuture};
use crate::request::PhoneQuery;
use crate::ProviderId;

const VALIDATE_URL: &str = "http://apilayer.net/api/validate";

/// Paid carrier/line-type enrichment. Only registered when a key is configured.
#[derive(Clone)]
pub struct NumverifyAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    timeout: Duration,
}

impl NumverifyAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValidatePayload {
    valid: Option<bool>,
    carrier: Option<String>,
    location: Option<String>,
    line_type: Option<String>,
}

impl Provider<PhoneQuery, PhoneEnrichment> for NumverifyAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Numverify
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a PhoneQuery) -> ProviderFuture<'a, PhoneEnrichment> {
        Box::pin(async move {
            let request = HttpRequest::get(format!(
                "{VALIDATE_URL}?access_key={}&number={}&format=1",
                urlencoding::encode(&self.api_key),
                input.e164_digits()
            ))
            .with_timeout_ms(timeout_ms(self.timeout));

            let payload: ValidatePayload =
                get_json(self.http_client.as_ref(), ProviderId::Numverify, request).await?;
            // Error bodies (bad key, quota) come back as 200 without `valid`.
            if payload.valid.is_none() {
                return Ok(None);
            }
            Ok(Some(PhoneEnrichment {
                carrier: payload.carrier.filter(|carrier| !carrier.is_empty()),
                location: payload.location.filter(|location| !location.is_empty()),
                line_type: payload.line_type.as_deref().and_then(normalize::line_type),
            }))
        })
    }
}

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use super::{get_json, timeout_ms};
use crate::domain::Apod;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{Provider, ProviderFuture};
use crate::ProviderId;

const APOD_URL: &str = "https://api.nasa.gov/planetary/apod";

#[derive(Clone)]
pub struct NasaApodAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    timeout: Duration,
}

impl NasaApodAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApodPayload {
    title: Option<String>,
    date: Option<String>,
    explanation: Option<String>,
    url: Option<String>,
    hdurl: Option<String>,
    media_type: Option<String>,
}

impl Provider<(), Apod> for NasaApodAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Nasa
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, _input: &'a ()) -> ProviderFuture<'a, Apod> {
        Box::pin(async move {
            let request = HttpRequest::get(format!(
                "{APOD_URL}?api_key={}",
                urlencoding::encode(&self.api_key)
            ))
            .with_timeout_ms(timeout_ms(self.timeout));
            let payload: ApodPayload = get_json(self.http_client.as_ref(), ProviderId::Nasa, request).await?;
            Ok(Some(Apod {
                title: payload.title,
                date: payload.date,
                explanation: payload.explanation,
                url: payload.url,
                hdurl: payload.hdurl,
                media_type: payload.media_type,
            }))
        })
    }
}

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use super::{decode, fetch_optional, timeout_ms};
use crate::domain::WhoisRecord;
use crate::http_client::{HttpClient, HttpRequest};
use crate::provider::{Provider, ProviderFuture};
use crate::request::Domain;
use crate::ProviderId;

const DOMAIN_URL: &str = "https://rdap.org/domain";

/// Registration data via the RDAP bootstrap redirector.
#[derive(Clone)]
pub struct RdapAdapter {
    http_client: Arc<dyn HttpClient>,
    timeout: Duration,
}

impl RdapAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, timeout: Duration) -> Self {
        Self {
            http_client,
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DomainPayload {
    ldh_name: Option<String>,
    #[serde(default)]
    status: Vec<String>,
    #[serde(default)]
    events: Vec<EventPayload>,
    #[serde(default)]
    entities: Vec<EntityPayload>,
    #[serde(default)]
    nameservers: Vec<NameserverPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventPayload {
    event_action: String,
    event_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityPayload {
    #[serde(default)]
    roles: Vec<String>,
    /// jCard: `["vcard", [[name, params, type, value], ...]]`.
    vcard_array: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NameserverPayload {
    ldh_name: Option<String>,
}

impl Provider<Domain, WhoisRecord> for RdapAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Rdap
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a Domain) -> ProviderFuture<'a, WhoisRecord> {
        Box::pin(async move {
            let request = HttpRequest::get(format!("{DOMAIN_URL}/{}", input.as_str()))
                .with_header("accept", "application/rdap+json, application/json")
                .with_timeout_ms(timeout_ms(self.timeout));
            let Some(response) = fetch_optional(self.http_client.as_ref(), ProviderId::Rdap, request).await?
            else {
                return Ok(None);
            };
            let payload: DomainPayload = decode(ProviderId::Rdap, &response.body)?;
            Ok(Some(normalize_record(payload, input)))
        })
    }
}

fn normalize_record(payload: DomainPayload, requested: &Domain) -> WhoisRecord {
    let event = |action: &str| {
        payload
            .events
            .iter()
            .find(|event| event.event_action == action)
            .and_then(|event| event.event_date.clone())
    };

    WhoisRecord {
        domain: payload
            .ldh_name
            .clone()
            .unwrap_or_else(|| requested.as_str().to_owned()),
        status: payload.status.clone(),
        registrar: payload
            .entities
            .iter()
            .filter(|entity| entity.roles.iter().any(|role| role == "registrar"))
            .find_map(|entity| entity.vcard_array.as_ref().and_then(vcard_full_name)),
        created: event("registration"),
        expires: event("expiration"),
        updated: event("last changed"),
        nameservers: payload
            .nameservers
            .iter()
            .filter_map(|ns| ns.ldh_name.clone())
            .collect(),
    }
}

fn vcard_full_name(vcard: &Value) -> Option<String> {
    vcard
        .get(1)?
        .as_array()?
        .iter()
        .find(|property| property.get(0).and_then(Value::as_str) == Some("fn"))
        .and_then(|property| property.get(3))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

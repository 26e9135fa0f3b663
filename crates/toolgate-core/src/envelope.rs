use serde::Serialize;
use serde_json::{Map, Value};

use crate::{CapabilityError, UtcDateTime};

/// Success envelope: capability fields flattened beside a generation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    #[serde(flatten)]
    pub body: T,
    pub timestamp: UtcDateTime,
}

impl<T> Envelope<T> {
    pub fn new(body: T) -> Self {
        Self {
            body,
            timestamp: UtcDateTime::now(),
        }
    }

    pub fn into_body(self) -> T {
        self.body
    }
}

/// Failure envelope: `{error, details?, <extras>, timestamp}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub timestamp: UtcDateTime,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            extra: Map::new(),
            timestamp: UtcDateTime::now(),
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<&CapabilityError> for ErrorEnvelope {
    fn from(error: &CapabilityError) -> Self {
        Self {
            error: error.summary().to_owned(),
            details: error.details().map(str::to_owned),
            extra: error.extra().clone(),
            timestamp: UtcDateTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct Body {
        status: &'static str,
    }

    #[test]
    fn success_fields_sit_beside_timestamp() {
        let value = serde_json::to_value(Envelope::new(Body { status: "ok" })).expect("serialize");
        assert_eq!(value["status"], "ok");
        assert!(value["timestamp"].as_str().is_some_and(|ts| ts.ends_with('Z')));
    }

    #[test]
    fn error_envelope_carries_extras_and_omits_missing_details() {
        let error = CapabilityError::not_found("Location not found").with_extra("alerts", json!([]));
        let value = serde_json::to_value(ErrorEnvelope::from(&error)).expect("serialize");
        assert_eq!(value["error"], "Location not found");
        assert_eq!(value["alerts"], json!([]));
        assert!(value.get("details").is_none());
    }
}

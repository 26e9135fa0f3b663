use serde_json::{Map, Value};
use thiserror::Error;

use crate::provider::ProviderFailure;

/// Input validation errors raised before any provider is contacted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} required")]
    MissingField { field: &'static str },

    #[error("invalid CIDR")]
    InvalidCidr { value: String },
    #[error("invalid CIDR")]
    InvalidOctet { value: String },
    #[error("invalid CIDR")]
    PrefixOutOfRange { prefix: String },

    #[error("invalid algorithm")]
    UnsupportedAlgorithm { value: String },
    #[error("invalid base64 string")]
    InvalidBase64,
    #[error("mode must be encode or decode")]
    InvalidBase64Mode { value: String },

    #[error("Cannot parse number")]
    UnparseablePhone { input: String, reason: String },

    #[error("invalid location '{value}'")]
    InvalidLocation { value: String },
    #[error("invalid hostname '{value}'")]
    InvalidHost { value: String },
    #[error("invalid IP address '{value}'")]
    InvalidIp { value: String },
    #[error("invalid port '{value}'")]
    InvalidPort { value: String },
    #[error("invalid url '{value}'")]
    InvalidUrl { value: String },
    #[error("invalid coordinates '{lat}', '{lon}'")]
    InvalidCoordinates { lat: String, lon: String },
    #[error("invalid CVE id '{value}'")]
    InvalidCveId { value: String },
    #[error("invalid coin symbol '{value}'")]
    InvalidSymbol { value: String },
    #[error("invalid timezone '{value}'")]
    InvalidTimezone { value: String },
}

impl ValidationError {
    /// Optional human-readable detail that accompanies the summary.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::InvalidCidr { value } => Some(format!("expected a.b.c.d/prefix, got '{value}'")),
            Self::InvalidOctet { value } => Some(format!("octet '{value}' is not in 0-255")),
            Self::PrefixOutOfRange { prefix } => {
                Some(format!("prefix '{prefix}' must be between 0 and 32"))
            }
            Self::UnsupportedAlgorithm { value } => Some(format!(
                "'{value}' is not one of md5, sha1, sha256, sha512"
            )),
            Self::UnparseablePhone { reason, .. } => Some(reason.clone()),
            _ => None,
        }
    }
}

/// Outward failure classes with their HTTP-equivalent status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Validation,
    NotFound,
    Upstream,
    Internal,
}

impl ErrorClass {
    pub const fn status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::Upstream | Self::Internal => 500,
        }
    }
}

/// Failure returned by a capability handler.
///
/// Carries the short `error` summary and optional `details` that end up in
/// the error envelope, plus capability-specific extra fields.
#[derive(Debug, Clone, Error)]
#[error("{summary}")]
pub struct CapabilityError {
    class: ErrorClass,
    summary: String,
    details: Option<String>,
    extra: Map<String, Value>,
}

impl CapabilityError {
    pub fn new(class: ErrorClass, summary: impl Into<String>) -> Self {
        Self {
            class,
            summary: summary.into(),
            details: None,
            extra: Map::new(),
        }
    }

    /// Upstream rejected the input (e.g. a lookup service reporting "invalid query").
    pub fn rejected(summary: impl Into<String>) -> Self {
        Self::new(ErrorClass::Validation, summary)
    }

    pub fn not_found(summary: impl Into<String>) -> Self {
        Self::new(ErrorClass::NotFound, summary)
    }

    pub fn upstream(summary: impl Into<String>, failure: &ProviderFailure) -> Self {
        Self::new(ErrorClass::Upstream, summary).with_details(failure.to_string())
    }

    /// Internal fault. The context is logged, never returned to the caller.
    pub fn internal(context: impl AsRef<str>) -> Self {
        tracing::error!(context = context.as_ref(), "internal fault while handling request");
        Self::new(ErrorClass::Internal, "Internal error")
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub const fn class(&self) -> ErrorClass {
        self.class
    }

    pub const fn status(&self) -> u16 {
        self.class.status()
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

impl From<ValidationError> for CapabilityError {
    fn from(error: ValidationError) -> Self {
        let details = error.details();
        let mut mapped = Self::new(ErrorClass::Validation, error.to_string());
        mapped.details = details;
        mapped
    }
}

/// Top-level error type for core operations outside request handling.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("tls client setup failed: {0}")]
    TlsSetup(String),
}

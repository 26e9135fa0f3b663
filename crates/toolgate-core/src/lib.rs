//! # Toolgate Core
//!
//! Provider aggregation for the toolgate JSON gateway.
//!
//! ## Overview
//!
//! The gateway exposes one stable API over many unrelated upstreams. This
//! crate holds everything except the HTTP shell:
//!
//! - **Provider adapters**, one per upstream, each returning data, nothing,
//!   or a typed [`ProviderFailure`] under its own timeout
//! - **Chains** that order providers for a capability and decide when to fall
//!   back ([`FallbackChain`]) or enrich ([`EnrichmentChain`])
//! - **Normalization** rules applied regardless of which provider answered
//! - **Capability handlers** on [`Gateway`] that validate input and pick the
//!   outward status
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Nominatim, NWS, wttr.in, RDAP, NVD, ...) |
//! | [`capability`] | Closed capability catalogue |
//! | [`chain`] | Fallback and enrichment chains |
//! | [`config`] | Immutable gateway configuration |
//! | [`domain`] | Normalized result schemas |
//! | [`envelope`] | Success and error envelopes |
//! | [`error`] | Validation and capability errors |
//! | [`gateway`] | Capability handlers |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`normalize`] | Shared caps and field coercions |
//! | [`provider`] | Provider trait and outcomes |
//! | [`request`] | Validated request inputs |
//! | [`source`] | Provider identifiers |
//! | [`utility`] | Subnet, digest and base64 computations |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  Gateway Shell  │  (toolgate-server)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Gateway handler │────▶│ Normalizer       │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Fallback Chain  │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Provider        │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest/static) │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Security
//!
//! - API keys are read from environment variables only and never logged
//! - Certificate inspection uses rustls and never trusts what it inspects
//! - Internal faults are logged, never returned to callers

pub mod adapters;
pub mod capability;
pub mod chain;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod normalize;
pub mod provider;
pub mod request;
pub mod source;
pub mod utility;

// Capabilities
pub use capability::{Capability, EndpointDescriptor, Method};

// Chains
pub use chain::{Attempt, ChainExhausted, ChainResult, ChainSuccess, EnrichmentChain, Enrich, FallbackChain};

// Configuration
pub use config::{GatewayConfig, ProviderTimeouts};

// Domain models
pub use domain::{
    Apod, AreaInfo, AsnInfo, CertificateInfo, CoinPrice, CurrentConditions, CveRecord, DailyForecast,
    GeoLocation, HttpStatusReport, IpInfo, NumberType, PhoneEnrichment, PhoneFormats, PhoneMetadata,
    PingReport, ReverseGeocode, SearchHit, TimezoneInfo, UtcDateTime, WeatherAlert, WeatherReport,
    WhoisRecord,
};

// Envelope types
pub use envelope::{Envelope, ErrorEnvelope};

// Error types
pub use error::{CapabilityError, CoreError, ErrorClass, ValidationError};

// Handlers
pub use gateway::{Gateway, GatewayBuilder, Reply};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpFuture, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
    StaticHttpClient,
};

// Provider contract
pub use provider::{invoke, FailureKind, OutcomeStatus, Provider, ProviderFailure, ProviderFuture, ProviderOutcome};

// Source identifiers
pub use source::ProviderId;

//! # Toolgate Server
//!
//! HTTP shell over [`toolgate_core::Gateway`]: an axum router with one route
//! per capability, permissive CORS and per-request tracing spans.

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::extract::Request;
use axum::routing::{get, post};
use axum::Router;
use toolgate_core::Gateway;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

pub use error::ApiError;

pub const DEFAULT_LOG_FILTER: &str = "toolgate_server=info,toolgate_core=info,tower_http=info";

/// Builds the full route table over a shared gateway.
pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/endpoints", get(routes::endpoints))
        .route("/api/search", post(routes::search))
        .route("/api/news/:query", get(routes::news))
        .route("/api/weather/:location", get(routes::weather))
        .route("/api/weather-alerts/:location", get(routes::weather_alerts))
        .route("/api/timezone/*zone", get(routes::timezone))
        .route("/api/timezones", get(routes::timezones))
        .route("/api/geocode/:location", get(routes::geocode))
        .route("/api/reverse-geocode/:lat/:lon", get(routes::reverse_geocode))
        .route("/api/ip", get(routes::caller_ip))
        .route("/api/ip/:ip", get(routes::ip))
        .route("/api/phone/:number", get(routes::phone))
        .route("/api/dns/:hostname", get(routes::dns))
        .route("/api/ping/:host", get(routes::ping))
        .route("/api/apod", get(routes::apod))
        .route("/api/time", get(routes::time))
        .route("/api/hash", post(routes::hash))
        .route("/api/base64", post(routes::base64))
        .route("/api/subnet", post(routes::subnet))
        .route("/api/whois/:domain", get(routes::whois))
        .route("/api/asn/:ip", get(routes::asn))
        .route("/api/crypto/:symbol", get(routes::crypto))
        .route("/api/cve/:id", get(routes::cve))
        .route("/api/ssl/:hostname", get(routes::ssl))
        .route("/api/http-status", get(routes::http_status))
        .fallback(routes::not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                path = request.uri().path(),
            )
        }))
        .with_state(gateway)
}

/// Installs the global subscriber. `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`].
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(error) = installed {
        eprintln!("tracing already initialised: {error}");
    }
}

//! Behavior-driven tests for error handling and input safety.
//!
//! These tests check what a caller sees when input is hostile or upstreams
//! misbehave: a stable status, a short summary, and nothing internal.

use std::sync::Arc;
use std::time::Duration;

use toolgate_core::request::{CveId, HostName, Location, ProbeUrl, TimezoneName, TlsTarget};
use toolgate_core::{
    CapabilityError, CertificateInfo, ErrorClass, ErrorEnvelope, FailureKind, GatewayBuilder,
    GatewayConfig, HttpError, HttpResponse, Provider, ProviderFailure, ProviderFuture, ProviderId,
    ProviderTimeouts, StaticHttpClient, ValidationError,
};

struct NoCertificate;

impl Provider<TlsTarget, CertificateInfo> for NoCertificate {
    fn id(&self) -> ProviderId {
        ProviderId::TlsProbe
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    fn fetch<'a>(&'a self, _input: &'a TlsTarget) -> ProviderFuture<'a, CertificateInfo> {
        Box::pin(async { Ok(None) })
    }
}

struct NoRecords;

impl Provider<HostName, Vec<String>> for NoRecords {
    fn id(&self) -> ProviderId {
        ProviderId::SystemDns
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    fn fetch<'a>(&'a self, _input: &'a HostName) -> ProviderFuture<'a, Vec<String>> {
        Box::pin(async { Ok(None) })
    }
}

fn gateway_over(client: Arc<StaticHttpClient>) -> toolgate_core::Gateway {
    GatewayBuilder::new(
        GatewayConfig::default().with_timeouts(ProviderTimeouts::uniform(Duration::from_secs(1))),
    )
    .with_http_client(client)
    .with_resolvers(Arc::new(NoRecords), Arc::new(NoRecords))
    .with_tls_probe(Arc::new(NoCertificate))
    .build()
    .expect("gateway builds")
}

// =============================================================================
// Input Safety
// =============================================================================

#[test]
fn when_host_looks_like_a_command_option_it_is_rejected() {
    // Given: host strings that could be read as ping flags or shell syntax
    let hostile = ["-f", "-c 100000 example.com", "example.com; rm -rf /", "$(whoami)", ".hidden"];

    // When / Then: every one fails validation
    for raw in hostile {
        assert!(
            matches!(HostName::parse(raw), Err(ValidationError::InvalidHost { .. })),
            "{raw} should be rejected"
        );
    }
}

#[test]
fn when_timezone_attempts_path_traversal_it_is_rejected() {
    assert!(TimezoneName::parse("../../etc/passwd").is_err());
    assert!(TimezoneName::parse("Europe/London?x=1").is_err());
    assert_eq!(
        TimezoneName::parse("/America/Argentina/Buenos_Aires/")
            .expect("valid zone")
            .as_str(),
        "America/Argentina/Buenos_Aires"
    );
}

#[test]
fn when_probe_url_is_not_http_it_is_rejected() {
    for raw in ["file:///etc/passwd", "ftp://example.com", "gopher://x", "not a url", ""] {
        assert!(ProbeUrl::parse(raw).is_err(), "{raw} should be rejected");
    }
    assert!(ProbeUrl::parse("https://example.com/health").is_ok());
}

#[test]
fn when_location_contains_control_characters_it_is_rejected() {
    assert!(Location::parse("Paris\r\nHost: evil").is_err());
    assert!(Location::parse("   ").is_err());
    assert!(Location::parse("São Paulo").is_ok());
}

#[test]
fn when_cve_id_is_malformed_the_error_names_the_input() {
    let error = CveId::parse("CVE-21-1").expect_err("too short");
    assert_eq!(error.to_string(), "invalid CVE id 'CVE-21-1'");
}

#[test]
fn when_tls_port_is_out_of_range_it_is_rejected() {
    assert!(TlsTarget::parse("example.com", Some("0")).is_err());
    assert!(TlsTarget::parse("example.com", Some("65536")).is_err());
    assert_eq!(TlsTarget::parse("example.com", None).expect("default").port, 443);
}

// =============================================================================
// Error Envelope
// =============================================================================

#[test]
fn when_internal_fault_occurs_caller_sees_only_a_generic_summary() {
    // Given: an internal fault carrying sensitive context
    let error = CapabilityError::internal("reading /etc/toolgate/secret.key failed");

    // When: it is rendered for the caller
    let envelope = ErrorEnvelope::from(&error);
    let json = serde_json::to_string(&envelope).expect("serialize");

    // Then: nothing of the context leaks
    assert_eq!(error.status(), 500);
    assert_eq!(envelope.error, "Internal error");
    assert!(!json.contains("secret"));
    assert!(!json.contains("details"));
}

#[test]
fn when_upstream_fails_details_carry_the_failure_class() {
    let failure = ProviderFailure::new(FailureKind::Upstream5xx, "nvd returned status 503");
    let error = CapabilityError::upstream("CVE lookup failed", &failure);

    assert_eq!(error.class(), ErrorClass::Upstream);
    assert_eq!(error.summary(), "CVE lookup failed");
    assert_eq!(
        error.details(),
        Some("nvd returned status 503 (provider.upstream_5xx)")
    );
}

#[test]
fn when_error_envelope_is_serialized_extras_sit_beside_the_summary() {
    let error = CapabilityError::not_found("Location not found").with_extra("alerts", serde_json::json!([]));

    let value = serde_json::to_value(ErrorEnvelope::from(&error)).expect("serialize");

    assert_eq!(value["error"], "Location not found");
    assert_eq!(value["alerts"], serde_json::json!([]));
    assert!(value["timestamp"]
        .as_str()
        .is_some_and(|stamp| stamp.ends_with('Z')));
}

// =============================================================================
// Upstream Misbehaviour
// =============================================================================

#[tokio::test]
async fn when_upstream_is_down_user_receives_a_server_error_not_a_panic() {
    // Given: a geocoder that refuses connections
    let client = Arc::new(StaticHttpClient::new().fail("nominatim", HttpError::connect("refused")));
    let gateway = gateway_over(client);

    // When: geocoding is requested
    let error = gateway.geocode("Berlin").await.expect_err("upstream is down");

    // Then: a 500 with a stable summary
    assert_eq!(error.status(), 500);
    assert_eq!(error.summary(), "Geocoding failed");
    assert!(error.details().is_some_and(|d| d.contains("provider.network")));
}

#[tokio::test]
async fn when_upstream_sends_garbage_user_receives_a_server_error() {
    let client = Arc::new(StaticHttpClient::new().json("bgpview", "<!doctype html><title>502</title>"));
    let gateway = gateway_over(client);

    let error = gateway.asn("8.8.8.8").await.expect_err("garbage body");

    assert_eq!(error.status(), 500);
    assert!(error.details().is_some_and(|d| d.contains("provider.unparseable")));
}

#[tokio::test]
async fn when_input_is_invalid_no_upstream_is_contacted() {
    // Given: an offline transport that records every request
    let client = Arc::new(StaticHttpClient::new());
    let gateway = gateway_over(client.clone());

    // When: several handlers receive invalid input
    let failures = [
        gateway.asn("not-an-ip").await.map(drop).expect_err("bad ip"),
        gateway.whois("localhost").await.map(drop).expect_err("bad domain"),
        gateway.crypto("btc/../../admin").await.map(drop).expect_err("bad symbol"),
        gateway.reverse_geocode("91", "0").await.map(drop).expect_err("bad latitude"),
        gateway.http_status(Some("file:///etc/passwd")).await.map(drop).expect_err("bad url"),
    ];

    // Then: each is a 400 and the transport saw nothing
    for error in failures {
        assert_eq!(error.status(), 400, "{}", error.summary());
    }
    assert!(client.recorded_requests().is_empty());
}

#[tokio::test]
async fn when_server_rejects_the_request_the_status_class_is_preserved() {
    let client = Arc::new(StaticHttpClient::new().route("api.nasa.gov", HttpResponse::new(429, "")));
    let gateway = gateway_over(client);

    let error = gateway.apod().await.expect_err("rate limited");

    assert_eq!(error.status(), 500);
    assert!(error.details().is_some_and(|d| d.contains("provider.upstream_4xx")));
}

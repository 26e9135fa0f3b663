//! Behaviour of provider chains as seen from a capability.
//!
//! Covers ordering, short-circuiting, timeout bounds and the weather-alert
//! chain wired with its real adapters over an offline transport.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use toolgate_core::adapters::{AlertQuery, NwsAlertsAdapter, WttrStormHeuristic};
use toolgate_core::request::Location;
use toolgate_core::{
    FailureKind, FallbackChain, HttpClient, HttpResponse, OutcomeStatus, Provider, ProviderFailure,
    ProviderFuture, ProviderId, StaticHttpClient, WeatherAlert,
};

/// Provider double that replays one answer and counts its calls.
struct Scripted {
    id: ProviderId,
    reply: Result<Option<&'static str>, ProviderFailure>,
    delay: Duration,
    timeout: Duration,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(id: ProviderId, reply: Result<Option<&'static str>, ProviderFailure>) -> Arc<Self> {
        Arc::new(Self {
            id,
            reply,
            delay: Duration::ZERO,
            timeout: Duration::from_secs(1),
            calls: AtomicUsize::new(0),
        })
    }

    fn stalled(id: ProviderId, timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            id,
            reply: Ok(Some("too late")),
            delay: Duration::from_secs(30),
            timeout,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Provider<str, &'static str> for Scripted {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, _input: &'a str) -> ProviderFuture<'a, &'static str> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.reply.clone();
        let delay = self.delay;
        Box::pin(async move {
            tokio::time::sleep(delay).await;
            reply
        })
    }
}

fn chain(providers: &[&Arc<Scripted>]) -> FallbackChain<str, &'static str> {
    FallbackChain::new(
        providers
            .iter()
            .map(|provider| Arc::clone(*provider) as Arc<dyn Provider<str, &'static str>>)
            .collect(),
    )
}

// =============================================================================
// Ordering and short-circuit
// =============================================================================

#[tokio::test]
async fn first_success_stops_the_chain() {
    // Given: a chain whose first provider has data
    let primary = Scripted::new(ProviderId::Nws, Ok(Some("primary")));
    let secondary = Scripted::new(ProviderId::Wttr, Ok(Some("secondary")));

    // When: the chain runs
    let success = chain(&[&primary, &secondary]).run("miami").await.expect("should succeed");

    // Then: the second provider is never called
    assert_eq!(success.data, "primary");
    assert_eq!(success.selected, ProviderId::Nws);
    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 0);
    assert_eq!(success.attempts.len(), 1);
}

#[tokio::test]
async fn empty_primary_falls_back_exactly_once() {
    let primary = Scripted::new(ProviderId::Nws, Ok(None));
    let secondary = Scripted::new(ProviderId::Wttr, Ok(Some("secondary")));

    let success = chain(&[&primary, &secondary]).run("paris").await.expect("should succeed");

    assert_eq!(success.data, "secondary");
    assert_eq!(success.selected, ProviderId::Wttr);
    assert_eq!(secondary.calls(), 1);
    assert_eq!(
        success.attempts.iter().map(|a| a.status).collect::<Vec<_>>(),
        vec![OutcomeStatus::Empty, OutcomeStatus::Success]
    );
}

#[tokio::test]
async fn failed_primary_falls_back_and_keeps_the_failure_on_record() {
    let primary = Scripted::new(
        ProviderId::Nws,
        Err(ProviderFailure::new(FailureKind::Upstream5xx, "nws returned status 503")),
    );
    let secondary = Scripted::new(ProviderId::Wttr, Ok(Some("secondary")));

    let success = chain(&[&primary, &secondary]).run("miami").await.expect("should succeed");

    assert_eq!(success.data, "secondary");
    assert_eq!(
        success.attempts[0].failure.as_ref().map(ProviderFailure::kind),
        Some(FailureKind::Upstream5xx)
    );
}

#[tokio::test]
async fn exhausted_chain_reports_every_attempt_in_order() {
    let first = Scripted::new(ProviderId::Nws, Err(ProviderFailure::network("refused")));
    let second = Scripted::new(ProviderId::Wttr, Err(ProviderFailure::unparseable("html")));

    let exhausted = chain(&[&first, &second]).run("x").await.expect_err("should exhaust");

    assert!(exhausted.all_failed());
    assert_eq!(
        exhausted.attempts.iter().map(|a| a.provider).collect::<Vec<_>>(),
        vec![ProviderId::Nws, ProviderId::Wttr]
    );
    assert_eq!(
        exhausted.last_failure().map(ProviderFailure::kind),
        Some(FailureKind::Unparseable)
    );
}

#[tokio::test]
async fn empty_chain_is_exhausted_without_failures() {
    let chain: FallbackChain<str, &'static str> = FallbackChain::new(Vec::new());

    let exhausted = chain.run("x").await.expect_err("nothing to run");

    assert!(exhausted.attempts.is_empty());
    assert!(!exhausted.all_failed());
}

// =============================================================================
// Timeouts
// =============================================================================

#[tokio::test]
async fn slow_provider_is_abandoned_and_the_next_one_answers() {
    // Given: a stalled primary with a 100 ms bound
    let stalled = Scripted::stalled(ProviderId::Nws, Duration::from_millis(100));
    let secondary = Scripted::new(ProviderId::Wttr, Ok(Some("secondary")));

    // When: the chain runs
    let started = Instant::now();
    let success = chain(&[&stalled, &secondary]).run("x").await.expect("should succeed");

    // Then: the primary times out and the whole chain stays within the bound plus margin
    assert_eq!(success.data, "secondary");
    assert_eq!(
        success.attempts[0].failure.as_ref().map(ProviderFailure::kind),
        Some(FailureKind::Timeout)
    );
    assert!(started.elapsed() < Duration::from_millis(100) + Duration::from_millis(500));
}

// =============================================================================
// Weather-alert chain with real adapters
// =============================================================================

const NWS_ALERT: &str = r#"{"features":[{"properties":{
    "id":"urn:oid:2.49.0.1.840.0.abc","event":"Hurricane Warning","severity":"Extreme",
    "urgency":"Immediate","description":"Hurricane conditions expected.",
    "effective":"2024-10-09T10:00:00-04:00","expires":"2024-10-10T10:00:00-04:00"}}]}"#;

const WTTR_STORM: &str = r#"{"current_condition":[{"weatherDesc":[{"value":"Thunderstorm"}]}],
    "nearest_area":[],"weather":[]}"#;

const WTTR_CALM: &str = r#"{"current_condition":[{"weatherDesc":[{"value":"Sunny"}]}],
    "nearest_area":[],"weather":[]}"#;

fn alert_chain(http: Arc<dyn HttpClient>) -> FallbackChain<AlertQuery, Vec<WeatherAlert>> {
    FallbackChain::new(vec![
        Arc::new(NwsAlertsAdapter::new(Arc::clone(&http), "toolgate-test", Duration::from_secs(1)))
            as Arc<dyn Provider<AlertQuery, Vec<WeatherAlert>>>,
        Arc::new(WttrStormHeuristic::new(http, Duration::from_secs(1))),
    ])
}

fn query(place: &str, latitude: f64, longitude: f64) -> AlertQuery {
    AlertQuery {
        location: Location::parse(place).expect("valid location"),
        latitude,
        longitude,
    }
}

#[tokio::test]
async fn heuristic_is_not_consulted_when_nws_has_alerts() {
    let client = Arc::new(
        StaticHttpClient::new()
            .json("api.weather.gov", NWS_ALERT)
            .json("wttr.in", WTTR_STORM),
    );

    let success = alert_chain(client.clone())
        .run(&query("Miami, FL", 25.77, -80.19))
        .await
        .expect("nws has data");

    assert_eq!(success.selected, ProviderId::Nws);
    assert_eq!(success.data[0].title, "Hurricane Warning");
    assert_eq!(client.request_count("wttr.in"), 0);
}

#[tokio::test]
async fn heuristic_fires_when_nws_has_nothing_and_conditions_are_severe() {
    // Given: no NWS coverage and a thunderstorm reported by wttr.in
    let client = Arc::new(
        StaticHttpClient::new()
            .route("api.weather.gov", HttpResponse::new(404, ""))
            .json("wttr.in", WTTR_STORM),
    );

    // When: alerts are requested for a non-US location
    let success = alert_chain(client.clone())
        .run(&query("Paris", 48.85, 2.35))
        .await
        .expect("heuristic produced an alert");

    // Then: one synthesized severe alert from wttr.in
    assert_eq!(success.selected, ProviderId::Wttr);
    assert_eq!(success.data.len(), 1);
    assert_eq!(success.data[0].title, "Severe Weather: Thunderstorm");
    assert!(success.data[0].id.starts_with("wttr-"));
    assert_eq!(client.request_count("wttr.in"), 1);
}

#[tokio::test]
async fn calm_conditions_exhaust_the_chain_without_failure() {
    let client = Arc::new(
        StaticHttpClient::new()
            .json("api.weather.gov", r#"{"features":[]}"#)
            .json("wttr.in", WTTR_CALM),
    );

    let exhausted = alert_chain(client)
        .run(&query("Paris", 48.85, 2.35))
        .await
        .expect_err("nobody has alerts");

    assert!(!exhausted.all_failed());
    assert_eq!(exhausted.attempts.len(), 2);
}

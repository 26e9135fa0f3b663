//! Contract tests shared by every HTTP-backed provider adapter.
//!
//! Whatever the upstream, a transport error, a server error or an
//! unreadable body must surface as a typed failure outcome, never a panic,
//! and a stalled upstream must be cut off at the adapter's timeout.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use toolgate_core::adapters::{
    AlertQuery, BgpViewAdapter, CoinGeckoAdapter, DuckDuckGoAdapter, IpApiAdapter, IpLookup, NasaApodAdapter,
    NominatimAdapter, NumverifyAdapter, NvdAdapter, NwsAlertsAdapter, RdapAdapter, WorldTimeAdapter,
    WttrAdapter, WttrStormHeuristic,
};
use toolgate_core::request::{
    CoinSymbol, Coordinates, CveId, Domain, HostName, Location, PhoneQuery, SearchKind, SearchQuery,
    TimezoneName,
};
use toolgate_core::{
    invoke, Apod, AsnInfo, CoinPrice, CveRecord, FailureKind, GeoLocation, HttpClient, HttpError,
    HttpFuture, HttpRequest, HttpResponse, PhoneEnrichment, Provider, ProviderId, ReverseGeocode,
    SearchHit, StaticHttpClient, TimezoneInfo, WeatherAlert, WeatherReport, WhoisRecord,
};

const BOUND: Duration = Duration::from_millis(200);

struct Inputs {
    location: Location,
    coordinates: Coordinates,
    alert: AlertQuery,
    search: SearchQuery,
    zone: TimezoneName,
    phone: PhoneQuery,
    domain: Domain,
    ip: IpAddr,
    coin: CoinSymbol,
    cve: CveId,
}

fn inputs() -> Inputs {
    let location = Location::parse("Paris").expect("valid location");
    Inputs {
        alert: AlertQuery {
            location: location.clone(),
            latitude: 48.85,
            longitude: 2.35,
        },
        location,
        coordinates: Coordinates::new(48.85, 2.35).expect("valid coordinates"),
        search: SearchQuery::parse("rust async", None, SearchKind::Web).expect("valid query"),
        zone: TimezoneName::parse("Europe/Paris").expect("valid zone"),
        phone: PhoneQuery::parse("+14155552671", None).expect("valid number"),
        domain: Domain::parse("example.com").expect("valid domain"),
        ip: "8.8.8.8".parse().expect("valid ip"),
        coin: CoinSymbol::parse("btc").expect("valid symbol"),
        cve: CveId::parse("CVE-2021-44228").expect("valid id"),
    }
}

/// Collects `(provider, failure kind)` for every JSON adapter behind one transport.
async fn json_adapter_failures(http: Arc<dyn HttpClient>) -> Vec<(ProviderId, Option<FailureKind>)> {
    let input = inputs();
    let mut seen = Vec::new();

    macro_rules! exercise {
        ($adapter:expr, $input_ty:ty, $output_ty:ty, $input:expr) => {{
            let adapter = $adapter;
            let outcome = invoke::<$input_ty, $output_ty, _>(&adapter, $input).await;
            seen.push((
                Provider::<$input_ty, $output_ty>::id(&adapter),
                outcome.failure().map(|failure| failure.kind()),
            ));
        }};
    }

    exercise!(NominatimAdapter::new(Arc::clone(&http), "test", BOUND), Location, GeoLocation, &input.location);
    exercise!(
        NominatimAdapter::new(Arc::clone(&http), "test", BOUND),
        Coordinates,
        ReverseGeocode,
        &input.coordinates
    );
    exercise!(NwsAlertsAdapter::new(Arc::clone(&http), "test", BOUND), AlertQuery, Vec<WeatherAlert>, &input.alert);
    exercise!(WttrAdapter::new(Arc::clone(&http), BOUND), Location, WeatherReport, &input.location);
    exercise!(WttrStormHeuristic::new(Arc::clone(&http), BOUND), AlertQuery, Vec<WeatherAlert>, &input.alert);
    exercise!(WorldTimeAdapter::new(Arc::clone(&http), BOUND), TimezoneName, TimezoneInfo, &input.zone);
    exercise!(WorldTimeAdapter::new(Arc::clone(&http), BOUND), (), Vec<String>, &());
    exercise!(NumverifyAdapter::new(Arc::clone(&http), "key", BOUND), PhoneQuery, PhoneEnrichment, &input.phone);
    exercise!(NasaApodAdapter::new(Arc::clone(&http), "DEMO_KEY", BOUND), (), Apod, &());
    exercise!(RdapAdapter::new(Arc::clone(&http), BOUND), Domain, WhoisRecord, &input.domain);
    exercise!(BgpViewAdapter::new(Arc::clone(&http), BOUND), IpAddr, AsnInfo, &input.ip);
    exercise!(CoinGeckoAdapter::new(Arc::clone(&http), BOUND), CoinSymbol, CoinPrice, &input.coin);
    exercise!(NvdAdapter::new(Arc::clone(&http), BOUND), CveId, CveRecord, &input.cve);

    seen
}

// =============================================================================
// Failure classification
// =============================================================================

#[tokio::test]
async fn transport_errors_become_network_failures_for_every_adapter() {
    // Given: a transport that refuses every connection
    let http: Arc<dyn HttpClient> = Arc::new(StaticHttpClient::new().fail("", HttpError::connect("refused")));

    // When: every adapter is invoked
    let seen = json_adapter_failures(http).await;

    // Then: each one reports a network failure
    for (provider, kind) in seen {
        assert_eq!(kind, Some(FailureKind::Network), "provider '{provider}'");
    }
}

#[tokio::test]
async fn server_errors_become_upstream_5xx_failures() {
    let http: Arc<dyn HttpClient> = Arc::new(StaticHttpClient::new().route("", HttpResponse::new(503, "")));

    for (provider, kind) in json_adapter_failures(http).await {
        assert_eq!(kind, Some(FailureKind::Upstream5xx), "provider '{provider}'");
    }
}

#[tokio::test]
async fn unreadable_bodies_become_unparseable_failures() {
    let http: Arc<dyn HttpClient> =
        Arc::new(StaticHttpClient::new().json("", "<html>rate limited</html>"));

    for (provider, kind) in json_adapter_failures(http).await {
        assert_eq!(kind, Some(FailureKind::Unparseable), "provider '{provider}'");
    }
}

#[tokio::test]
async fn search_adapter_reports_server_errors_too() {
    let adapter = DuckDuckGoAdapter::new(
        Arc::new(StaticHttpClient::new().route("", HttpResponse::new(502, ""))),
        "Mozilla/5.0",
        BOUND,
    );

    let outcome = invoke::<SearchQuery, Vec<SearchHit>, _>(&adapter, &inputs().search).await;
    assert_eq!(
        outcome.failure().map(|failure| failure.kind()),
        Some(FailureKind::Upstream5xx)
    );
}

#[tokio::test]
async fn ip_lookup_without_target_queries_the_bare_endpoint() {
    let client = Arc::new(StaticHttpClient::new().fail("", HttpError::connect("refused")));
    let adapter = IpApiAdapter::new(client.clone(), BOUND);

    let outcome = invoke::<Option<HostName>, IpLookup, _>(&adapter, &None).await;
    assert!(outcome.failure().is_some());
    assert!(client.recorded_requests()[0].url.ends_with("/json/"));
}

// =============================================================================
// Timeouts
// =============================================================================

/// Transport that never answers within any sane bound.
struct StalledClient;

impl HttpClient for StalledClient {
    fn execute<'a>(&'a self, _request: HttpRequest) -> HttpFuture<'a> {
        Box::pin(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(HttpResponse::new(200, "{}"))
        })
    }
}

#[tokio::test]
async fn stalled_upstream_is_cut_off_at_the_adapter_timeout() {
    // Given: an adapter with a 200 ms bound over a stalled transport
    let adapter = NvdAdapter::new(Arc::new(StalledClient), BOUND);

    // When: it is invoked
    let started = Instant::now();
    let outcome = invoke::<CveId, CveRecord, _>(&adapter, &inputs().cve).await;

    // Then: it fails as a timeout shortly after the bound
    assert_eq!(
        outcome.failure().map(|failure| failure.kind()),
        Some(FailureKind::Timeout)
    );
    assert!(started.elapsed() < BOUND + Duration::from_millis(500));
}

//! Capability handlers.
//!
//! [`Gateway`] owns every adapter and chain, built once from a
//! [`GatewayConfig`]. Each handler validates raw input, runs its chain or
//! single provider and wraps the normalized result in an [`Envelope`].
//! Handlers never panic on upstream trouble: provider outcomes are mapped to
//! a [`CapabilityError`] with the status the capability's semantics call for.
//!
//! ```rust,ignore
//! let gateway = GatewayBuilder::new(GatewayConfig::from_env()).build()?;
//! let alerts = gateway.weather_alerts("Miami, FL").await?;
//! ```

mod lookup;
mod network;
mod phone;
mod utility;
mod weather;

pub use lookup::{CryptoResponse, CveResponse, ReverseGeocodeResponse, SearchResponse, TimezonesResponse};
pub use network::{AsnResponse, DnsResponse, HttpStatusResponse, PingResponse, SslResponse};
pub use phone::PhoneResponse;
pub use utility::{Base64Response, EndpointsResponse, HashResponse, HealthResponse, TimeResponse};
pub use weather::AlertsResponse;

use std::net::IpAddr;
use std::sync::Arc;

use crate::adapters::{
    AlertQuery, BgpViewAdapter, CoinGeckoAdapter, DuckDuckGoAdapter, HttpProbeAdapter, IpApiAdapter,
    IpLookup, LocalPhoneAdapter, NasaApodAdapter, NominatimAdapter, NumverifyAdapter, NvdAdapter,
    NwsAlertsAdapter, RdapAdapter, RecordKind, SystemDnsAdapter, SystemPingAdapter, TlsProbeAdapter,
    WorldTimeAdapter, WttrAdapter, WttrStormHeuristic,
};
use crate::chain::{EnrichmentChain, FallbackChain};
use crate::config::GatewayConfig;
use crate::domain::{
    Apod, AsnInfo, CertificateInfo, CoinPrice, CveRecord, GeoLocation, HttpStatusReport,
    PhoneEnrichment, PhoneMetadata, PingReport, ReverseGeocode, SearchHit, TimezoneInfo,
    WeatherAlert, WeatherReport, WhoisRecord,
};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::provider::{Provider, ProviderOutcome};
use crate::request::{
    CoinSymbol, Coordinates, CveId, Domain, HostName, Location, PhoneQuery, ProbeUrl, SearchQuery,
    TimezoneName, TlsTarget,
};
use crate::{Capability, CapabilityError, CoreError, Envelope, ProviderId};

pub type Reply<T> = Result<Envelope<T>, CapabilityError>;

type Shared<I, T> = Arc<dyn Provider<I, T>>;

/// All capability handlers, ready to serve concurrent requests.
pub struct Gateway {
    config: GatewayConfig,
    search: Shared<SearchQuery, Vec<SearchHit>>,
    weather: Shared<Location, WeatherReport>,
    timezone: Shared<TimezoneName, TimezoneInfo>,
    timezones: Shared<(), Vec<String>>,
    geocoder: Shared<Location, GeoLocation>,
    reverse_geocoder: Shared<Coordinates, ReverseGeocode>,
    ip_lookup: Shared<Option<HostName>, IpLookup>,
    phone: EnrichmentChain<PhoneQuery, PhoneMetadata, PhoneEnrichment>,
    dns_v4: Shared<HostName, Vec<String>>,
    dns_v6: Shared<HostName, Vec<String>>,
    ping: Shared<HostName, PingReport>,
    alerts: FallbackChain<AlertQuery, Vec<WeatherAlert>>,
    apod: Shared<(), Apod>,
    whois: Shared<Domain, WhoisRecord>,
    asn: Shared<IpAddr, AsnInfo>,
    crypto: Shared<CoinSymbol, CoinPrice>,
    cve: Shared<CveId, CveRecord>,
    tls: Shared<TlsTarget, CertificateInfo>,
    http_probe: Shared<ProbeUrl, HttpStatusReport>,
}

impl Gateway {
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Upstreams actually wired behind `capability`, in the order a request
    /// consults them. Matches [`Capability::providers`] unless a seam was
    /// overridden or an optional provider is unconfigured.
    pub fn wired_providers(&self, capability: Capability) -> Vec<ProviderId> {
        match capability {
            Capability::Health
            | Capability::Endpoints
            | Capability::Time
            | Capability::Hash
            | Capability::Base64
            | Capability::Subnet => Vec::new(),
            Capability::WebSearch | Capability::NewsSearch => vec![self.search.id()],
            Capability::Weather => vec![self.weather.id()],
            Capability::Timezone => vec![self.timezone.id()],
            Capability::Timezones => vec![self.timezones.id()],
            Capability::Geocode => vec![self.geocoder.id()],
            Capability::ReverseGeocode => vec![self.reverse_geocoder.id()],
            Capability::Ip => vec![self.ip_lookup.id()],
            Capability::Phone => self.phone.provider_ids(),
            Capability::Dns => {
                let mut ids = vec![self.dns_v4.id(), self.dns_v6.id()];
                ids.dedup();
                ids
            }
            Capability::Ping => vec![self.ping.id()],
            Capability::WeatherAlerts => std::iter::once(self.geocoder.id())
                .chain(self.alerts.provider_ids())
                .collect(),
            Capability::Apod => vec![self.apod.id()],
            Capability::Whois => vec![self.whois.id()],
            Capability::Asn => vec![self.asn.id()],
            Capability::Crypto => vec![self.crypto.id()],
            Capability::Cve => vec![self.cve.id()],
            Capability::Ssl => vec![self.tls.id()],
            Capability::HttpStatus => vec![self.http_probe.id()],
        }
    }

    fn log_wiring_drift(&self) {
        for capability in Capability::ALL {
            let wired = self.wired_providers(capability);
            let expected: Vec<ProviderId> = capability
                .providers()
                .iter()
                .copied()
                .filter(|id| !id.requires_credentials() || wired.contains(id))
                .collect();
            if wired != expected {
                tracing::warn!(
                    %capability,
                    declared = ?capability.providers(),
                    ?wired,
                    "capability wired differently from its declared chain"
                );
            }
        }
    }
}

/// Wires adapters from configuration. Tests override individual seams.
pub struct GatewayBuilder {
    config: GatewayConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    alert_providers: Option<Vec<Shared<AlertQuery, Vec<WeatherAlert>>>>,
    phone_enrichers: Option<Vec<Shared<PhoneQuery, PhoneEnrichment>>>,
    resolvers: Option<(Shared<HostName, Vec<String>>, Shared<HostName, Vec<String>>)>,
    pinger: Option<Shared<HostName, PingReport>>,
    tls_probe: Option<Shared<TlsTarget, CertificateInfo>>,
}

impl GatewayBuilder {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http_client: None,
            alert_providers: None,
            phone_enrichers: None,
            resolvers: None,
            pinger: None,
            tls_probe: None,
        }
    }

    /// Transport shared by every HTTP-backed adapter.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_config(mut self, config: GatewayConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the weather-alert chain, in priority order.
    pub fn with_alert_providers(mut self, providers: Vec<Shared<AlertQuery, Vec<WeatherAlert>>>) -> Self {
        self.alert_providers = Some(providers);
        self
    }

    /// Replaces the phone enrichers. An empty list means local parsing only.
    pub fn with_phone_enrichers(mut self, enrichers: Vec<Shared<PhoneQuery, PhoneEnrichment>>) -> Self {
        self.phone_enrichers = Some(enrichers);
        self
    }

    pub fn with_resolvers(
        mut self,
        ipv4: Shared<HostName, Vec<String>>,
        ipv6: Shared<HostName, Vec<String>>,
    ) -> Self {
        self.resolvers = Some((ipv4, ipv6));
        self
    }

    pub fn with_pinger(mut self, pinger: Shared<HostName, PingReport>) -> Self {
        self.pinger = Some(pinger);
        self
    }

    pub fn with_tls_probe(mut self, probe: Shared<TlsTarget, CertificateInfo>) -> Self {
        self.tls_probe = Some(probe);
        self
    }

    pub fn build(self) -> Result<Gateway, CoreError> {
        let config = self.config;
        let timeouts = config.timeouts;
        let http: Arc<dyn HttpClient> = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new(&config.user_agent)));

        let nominatim = Arc::new(NominatimAdapter::new(
            Arc::clone(&http),
            config.user_agent.clone(),
            timeouts.geocode,
        ));
        let worldtime = Arc::new(WorldTimeAdapter::new(Arc::clone(&http), timeouts.lookup));
        let search = Arc::new(DuckDuckGoAdapter::new(
            Arc::clone(&http),
            config.search_user_agent.clone(),
            timeouts.default,
        ));

        let alert_providers = self.alert_providers.unwrap_or_else(|| {
            vec![
                Arc::new(NwsAlertsAdapter::new(
                    Arc::clone(&http),
                    config.user_agent.clone(),
                    timeouts.alerts,
                )) as Shared<AlertQuery, Vec<WeatherAlert>>,
                Arc::new(WttrStormHeuristic::new(Arc::clone(&http), timeouts.heuristic)),
            ]
        });

        let phone_enrichers = self.phone_enrichers.unwrap_or_else(|| {
            config
                .numverify_api_key
                .iter()
                .map(|key| {
                    Arc::new(NumverifyAdapter::new(Arc::clone(&http), key.clone(), timeouts.enrichment))
                        as Shared<PhoneQuery, PhoneEnrichment>
                })
                .collect()
        });
        let phone = phone_enrichers.into_iter().fold(
            EnrichmentChain::new(Arc::new(LocalPhoneAdapter) as Shared<PhoneQuery, PhoneMetadata>),
            EnrichmentChain::with_enricher,
        );

        let (dns_v4, dns_v6) = self.resolvers.unwrap_or_else(|| {
            let resolver = SystemDnsAdapter::system_resolver();
            (
                Arc::new(SystemDnsAdapter::new(Arc::clone(&resolver), RecordKind::A, timeouts.lookup))
                    as Shared<HostName, Vec<String>>,
                Arc::new(SystemDnsAdapter::new(resolver, RecordKind::Aaaa, timeouts.lookup)),
            )
        });

        let tls = match self.tls_probe {
            Some(probe) => probe,
            None => Arc::new(
                TlsProbeAdapter::new(timeouts.tls).map_err(|failure| CoreError::TlsSetup(failure.to_string()))?,
            ),
        };

        let gateway = Gateway {
            search,
            weather: Arc::new(WttrAdapter::new(Arc::clone(&http), timeouts.lookup)),
            timezone: worldtime.clone(),
            timezones: worldtime,
            geocoder: nominatim.clone(),
            reverse_geocoder: nominatim,
            ip_lookup: Arc::new(IpApiAdapter::new(Arc::clone(&http), timeouts.lookup)),
            phone,
            dns_v4,
            dns_v6,
            ping: self
                .pinger
                .unwrap_or_else(|| Arc::new(SystemPingAdapter::new(timeouts.ping))),
            alerts: FallbackChain::new(alert_providers),
            apod: Arc::new(NasaApodAdapter::new(
                Arc::clone(&http),
                config.nasa_api_key.clone(),
                timeouts.lookup,
            )),
            whois: Arc::new(RdapAdapter::new(Arc::clone(&http), timeouts.lookup)),
            asn: Arc::new(BgpViewAdapter::new(Arc::clone(&http), timeouts.lookup)),
            crypto: Arc::new(CoinGeckoAdapter::new(Arc::clone(&http), timeouts.lookup)),
            cve: Arc::new(NvdAdapter::new(Arc::clone(&http), timeouts.cve)),
            tls,
            http_probe: Arc::new(HttpProbeAdapter::new(http, timeouts.lookup)),
            config,
        };
        gateway.log_wiring_drift();
        Ok(gateway)
    }
}

/// Maps a single-provider outcome: data passes through, `Empty` becomes the
/// capability's "missing" error and a failure becomes a 500 under `failed`.
pub(crate) fn settle<T>(
    outcome: ProviderOutcome<T>,
    failed: &str,
    missing: impl FnOnce() -> CapabilityError,
) -> Result<T, CapabilityError> {
    match outcome {
        ProviderOutcome::Success { data, .. } => Ok(data),
        ProviderOutcome::Empty { .. } => Err(missing()),
        ProviderOutcome::Failure { failure, .. } => Err(CapabilityError::upstream(failed, &failure)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{FailureKind, ProviderFailure};

    #[test]
    fn settle_maps_each_outcome() {
        let ok = settle(ProviderOutcome::Success { data: 1, latency_ms: 0 }, "x failed", || {
            CapabilityError::not_found("missing")
        });
        assert_eq!(ok.ok(), Some(1));

        let missing = settle::<u8>(ProviderOutcome::Empty { latency_ms: 0 }, "x failed", || {
            CapabilityError::not_found("missing")
        })
        .expect_err("empty is an error here");
        assert_eq!(missing.status(), 404);

        let failed = settle::<u8>(
            ProviderOutcome::Failure {
                failure: ProviderFailure::new(FailureKind::Network, "refused"),
                latency_ms: 0,
            },
            "x failed",
            || CapabilityError::not_found("missing"),
        )
        .expect_err("failure is an error");
        assert_eq!(failed.status(), 500);
        assert_eq!(failed.summary(), "x failed");
    }
}

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::TokioAsyncResolver;

use crate::provider::{non_empty, Provider, ProviderFailure, ProviderFuture};
use crate::request::HostName;
use crate::ProviderId;

/// Address family queried by a [`SystemDnsAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    A,
    Aaaa,
}

/// Resolves one record type through the system resolver configuration.
#[derive(Clone)]
pub struct SystemDnsAdapter {
    resolver: Arc<TokioAsyncResolver>,
    kind: RecordKind,
    timeout: Duration,
}

impl SystemDnsAdapter {
    pub fn new(resolver: Arc<TokioAsyncResolver>, kind: RecordKind, timeout: Duration) -> Self {
        Self {
            resolver,
            kind,
            timeout,
        }
    }

    /// Shared resolver built from `/etc/resolv.conf`, or public defaults when
    /// the system configuration cannot be read.
    pub fn system_resolver() -> Arc<TokioAsyncResolver> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|error| {
            tracing::warn!(%error, "system resolver configuration unavailable; using defaults");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Arc::new(resolver)
    }

    async fn lookup(&self, host: &str) -> Result<Vec<String>, ResolveError> {
        match self.kind {
            RecordKind::A => Ok(self
                .resolver
                .ipv4_lookup(host)
                .await?
                .iter()
                .map(ToString::to_string)
                .collect()),
            RecordKind::Aaaa => Ok(self
                .resolver
                .ipv6_lookup(host)
                .await?
                .iter()
                .map(ToString::to_string)
                .collect()),
        }
    }
}

impl Provider<HostName, Vec<String>> for SystemDnsAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::SystemDns
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn fetch<'a>(&'a self, input: &'a HostName) -> ProviderFuture<'a, Vec<String>> {
        Box::pin(async move {
            match self.lookup(input.as_str()).await {
                Ok(addresses) => Ok(non_empty(addresses)),
                Err(error) => match error.kind() {
                    ResolveErrorKind::NoRecordsFound { .. } => Ok(None),
                    _ => Err(ProviderFailure::network(format!(
                        "{:?} lookup for {input} failed: {error}",
                        self.kind
                    ))),
                },
            }
        })
    }
}

//! Ordered provider chains.
//!
//! [`FallbackChain`] walks its providers in registration order and stops at the
//! first `Success`. `Empty` and `Failure` both advance to the next provider.
//! [`EnrichmentChain`] always runs its primary, then lets optional secondary
//! providers add fields to the primary result without ever failing the call.

use std::sync::Arc;
use std::time::Instant;

use crate::provider::{elapsed_ms, invoke, OutcomeStatus, Provider, ProviderFailure, ProviderOutcome};
use crate::ProviderId;

/// Record of one provider call made while walking a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub provider: ProviderId,
    pub status: OutcomeStatus,
    pub latency_ms: u64,
    pub failure: Option<ProviderFailure>,
}

/// A chain produced data.
#[derive(Debug, Clone)]
pub struct ChainSuccess<T> {
    pub data: T,
    pub selected: ProviderId,
    pub attempts: Vec<Attempt>,
    pub latency_ms: u64,
}

/// Every provider in the chain was tried and none produced data.
#[derive(Debug, Clone)]
pub struct ChainExhausted {
    pub attempts: Vec<Attempt>,
    pub latency_ms: u64,
}

impl ChainExhausted {
    /// `true` when at least one provider ran and every one of them failed.
    pub fn all_failed(&self) -> bool {
        !self.attempts.is_empty()
            && self
                .attempts
                .iter()
                .all(|attempt| attempt.status == OutcomeStatus::Failure)
    }

    pub fn last_failure(&self) -> Option<&ProviderFailure> {
        self.attempts
            .iter()
            .rev()
            .find_map(|attempt| attempt.failure.as_ref())
    }
}

pub type ChainResult<T> = Result<ChainSuccess<T>, ChainExhausted>;

fn record<T>(provider: ProviderId, outcome: &ProviderOutcome<T>) -> Attempt {
    Attempt {
        provider,
        status: outcome.status(),
        latency_ms: outcome.latency_ms(),
        failure: outcome.failure().cloned(),
    }
}

/// Ordered list of interchangeable providers for one capability.
pub struct FallbackChain<I: ?Sized, T> {
    providers: Vec<Arc<dyn Provider<I, T>>>,
}

impl<I: ?Sized, T> FallbackChain<I, T> {
    pub fn new(providers: Vec<Arc<dyn Provider<I, T>>>) -> Self {
        Self { providers }
    }

    /// Appends a lower-priority provider.
    pub fn then(mut self, provider: Arc<dyn Provider<I, T>>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|provider| provider.id()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl<I, T> FallbackChain<I, T>
where
    I: Sync + ?Sized,
    T: Send,
{
    /// Tries each provider in order. Later providers are never called once one succeeds.
    pub async fn run(&self, input: &I) -> ChainResult<T> {
        let started = Instant::now();
        let mut attempts = Vec::with_capacity(self.providers.len());

        for provider in &self.providers {
            let id = provider.id();
            let outcome = invoke(provider.as_ref(), input).await;
            attempts.push(record(id, &outcome));

            if let ProviderOutcome::Success { data, .. } = outcome {
                if attempts.len() > 1 {
                    tracing::info!(
                        provider = %id,
                        skipped = attempts.len() - 1,
                        "fallback provider produced data"
                    );
                }
                return Ok(ChainSuccess {
                    data,
                    selected: id,
                    attempts,
                    latency_ms: elapsed_ms(started),
                });
            }
        }

        tracing::debug!(attempts = attempts.len(), "provider chain exhausted");
        Err(ChainExhausted {
            attempts,
            latency_ms: elapsed_ms(started),
        })
    }
}

/// Merges secondary data into a primary result.
pub trait Enrich<E> {
    fn enrich(&mut self, extra: E, source: ProviderId);
}

/// Primary provider plus optional enrichers whose failures are swallowed.
pub struct EnrichmentChain<I: ?Sized, T, E> {
    primary: Arc<dyn Provider<I, T>>,
    enrichers: Vec<Arc<dyn Provider<I, E>>>,
}

impl<I: ?Sized, T, E> EnrichmentChain<I, T, E> {
    pub fn new(primary: Arc<dyn Provider<I, T>>) -> Self {
        Self {
            primary,
            enrichers: Vec::new(),
        }
    }

    pub fn with_enricher(mut self, enricher: Arc<dyn Provider<I, E>>) -> Self {
        self.enrichers.push(enricher);
        self
    }

    pub fn enricher_ids(&self) -> Vec<ProviderId> {
        self.enrichers.iter().map(|provider| provider.id()).collect()
    }

    /// Primary first, then enrichers in the order they are consulted.
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        std::iter::once(self.primary.id()).chain(self.enricher_ids()).collect()
    }
}

impl<I, T, E> EnrichmentChain<I, T, E>
where
    I: Sync + ?Sized,
    T: Send + Enrich<E>,
    E: Send,
{
    pub async fn run(&self, input: &I) -> ChainResult<T> {
        let started = Instant::now();
        let primary_id = self.primary.id();
        let outcome = invoke(self.primary.as_ref(), input).await;
        let mut attempts = vec![record(primary_id, &outcome)];

        let Some(mut data) = outcome.into_data() else {
            return Err(ChainExhausted {
                attempts,
                latency_ms: elapsed_ms(started),
            });
        };

        for enricher in &self.enrichers {
            let id = enricher.id();
            let outcome = invoke(enricher.as_ref(), input).await;
            attempts.push(record(id, &outcome));
            match outcome {
                ProviderOutcome::Success { data: extra, .. } => data.enrich(extra, id),
                ProviderOutcome::Empty { .. } => {}
                ProviderOutcome::Failure { failure, .. } => {
                    tracing::debug!(provider = %id, code = failure.code(), "enrichment skipped");
                }
            }
        }

        Ok(ChainSuccess {
            data,
            selected: primary_id,
            attempts,
            latency_ms: elapsed_ms(started),
        })
    }
}

//! Provider adapter contract and the outcome type threaded through chains.
//!
//! Every upstream is wrapped in a [`Provider`] that returns normalized data,
//! nothing (`Ok(None)`), or a typed [`ProviderFailure`]. The gateway never
//! calls `fetch` directly: [`invoke`] enforces the provider's timeout,
//! measures latency and folds the result into a [`ProviderOutcome`].
//!
//! | Outcome | Meaning | Chain behaviour |
//! |---------|---------|-----------------|
//! | `Success` | usable data | stops the chain |
//! | `Empty` | upstream answered, nothing to report | advances |
//! | `Failure` | timeout, transport, status or parse error | advances |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::http_client::{HttpError, HttpErrorKind};
use crate::ProviderId;

/// Failure classification for a single provider call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    #[serde(rename = "upstream_4xx")]
    Upstream4xx,
    #[serde(rename = "upstream_5xx")]
    Upstream5xx,
    Unparseable,
    Network,
}

impl FailureKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Timeout => "provider.timeout",
            Self::Upstream4xx => "provider.upstream_4xx",
            Self::Upstream5xx => "provider.upstream_5xx",
            Self::Unparseable => "provider.unparseable",
            Self::Network => "provider.network",
        }
    }
}

/// Typed failure produced at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    kind: FailureKind,
    message: String,
}

impl ProviderFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Network, message)
    }

    pub fn unparseable(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unparseable, message)
    }

    /// Maps a non-2xx upstream status to its failure class.
    pub fn from_status(provider: ProviderId, status: u16) -> Self {
        let kind = if (400..500).contains(&status) {
            FailureKind::Upstream4xx
        } else if status >= 500 {
            FailureKind::Upstream5xx
        } else {
            FailureKind::Unparseable
        };
        Self::new(kind, format!("{provider} returned status {status}"))
    }

    pub const fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl Display for ProviderFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderFailure {}

impl From<HttpError> for ProviderFailure {
    fn from(error: HttpError) -> Self {
        let kind = match error.kind() {
            HttpErrorKind::Timeout => FailureKind::Timeout,
            HttpErrorKind::Connect | HttpErrorKind::Other => FailureKind::Network,
            HttpErrorKind::Body => FailureKind::Unparseable,
        };
        Self::new(kind, error.message())
    }
}

/// Outcome status, exposed only through chain diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Empty,
    Failure,
}

/// Result of one provider invocation. Never returned to callers directly.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome<T> {
    Success { data: T, latency_ms: u64 },
    Empty { latency_ms: u64 },
    Failure { failure: ProviderFailure, latency_ms: u64 },
}

impl<T> ProviderOutcome<T> {
    pub const fn status(&self) -> OutcomeStatus {
        match self {
            Self::Success { .. } => OutcomeStatus::Success,
            Self::Empty { .. } => OutcomeStatus::Empty,
            Self::Failure { .. } => OutcomeStatus::Failure,
        }
    }

    pub const fn latency_ms(&self) -> u64 {
        match self {
            Self::Success { latency_ms, .. }
            | Self::Empty { latency_ms }
            | Self::Failure { latency_ms, .. } => *latency_ms,
        }
    }

    pub fn failure(&self) -> Option<&ProviderFailure> {
        match self {
            Self::Failure { failure, .. } => Some(failure),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success { data, .. } => Some(data),
            _ => None,
        }
    }
}

pub type ProviderFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<Option<T>, ProviderFailure>> + Send + 'a>>;

/// Provider adapter contract.
///
/// `I` is the validated input, `T` the normalized payload. Implementations
/// own their upstream's response shape and must only return fields the
/// normalized schema understands. One outbound call (or one local
/// computation) per `fetch`.
pub trait Provider<I: ?Sized, T>: Send + Sync {
    /// Returns the upstream identifier.
    fn id(&self) -> ProviderId;

    /// Upper bound for one call, enforced by [`invoke`].
    fn timeout(&self) -> Duration;

    /// Performs the call. `Ok(None)` reports a valid answer with no data.
    fn fetch<'a>(&'a self, input: &'a I) -> ProviderFuture<'a, T>;
}

/// Calls a provider under its timeout and folds the result into an outcome.
///
/// A call that exceeds the bound is dropped (cancelling any in-flight I/O)
/// and reported as a `timeout` failure.
pub async fn invoke<I, T, P>(provider: &P, input: &I) -> ProviderOutcome<T>
where
    P: Provider<I, T> + ?Sized,
    I: Sync + ?Sized,
    T: Send,
{
    let started = Instant::now();
    let id = provider.id();
    let bound = provider.timeout();

    let result = tokio::time::timeout(bound, provider.fetch(input)).await;
    let latency_ms = elapsed_ms(started);

    match result {
        Ok(Ok(Some(data))) => {
            tracing::debug!(provider = %id, latency_ms, "provider returned data");
            ProviderOutcome::Success { data, latency_ms }
        }
        Ok(Ok(None)) => {
            tracing::debug!(provider = %id, latency_ms, "provider returned no data");
            ProviderOutcome::Empty { latency_ms }
        }
        Ok(Err(failure)) => {
            tracing::warn!(provider = %id, latency_ms, code = failure.code(), "{}", failure.message());
            ProviderOutcome::Failure {
                failure,
                latency_ms,
            }
        }
        Err(_) => {
            let failure = ProviderFailure::timeout(format!(
                "{id} did not respond within {} ms",
                bound.as_millis()
            ));
            tracing::warn!(provider = %id, latency_ms, code = failure.code(), "{}", failure.message());
            ProviderOutcome::Failure {
                failure,
                latency_ms,
            }
        }
    }
}

/// `Some(items)` when at least one item is present.
pub fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

pub(crate) fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}

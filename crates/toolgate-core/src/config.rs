//! Startup configuration.
//!
//! [`GatewayConfig`] is built once and handed to each adapter's constructor.
//! Nothing mutates it afterwards.
//!
//! # Environment Variables
//!
//! | Setting | Primary Env Var | Fallback Env Var |
//! |---------|----------------|------------------|
//! | Numverify key | `TOOLGATE_NUMVERIFY_API_KEY` | `NUMVERIFY_API_KEY` |
//! | NASA key | `TOOLGATE_NASA_API_KEY` | `NASA_API_KEY` |
//! | User agent | `TOOLGATE_USER_AGENT` | - |
//! | Search user agent | `TOOLGATE_SEARCH_USER_AGENT` | - |

use std::env;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

pub const DEFAULT_NASA_API_KEY: &str = "DEMO_KEY";
pub const DEFAULT_USER_AGENT: &str = concat!("toolgate/", env!("CARGO_PKG_VERSION"));
/// The search frontend serves its HTML results only to browser-like agents.
pub const DEFAULT_SEARCH_USER_AGENT: &str = "Mozilla/5.0";

/// Per-provider call bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderTimeouts {
    pub geocode: Duration,
    pub alerts: Duration,
    pub heuristic: Duration,
    pub enrichment: Duration,
    pub lookup: Duration,
    pub cve: Duration,
    pub tls: Duration,
    pub ping: Duration,
    pub default: Duration,
}

impl Default for ProviderTimeouts {
    fn default() -> Self {
        Self {
            geocode: Duration::from_secs(8),
            alerts: Duration::from_secs(8),
            heuristic: Duration::from_secs(5),
            enrichment: Duration::from_secs(5),
            lookup: Duration::from_secs(8),
            cve: Duration::from_secs(10),
            tls: Duration::from_secs(6),
            ping: Duration::from_secs(10),
            default: Duration::from_secs(10),
        }
    }
}

impl ProviderTimeouts {
    /// Same bound for every provider. Handy in tests.
    pub fn uniform(bound: Duration) -> Self {
        Self {
            geocode: bound,
            alerts: bound,
            heuristic: bound,
            enrichment: bound,
            lookup: bound,
            cve: bound,
            tls: bound,
            ping: bound,
            default: bound,
        }
    }
}

/// Immutable gateway configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub numverify_api_key: Option<String>,
    pub nasa_api_key: String,
    pub user_agent: String,
    pub search_user_agent: String,
    pub timeouts: ProviderTimeouts,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            numverify_api_key: None,
            nasa_api_key: String::from(DEFAULT_NASA_API_KEY),
            user_agent: String::from(DEFAULT_USER_AGENT),
            search_user_agent: String::from(DEFAULT_SEARCH_USER_AGENT),
            timeouts: ProviderTimeouts::default(),
        }
    }
}

// Keys stay out of logs.
impl Debug for GatewayConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("numverify_api_key", &self.numverify_api_key.as_ref().map(|_| "<set>"))
            .field("nasa_api_key", &redact(&self.nasa_api_key))
            .field("user_agent", &self.user_agent)
            .field("search_user_agent", &self.search_user_agent)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

fn redact(key: &str) -> &str {
    if key == DEFAULT_NASA_API_KEY {
        key
    } else {
        "<set>"
    }
}

impl GatewayConfig {
    /// Reads the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |primary: &str, legacy: Option<&str>| {
            present(lookup(primary)).or_else(|| legacy.and_then(|name| present(lookup(name))))
        };

        let defaults = Self::default();
        Self {
            numverify_api_key: read("TOOLGATE_NUMVERIFY_API_KEY", Some("NUMVERIFY_API_KEY")),
            nasa_api_key: read("TOOLGATE_NASA_API_KEY", Some("NASA_API_KEY"))
                .unwrap_or(defaults.nasa_api_key),
            user_agent: read("TOOLGATE_USER_AGENT", None).unwrap_or(defaults.user_agent),
            search_user_agent: read("TOOLGATE_SEARCH_USER_AGENT", None)
                .unwrap_or(defaults.search_user_agent),
            timeouts: defaults.timeouts,
        }
    }

    pub fn with_numverify_key(mut self, key: impl Into<String>) -> Self {
        self.numverify_api_key = present(Some(key.into()));
        self
    }

    pub fn with_timeouts(mut self, timeouts: ProviderTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

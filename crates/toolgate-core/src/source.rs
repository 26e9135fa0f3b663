use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Canonical identifiers for every upstream the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Nominatim,
    Nws,
    Wttr,
    Duckduckgo,
    Worldtime,
    IpApi,
    Libphonenumber,
    Numverify,
    SystemDns,
    SystemPing,
    Nasa,
    Rdap,
    Bgpview,
    Coingecko,
    Nvd,
    TlsProbe,
    HttpProbe,
}

impl ProviderId {
    /// Providers that are only wired when an API key is configured.
    pub const fn requires_credentials(self) -> bool {
        matches!(self, Self::Numverify)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nominatim => "nominatim",
            Self::Nws => "nws",
            Self::Wttr => "wttr",
            Self::Duckduckgo => "duckduckgo",
            Self::Worldtime => "worldtime",
            Self::IpApi => "ip_api",
            Self::Libphonenumber => "libphonenumber",
            Self::Numverify => "numverify",
            Self::SystemDns => "system_dns",
            Self::SystemPing => "system_ping",
            Self::Nasa => "nasa",
            Self::Rdap => "rdap",
            Self::Bgpview => "bgpview",
            Self::Coingecko => "coingecko",
            Self::Nvd => "nvd",
            Self::TlsProbe => "tls_probe",
            Self::HttpProbe => "http_probe",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

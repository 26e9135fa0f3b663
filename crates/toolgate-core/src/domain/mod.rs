//! # Domain Models
//!
//! Provider-agnostic result schemas. Each capability's normalized shape is
//! identical regardless of which upstream produced it.
//!
//! | Module | Types |
//! |--------|-------|
//! | `weather` | [`WeatherAlert`], [`WeatherReport`] |
//! | `phone` | [`PhoneMetadata`], [`PhoneEnrichment`], [`NumberType`] |
//! | `network` | [`IpInfo`], [`AsnInfo`], [`WhoisRecord`], [`CertificateInfo`], [`HttpStatusReport`], [`PingReport`] |
//! | `lookup` | [`SearchHit`], [`GeoLocation`], [`TimezoneInfo`], [`Apod`], [`CoinPrice`], [`CveRecord`] |

mod lookup;
mod network;
mod phone;
mod timestamp;
mod weather;

pub use lookup::{Apod, CoinPrice, CveRecord, GeoLocation, ReverseGeocode, SearchHit, TimezoneInfo};
pub use network::{AsnInfo, CertificateInfo, HttpStatusReport, IpInfo, PingReport, WhoisRecord};
pub use phone::{NumberType, PhoneEnrichment, PhoneFormats, PhoneMetadata};
pub use timestamp::UtcDateTime;
pub use weather::{AreaInfo, CurrentConditions, DailyForecast, WeatherAlert, WeatherReport};

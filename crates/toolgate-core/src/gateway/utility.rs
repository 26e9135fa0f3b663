use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::OffsetDateTime;

use super::{Gateway, Reply};
use crate::capability::{Capability, EndpointDescriptor};
use crate::utility::{base64_transform, digest, Base64Mode, Cidr, HashAlgorithm, SubnetInfo};
use crate::{Envelope, UtcDateTime, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointsResponse {
    pub endpoints: Vec<EndpointDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeResponse {
    pub utc: UtcDateTime,
    pub unix: i64,
    /// Wall-clock time in the host's offset, UTC when the offset is unknown.
    pub local: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResponse {
    pub hash: String,
    pub algorithm: HashAlgorithm,
    /// Length of the input in Unicode scalar values, not bytes or UTF-16 units.
    pub input_length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Base64Response {
    pub result: String,
    pub mode: Base64Mode,
}

impl Gateway {
    pub fn health(&self) -> Envelope<HealthResponse> {
        Envelope::new(HealthResponse {
            status: String::from("ok"),
        })
    }

    pub fn endpoints(&self) -> Envelope<EndpointsResponse> {
        Envelope::new(EndpointsResponse {
            endpoints: Capability::catalogue(),
        })
    }

    pub fn time(&self) -> Envelope<TimeResponse> {
        let utc = UtcDateTime::now();
        let local = OffsetDateTime::now_local().unwrap_or_else(|_| utc.into_inner());
        let local = local
            .format(format_description!(
                "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
            ))
            .unwrap_or_else(|_| utc.format_rfc3339());

        Envelope::new(TimeResponse {
            unix: utc.unix_timestamp(),
            utc,
            local,
        })
    }

    /// Hashes `text`; the algorithm defaults to sha256.
    pub fn hash(&self, text: Option<&str>, algorithm: Option<&str>) -> Reply<HashResponse> {
        let text = required_text(text)?;
        let algorithm = match algorithm {
            Some(name) => name.parse::<HashAlgorithm>()?,
            None => HashAlgorithm::default(),
        };

        Ok(Envelope::new(HashResponse {
            hash: digest(text, algorithm),
            algorithm,
            input_length: text.chars().count(),
        }))
    }

    pub fn base64(&self, text: Option<&str>, mode: Option<&str>) -> Reply<Base64Response> {
        let text = required_text(text)?;
        let mode = match mode {
            Some(name) => name.parse::<Base64Mode>()?,
            None => Base64Mode::default(),
        };

        Ok(Envelope::new(Base64Response {
            result: base64_transform(text, mode)?,
            mode,
        }))
    }

    pub fn subnet(&self, cidr: Option<&str>) -> Reply<SubnetInfo> {
        let cidr = Cidr::parse(cidr.unwrap_or_default())?;
        Ok(Envelope::new(cidr.summarize()))
    }
}

fn required_text(text: Option<&str>) -> Result<&str, ValidationError> {
    text.filter(|text| !text.is_empty())
        .ok_or(ValidationError::MissingField { field: "text" })
}

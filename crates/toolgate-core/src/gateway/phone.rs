use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{Gateway, Reply};
use crate::domain::PhoneMetadata;
use crate::request::PhoneQuery;
use crate::{CapabilityError, Envelope, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneResponse {
    pub input: String,
    #[serde(flatten)]
    pub metadata: PhoneMetadata,
}

impl Gateway {
    /// Local parse, then optional carrier enrichment.
    ///
    /// Unparseable input is a 400 that still reports `valid: false` and the
    /// original input.
    pub async fn phone(&self, number: &str, region: Option<&str>) -> Reply<PhoneResponse> {
        let query = PhoneQuery::parse(number, region).map_err(|error| unparseable(number, error))?;

        match self.phone.run(&query).await {
            Ok(success) => Ok(Envelope::new(PhoneResponse {
                input: query.input().to_owned(),
                metadata: success.data,
            })),
            Err(exhausted) => Err(CapabilityError::internal(format!(
                "local phone parser produced no result: {:?}",
                exhausted.last_failure()
            ))),
        }
    }
}

fn unparseable(input: &str, error: ValidationError) -> CapabilityError {
    CapabilityError::from(error)
        .with_extra("valid", Value::Bool(false))
        .with_extra("input", json!(input))
}

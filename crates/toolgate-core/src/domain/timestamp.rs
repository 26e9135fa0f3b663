use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// RFC3339 timestamp guaranteed to be UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    /// Converts any offset to UTC. Used for upstream timestamps such as certificate validity.
    pub fn from_any_offset(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn unix_timestamp(self) -> i64 {
        self.0.unix_timestamp()
    }

    pub fn unix_millis(self) -> i128 {
        self.0.unix_timestamp_nanos() / 1_000_000
    }

    pub fn format_rfc3339(self) -> String {
        // Rfc3339 only fails for years outside 0..=9999.
        self.0
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.0.unix_timestamp().to_string())
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn formats_with_zulu_suffix() {
        let stamp = UtcDateTime::from_any_offset(datetime!(2024-01-01 00:00:00 UTC));
        assert_eq!(stamp.format_rfc3339(), "2024-01-01T00:00:00Z");
        assert_eq!(
            serde_json::to_value(stamp).expect("serialize"),
            serde_json::json!("2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn converts_offset_timestamps_to_utc() {
        let utc = UtcDateTime::from_any_offset(datetime!(2024-01-01 01:00:00 +01:00));
        assert_eq!(utc.format_rfc3339(), "2024-01-01T00:00:00Z");
        assert_eq!(utc.unix_millis(), 1_704_067_200_000);
    }
}

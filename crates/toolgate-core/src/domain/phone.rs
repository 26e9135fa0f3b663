use serde::{Deserialize, Serialize};

use crate::chain::Enrich;
use crate::normalize;
use crate::ProviderId;

/// Line classification reported by the numbering-plan library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumberType {
    FixedLine,
    Mobile,
    FixedLineOrMobile,
    TollFree,
    PremiumRate,
    SharedCost,
    Voip,
    PersonalNumber,
    Pager,
    Uan,
    Voicemail,
    Unknown,
}

impl NumberType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FixedLine => "FIXED_LINE",
            Self::Mobile => "MOBILE",
            Self::FixedLineOrMobile => "FIXED_LINE_OR_MOBILE",
            Self::TollFree => "TOLL_FREE",
            Self::PremiumRate => "PREMIUM_RATE",
            Self::SharedCost => "SHARED_COST",
            Self::Voip => "VOIP",
            Self::PersonalNumber => "PERSONAL_NUMBER",
            Self::Pager => "PAGER",
            Self::Uan => "UAN",
            Self::Voicemail => "VOICEMAIL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneFormats {
    pub international: String,
    pub national: String,
    pub e164: String,
}

/// Normalized phone metadata.
///
/// `number_type` is a free-form upper-case label: the local library supplies
/// one of [`NumberType`], enrichment may replace it with its own line type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneMetadata {
    pub valid: bool,
    pub possible: bool,
    pub formats: PhoneFormats,
    pub country_code: String,
    pub country: Option<String>,
    pub number_type: String,
    pub carrier: Option<String>,
    pub location: Option<String>,
    pub source: String,
}

/// Carrier data from a paid validation service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEnrichment {
    pub carrier: Option<String>,
    pub location: Option<String>,
    pub line_type: Option<String>,
}

impl Enrich<PhoneEnrichment> for PhoneMetadata {
    fn enrich(&mut self, extra: PhoneEnrichment, source: ProviderId) {
        self.carrier = extra.carrier;
        self.location = extra.location;
        if let Some(line_type) = extra.line_type.as_deref().and_then(normalize::line_type) {
            self.number_type = line_type;
        }
        self.source = format!("{}+{}", self.source, source);
    }
}

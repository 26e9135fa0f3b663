use std::time::Duration;

use phonenumber::metadata::DATABASE;
use phonenumber::{Mode, PhoneNumber, Type};

use crate::domain::{NumberType, PhoneFormats, PhoneMetadata};
use crate::provider::{Provider, ProviderFuture};
use crate::request::PhoneQuery;
use crate::ProviderId;

/// E.164 caps a full number at 15 digits.
const MAX_E164_DIGITS: usize = 15;
const MIN_NATIONAL_DIGITS: usize = 2;

/// Offline numbering-plan analysis. Primary provider of the phone chain.
#[derive(Debug, Clone, Default)]
pub struct LocalPhoneAdapter;

impl Provider<PhoneQuery, PhoneMetadata> for LocalPhoneAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Libphonenumber
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    fn fetch<'a>(&'a self, input: &'a PhoneQuery) -> ProviderFuture<'a, PhoneMetadata> {
        let metadata = describe(input.number());
        Box::pin(async move { Ok(Some(metadata)) })
    }
}

fn describe(number: &PhoneNumber) -> PhoneMetadata {
    let format = |mode| number.format().mode(mode).to_string();
    let country = number.country();
    let valid = phonenumber::is_valid(number);

    PhoneMetadata {
        valid,
        possible: valid || is_possible_length(number),
        formats: PhoneFormats {
            international: format(Mode::International),
            national: format(Mode::National),
            e164: format(Mode::E164),
        },
        country_code: country.code().to_string(),
        country: country.id().map(|id| format!("{id:?}")),
        number_type: String::from(classify(number.number_type(&DATABASE)).as_str()),
        carrier: None,
        location: None,
        source: String::from("local"),
    }
}

/// Length-only plausibility: enough national digits and within E.164 bounds.
fn is_possible_length(number: &PhoneNumber) -> bool {
    let national = number.national().value().to_string().len();
    let code = number.country().code().to_string().len();
    national >= MIN_NATIONAL_DIGITS && national + code <= MAX_E164_DIGITS
}

fn classify(kind: Type) -> NumberType {
    match kind {
        Type::FixedLine => NumberType::FixedLine,
        Type::Mobile => NumberType::Mobile,
        Type::FixedLineOrMobile => NumberType::FixedLineOrMobile,
        Type::TollFree => NumberType::TollFree,
        Type::PremiumRate => NumberType::PremiumRate,
        Type::SharedCost => NumberType::SharedCost,
        Type::Voip => NumberType::Voip,
        Type::PersonalNumber => NumberType::PersonalNumber,
        Type::Pager => NumberType::Pager,
        Type::Uan => NumberType::Uan,
        Type::Voicemail => NumberType::Voicemail,
        _ => NumberType::Unknown,
    }
}

//! Normalization rules shared by every adapter.
//!
//! Caps are applied here rather than in adapters so that every provider in a
//! chain produces output under the same limits.

use serde_json::Value;

use crate::domain::{CveRecord, SearchHit, WeatherAlert};

pub const ALERT_DESCRIPTION_MAX_CHARS: usize = 500;
pub const CVE_DESCRIPTION_MAX_CHARS: usize = 800;
pub const CVE_REFERENCE_LIMIT: usize = 5;
pub const DEFAULT_RESULT_COUNT: usize = 5;
pub const MAX_RESULT_COUNT: usize = 25;

/// Truncates to at most `max` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => text[..cut].to_owned(),
        None => text.to_owned(),
    }
}

/// Requested result count, defaulted and clamped to `1..=25`.
pub fn result_count(requested: Option<i64>) -> usize {
    match requested {
        None => DEFAULT_RESULT_COUNT,
        Some(n) if n < 1 => 1,
        Some(n) => usize::try_from(n).map_or(MAX_RESULT_COUNT, |n| n.min(MAX_RESULT_COUNT)),
    }
}

pub fn alerts(items: Vec<WeatherAlert>) -> Vec<WeatherAlert> {
    items
        .into_iter()
        .map(|mut alert| {
            alert.description = truncate_chars(&alert.description, ALERT_DESCRIPTION_MAX_CHARS);
            alert
        })
        .collect()
}

pub fn cve(mut record: CveRecord) -> CveRecord {
    record.description = truncate_chars(&record.description, CVE_DESCRIPTION_MAX_CHARS);
    record.references.truncate(CVE_REFERENCE_LIMIT);
    record
}

/// Drops hits without a title or url, then keeps the first `limit` of the
/// rest, so incomplete hits never eat into the requested count.
pub fn search_hits(items: Vec<SearchHit>, limit: usize) -> Vec<SearchHit> {
    items
        .into_iter()
        .filter(|hit| !hit.title.is_empty() && !hit.url.is_empty())
        .take(limit)
        .collect()
}

/// Reads a number that upstreams send either as JSON number or numeric string.
pub fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Reads a non-empty string field.
pub fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Upper-cases a line-type label supplied by enrichment.
pub fn line_type(label: &str) -> Option<String> {
    let label = label.trim();
    (!label.is_empty()).then(|| label.to_uppercase())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(600);
        let cut = truncate_chars(&text, ALERT_DESCRIPTION_MAX_CHARS);
        assert_eq!(cut.chars().count(), 500);
        assert_eq!(truncate_chars("short", 500), "short");
    }

    #[test]
    fn result_count_is_clamped() {
        assert_eq!(result_count(None), 5);
        assert_eq!(result_count(Some(0)), 1);
        assert_eq!(result_count(Some(-3)), 1);
        assert_eq!(result_count(Some(10)), 10);
        assert_eq!(result_count(Some(400)), 25);
    }

    #[test]
    fn numbers_accept_strings_and_numbers() {
        assert_eq!(number(Some(&json!("12"))), Some(12.0));
        assert_eq!(number(Some(&json!(3.5))), Some(3.5));
        assert_eq!(number(Some(&json!("n/a"))), None);
        assert_eq!(number(None), None);
    }

    #[test]
    fn cve_caps_description_and_references() {
        let record = cve(CveRecord {
            description: "x".repeat(1_000),
            severity: None,
            score: None,
            published: None,
            modified: None,
            references: (0..9).map(|i| format!("https://ref/{i}")).collect(),
        });
        assert_eq!(record.description.len(), 800);
        assert_eq!(record.references.len(), 5);
    }

    #[test]
    fn search_hits_drop_incomplete_entries() {
        let hit = |title: &str, url: &str| SearchHit {
            title: title.to_owned(),
            snippet: String::new(),
            url: url.to_owned(),
        };
        let kept = search_hits(vec![hit("", "a.com"), hit("A", "a.com"), hit("B", "")], 5);
        assert_eq!(kept, vec![hit("A", "a.com")]);
    }

    #[test]
    fn search_limit_applies_after_filtering() {
        let hit = |title: &str, url: &str| SearchHit {
            title: title.to_owned(),
            snippet: String::new(),
            url: url.to_owned(),
        };
        let items = vec![hit("", "a.com"), hit("", "b.com"), hit("C", "c.com"), hit("D", "d.com")];

        let kept = search_hits(items, 2);

        assert_eq!(kept, vec![hit("C", "c.com"), hit("D", "d.com")]);
    }
}

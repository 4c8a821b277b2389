//! Option tag normalisation.

use rustc_hash::FxHashSet;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

/// One raw option value as submitted by a client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawOption {
    Text(String),
    Number(Number),
    Bool(bool),
    /// A structured entry; a present `name` wins over `value`.
    Record(Map<String, Value>),
    Null,
    /// Anything else, such as a nested list. Carries no label.
    Other(Value),
}

impl RawOption {
    fn label(&self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text.clone()),
            Self::Number(number) => Some(number.to_string()),
            Self::Bool(flag) => Some(bool_label(*flag)),
            Self::Record(record) => record
                .get("name")
                .filter(|name| !name.is_null())
                .or_else(|| record.get("value"))
                .and_then(scalar_label),
            Self::Null | Self::Other(_) => None,
        }
    }
}

/// `true` reads as `"1"` and `false` as an empty (dropped) label.
fn bool_label(flag: bool) -> String {
    if flag { "1" } else { "" }.to_owned()
}

fn scalar_label(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(bool_label(*flag)),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

impl From<&str> for RawOption {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Trimmed, non-empty option names, de-duplicated case-sensitively in
/// first-appearance order.
pub fn normalize_options<I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = RawOption>,
{
    let mut seen = FxHashSet::default();

    raw.into_iter()
        .filter_map(|option| option.label())
        .map(|label| label.trim().to_owned())
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(label.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn texts(values: &[&str]) -> Vec<RawOption> {
        values.iter().copied().map(RawOption::from).collect()
    }

    #[test]
    fn trims_drops_empty_and_deduplicates() {
        let normalized = normalize_options(texts(&["MP3", " MP3 ", "", " Bluetooth"]));

        assert_eq!(normalized, vec!["MP3", "Bluetooth"]);
    }

    #[test]
    fn deduplication_is_case_sensitive() {
        let normalized = normalize_options(texts(&["GPS", "gps", "GPS"]));

        assert_eq!(normalized, vec!["GPS", "gps"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(normalize_options(Vec::new()).is_empty());
        assert!(normalize_options(texts(&["  ", ""])).is_empty());
    }

    #[test]
    fn one_odd_entry_keeps_the_rest_of_the_list() -> TestResult {
        for body in [r#"["GPS", true]"#, r#"["GPS", {"name": 4}]"#] {
            let raw: Vec<RawOption> = serde_json::from_str(body)?;

            assert_eq!(normalize_options(raw).first().map(String::as_str), Some("GPS"), "{body}");
        }

        Ok(())
    }

    #[test]
    fn mixed_json_values_are_accepted() -> TestResult {
        let raw: Vec<RawOption> = serde_json::from_str(
            r#"[
                "Heated seats",
                4,
                null,
                {"name": " Sunroof ", "value": "ignored"},
                {"name": "", "value": "dropped with its empty name"},
                {"value": " Tow bar"},
                {"value": "Heated seats"},
                {"other": "nothing usable"},
                true,
                false,
                {"name": 7},
                {"name": null, "value": 2.5},
                {"name": ["nested"]},
                ["nested"]
            ]"#,
        )?;

        assert_eq!(
            normalize_options(raw),
            vec!["Heated seats", "4", "Sunroof", "Tow bar", "1", "7", "2.5"]
        );

        Ok(())
    }
}

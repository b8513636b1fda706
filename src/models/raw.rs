//! Untyped chart rows as they arrive from the dataset snapshot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RawRecord(pub Map<String, Value>);

impl RawRecord {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// First present, non-null field among `keys`.
    pub fn field(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .find(|value| !value.is_null())
    }

    /// First field among `keys` rendered as a trimmed, non-empty string.
    pub fn text(&self, keys: &[&str]) -> Option<String> {
        let value = self.field(keys)?;
        let text = match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First field among `keys` as a list of trimmed strings.
    /// Strings are split on any of `separators`; array elements are kept whole.
    pub fn list(&self, keys: &[&str], separators: &[&str]) -> Vec<String> {
        let Some(value) = self.field(keys) else {
            return Vec::new();
        };

        let mut items = Vec::new();
        match value {
            Value::String(s) => items.extend(split_all(s, separators)),
            Value::Array(values) => {
                items.extend(
                    values
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::trim)
                        .filter(|item| !item.is_empty())
                        .map(str::to_string),
                );
            }
            _ => {}
        }
        items
    }
}

fn split_all(input: &str, separators: &[&str]) -> Vec<String> {
    let mut parts = vec![input.to_string()];
    for sep in separators {
        parts = parts
            .iter()
            .flat_map(|part| part.split(sep).map(str::to_string).collect::<Vec<_>>())
            .collect();
    }
    parts
        .into_iter()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

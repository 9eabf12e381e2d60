use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The request payload of an agent action.
///
/// Only non-empty JSON objects count as a payload; `null`, `{}` and
/// non-object bodies are treated as "no data".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(Map<String, Value>);

impl Payload {
    pub fn from_data(data: Option<Value>) -> Option<Self> {
        match data {
            Some(Value::Object(map)) if !map.is_empty() => Some(Self(map)),
            _ => None,
        }
    }

    /// Removes a field, treating an explicit `null` as absent.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key).filter(|value| !value.is_null())
    }

    /// Removes an identifier field. Numbers are accepted and rendered as text.
    pub fn take_id(&mut self, key: &str) -> Option<String> {
        match self.take(key)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn take_as<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        serde_json::from_value(self.take(key)?).ok()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

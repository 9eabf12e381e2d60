use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A list of strings that callers (and the model) sometimes send as one free-text string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    List(Vec<String>),
    Text(String),
}

impl Default for StringList {
    fn default() -> Self {
        StringList::List(Vec::new())
    }
}

impl StringList {
    pub fn is_empty(&self) -> bool {
        match self {
            StringList::List(items) => items.is_empty(),
            StringList::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for StringList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringList::List(items) => f.write_str(&items.join(", ")),
            StringList::Text(text) => f.write_str(text),
        }
    }
}

/// Job search parameters accepted by the `search_jobs` action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSearch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: StringList,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<String>,
}

/// Reads an explicit `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read-only accessors over a job record.
///
/// Jobs arrive from the model or from callers as opaque JSON, so missing
/// fields read as empty strings.
#[derive(Debug, Clone, Copy)]
pub struct JobView<'a>(pub &'a Value);

impl<'a> JobView<'a> {
    fn str_field(&self, key: &str) -> &'a str {
        self.0.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// The job id, when it is a non-empty string.
    pub fn id(&self) -> Option<&'a str> {
        Some(self.str_field("id")).filter(|id| !id.is_empty())
    }

    /// The posting URL, when it is a non-empty string.
    pub fn url(&self) -> Option<&'a str> {
        Some(self.str_field("url")).filter(|url| !url.is_empty())
    }

    pub fn title(&self) -> &'a str {
        self.str_field("title")
    }

    pub fn company(&self) -> &'a str {
        self.str_field("company")
    }

    pub fn description(&self) -> &'a str {
        self.str_field("description")
    }

    pub fn required_skills(&self) -> StringList {
        self.0
            .get("required_skills")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Two saved jobs are the same posting when their urls or their ids match.
    pub fn same_posting(&self, other: &JobView<'_>) -> bool {
        let url_match = matches!((self.url(), other.url()), (Some(a), Some(b)) if a == b);
        let id_match = matches!((self.id(), other.id()), (Some(a), Some(b)) if a == b);
        url_match || id_match
    }
}

use serde_json::{Map, Value};

/// Profile sections counted by the completeness check, in display order.
pub const PROFILE_SECTIONS: [&str; 6] = [
    "basic_info",
    "work_experience",
    "education",
    "skills",
    "projects",
    "certifications",
];

/// Contact fields always present on stored basic info (empty string when unknown).
pub const BASIC_INFO_FIELDS: [&str; 7] = [
    "name",
    "email",
    "phone",
    "location",
    "linkedin",
    "github",
    "portfolio",
];

/// Fields kept on basic info only once someone has supplied them.
pub const OPTIONAL_BASIC_INFO_FIELDS: [&str; 2] = ["title", "summary"];

/// Read-only accessors over a stored user profile document.
///
/// Profiles are stored as loose JSON, so every accessor tolerates missing or
/// mistyped fields instead of failing.
#[derive(Debug, Clone, Copy)]
pub struct ProfileView<'a> {
    doc: &'a Map<String, Value>,
}

impl<'a> ProfileView<'a> {
    pub fn new(doc: &'a Map<String, Value>) -> Self {
        Self { doc }
    }

    /// Views an arbitrary JSON value; non-objects behave like an empty profile.
    pub fn from_value(value: &'a Value) -> Self {
        static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
        match value {
            Value::Object(map) => Self::new(map),
            _ => Self::new(EMPTY.get_or_init(Map::new)),
        }
    }

    pub fn basic_info(&self) -> Option<&'a Value> {
        self.doc.get("basic_info")
    }

    pub fn basic_field(&self, field: &str) -> &'a str {
        self.basic_info()
            .and_then(|info| info.get(field))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    pub fn entries(&self, section: &str) -> &'a [Value] {
        self.doc
            .get(section)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn skills(&self) -> Vec<&'a str> {
        self.entries("skills")
            .iter()
            .filter_map(Value::as_str)
            .collect()
    }

    /// True when the section key exists and holds a non-empty value.
    pub fn has_section(&self, section: &str) -> bool {
        self.doc.get(section).is_some_and(is_populated)
    }
}

/// Builds the stored basic info from an update, falling back to previously
/// stored values for every field the update omits.
pub fn merge_basic_info(existing: Option<&Value>, update: &Map<String, Value>) -> Map<String, Value> {
    let previous = |field: &str| existing.and_then(|info| info.get(field)).cloned();

    let mut merged = Map::new();
    for field in BASIC_INFO_FIELDS {
        let value = update
            .get(field)
            .cloned()
            .or_else(|| previous(field))
            .unwrap_or_else(|| Value::String(String::new()));
        merged.insert(field.to_string(), value);
    }
    for field in OPTIONAL_BASIC_INFO_FIELDS {
        if let Some(value) = update.get(field).cloned().or_else(|| previous(field)) {
            merged.insert(field.to_string(), value);
        }
    }
    merged
}

/// Python-style truthiness for JSON: null, false, 0, "" and empty containers are empty.
pub fn is_populated(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

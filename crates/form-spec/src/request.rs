use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::FormError;

/// One submitted value: a scalar, or a list for `name[]` style fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestValue {
    Single(String),
    Multiple(Vec<String>),
}

impl RequestValue {
    /// Value used to overwrite a scalar field. Lists contribute their first entry.
    pub fn first(&self) -> Option<&str> {
        match self {
            RequestValue::Single(value) => Some(value),
            RequestValue::Multiple(values) => values.first().map(String::as_str),
        }
    }

    /// Whether `key` was submitted. A scalar acts as a one-entry list.
    pub fn contains(&self, key: &str) -> bool {
        match self {
            RequestValue::Single(value) => value == key,
            RequestValue::Multiple(values) => values.iter().any(|value| value == key),
        }
    }
}

impl From<&str> for RequestValue {
    fn from(value: &str) -> Self {
        RequestValue::Single(value.to_string())
    }
}

impl From<String> for RequestValue {
    fn from(value: String) -> Self {
        RequestValue::Single(value)
    }
}

impl From<Vec<String>> for RequestValue {
    fn from(values: Vec<String>) -> Self {
        RequestValue::Multiple(values)
    }
}

impl From<Vec<&str>> for RequestValue {
    fn from(values: Vec<&str>) -> Self {
        RequestValue::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

impl<'de> Deserialize<'de> for RequestValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => RequestValue::Multiple(items.iter().map(scalar_text).collect()),
            other => RequestValue::Single(scalar_text(&other)),
        })
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Submitted form data consulted while rendering. Never mutated by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestData {
    values: BTreeMap<String, RequestValue>,
}

impl RequestData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RequestValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style variant of [`RequestData::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RequestValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RequestValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn from_json(raw: &str) -> Result<Self, FormError> {
        serde_json::from_str(raw).map_err(FormError::Parse)
    }

    pub fn load(path: &Path) -> Result<Self, FormError> {
        let raw = fs::read_to_string(path).map_err(|source| FormError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }
}

impl<K, V> FromIterator<(K, V)> for RequestData
where
    K: Into<String>,
    V: Into<RequestValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = RequestData::new();
        for (name, value) in iter {
            data.insert(name, value);
        }
        data
    }
}

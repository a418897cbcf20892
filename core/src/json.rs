//! Permissive, path-queryable JSON results.
//!
//! # Design
//! Response bodies are not checked against a schema. `JsonResult::parse`
//! never fails: an empty or malformed body yields an absent result that still
//! remembers the raw text, and every lookup on an absent result is absent
//! too. Callers that need strict validation check `exists()` or use
//! `deserialize`.
//!
//! Paths are dot-separated. A segment names an object key, or an array index
//! when the current value is an array. `#` on an array yields its length.
//! A literal dot inside a key is written `\.`.

use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A parsed JSON document, or a value looked up inside one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonResult {
    raw: String,
    value: Option<Value>,
}

impl JsonResult {
    /// Parse raw bytes. Invalid UTF-8 is replaced; invalid JSON is absent.
    pub fn parse(bytes: &[u8]) -> Self {
        let value = serde_json::from_slice(bytes).ok();
        Self {
            raw: String::from_utf8_lossy(bytes).into_owned(),
            value,
        }
    }

    fn from_value(value: &Value) -> Self {
        Self {
            raw: value.to_string(),
            value: Some(value.clone()),
        }
    }

    /// Look up `path` below this value. Never fails; missing paths are absent.
    pub fn get(&self, path: &str) -> JsonResult {
        let Some(mut current) = self.value.as_ref() else {
            return JsonResult::default();
        };

        let segments = split_path(path);
        let last = segments.len().saturating_sub(1);
        for (i, segment) in segments.iter().enumerate() {
            let next = match current {
                Value::Object(map) => map.get(segment.as_str()),
                Value::Array(items) if segment == "#" && i == last => {
                    return JsonResult::from_value(&Value::from(items.len()));
                }
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
                _ => None,
            };
            match next {
                Some(v) => current = v,
                None => return JsonResult::default(),
            }
        }
        JsonResult::from_value(current)
    }

    /// True when the document parsed, or the looked-up path was found.
    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    /// Raw JSON text. For a failed parse this is the original body.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.as_ref().and_then(Value::as_i64)
    }

    pub fn as_u64(&self) -> Option<u64> {
        self.value.as_ref().and_then(Value::as_u64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_ref().and_then(Value::as_f64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value.as_ref().and_then(Value::as_bool)
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value, Some(Value::Null))
    }

    pub fn is_array(&self) -> bool {
        matches!(self.value, Some(Value::Array(_)))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.value, Some(Value::Object(_)))
    }

    /// Elements of an array; empty for anything else.
    pub fn array(&self) -> Vec<JsonResult> {
        match &self.value {
            Some(Value::Array(items)) => items.iter().map(JsonResult::from_value).collect(),
            _ => Vec::new(),
        }
    }

    /// Strictly decode into `T`. An absent result decodes as JSON `null`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.value.clone().unwrap_or(Value::Null))
    }
}

impl fmt::Display for JsonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push('\\'),
            },
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

//! Lazy path lookup into a JSON document.
//!
//! Each step splits only the current level into raw sub-documents, so
//! nothing outside the addressed path is decoded.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde_json::value::RawValue;

use crate::error::JsonError;

/// One step of a lookup path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'p> {
    Key(&'p str),
    Index(usize),
}

impl<'p> From<&'p str> for PathSegment<'p> {
    fn from(key: &'p str) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment<'_> {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl fmt::Display for PathSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{key}"),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Kind of the addressed node, read from its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Invalid,
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

/// Read-only accessor returned by [`get`](crate::get).
#[derive(Debug, Clone)]
pub struct Any<'a> {
    raw: Option<&'a RawValue>,
    error: Option<String>,
}

impl<'a> Any<'a> {
    pub(crate) fn parse(data: &'a [u8]) -> Self {
        match serde_json::from_slice::<&'a RawValue>(data) {
            Ok(raw) => Self::found(raw),
            Err(e) => Self::missing(format!("invalid document: {e}")),
        }
    }

    fn found(raw: &'a RawValue) -> Self {
        Self {
            raw: Some(raw),
            error: None,
        }
    }

    fn missing(error: String) -> Self {
        Self { raw: None, error: Some(error) }
    }

    /// Descends further from this node.
    pub fn get(&self, path: &[PathSegment<'_>]) -> Any<'a> {
        let mut current = match self.raw {
            Some(raw) => raw,
            None => return self.clone(),
        };
        for segment in path {
            current = match step(current, *segment) {
                Ok(Some(next)) => next,
                Ok(None) => return Self::missing(format!("{segment} not found")),
                Err(e) => return Self::missing(format!("{segment}: {e}")),
            };
        }
        Self::found(current)
    }

    pub fn exists(&self) -> bool {
        self.raw.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The node's JSON text, exactly as it appears in the document.
    pub fn raw(&self) -> Option<&'a str> {
        self.raw.map(RawValue::get)
    }

    pub fn value_type(&self) -> ValueType {
        let Some(raw) = self.raw() else {
            return ValueType::Invalid;
        };
        match raw.as_bytes().first() {
            Some(b'n') => ValueType::Null,
            Some(b't') | Some(b'f') => ValueType::Bool,
            Some(b'"') => ValueType::String,
            Some(b'[') => ValueType::Array,
            Some(b'{') => ValueType::Object,
            Some(b'-') | Some(b'0'..=b'9') => ValueType::Number,
            _ => ValueType::Invalid,
        }
    }

    /// Decodes the node into `T`.
    pub fn to<T: Deserialize<'a>>(&self) -> Result<T, JsonError> {
        let raw = self.raw().unwrap_or("");
        serde_json::from_str(raw).map_err(JsonError::Decoding)
    }

    /// String content for strings, JSON text for anything else, empty when missing.
    pub fn to_string_value(&self) -> String {
        match self.value_type() {
            ValueType::Invalid => String::new(),
            ValueType::String => self.to::<String>().unwrap_or_default(),
            _ => self.raw().unwrap_or_default().to_string(),
        }
    }

    pub fn to_i64(&self) -> i64 {
        match self.value_type() {
            ValueType::Number => self
                .to::<i64>()
                .or_else(|_| self.to::<f64>().map(|f| f as i64))
                .unwrap_or(0),
            ValueType::String => self.to_string_value().trim().parse().unwrap_or(0),
            ValueType::Bool => i64::from(self.to_bool()),
            _ => 0,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self.value_type() {
            ValueType::Number => self.to::<f64>().unwrap_or(0.0),
            ValueType::String => self.to_string_value().trim().parse().unwrap_or(0.0),
            ValueType::Bool => f64::from(u8::from(self.to_bool())),
            _ => 0.0,
        }
    }

    pub fn to_bool(&self) -> bool {
        match self.value_type() {
            ValueType::Bool => self.to::<bool>().unwrap_or(false),
            ValueType::Number => self.to_f64() != 0.0,
            ValueType::String => !self.to_string_value().is_empty(),
            _ => false,
        }
    }

    /// Element count for arrays, key count for objects, zero otherwise.
    pub fn size(&self) -> usize {
        match self.value_type() {
            ValueType::Array => self.to::<Vec<&RawValue>>().map(|v| v.len()).unwrap_or(0),
            ValueType::Object => self.keys().len(),
            _ => 0,
        }
    }

    pub fn keys(&self) -> Vec<String> {
        if self.value_type() != ValueType::Object {
            return Vec::new();
        }
        self.to::<HashMap<String, &RawValue>>()
            .map(|map| map.into_keys().collect())
            .unwrap_or_default()
    }
}

fn step<'a>(
    current: &'a RawValue,
    segment: PathSegment<'_>,
) -> Result<Option<&'a RawValue>, serde_json::Error> {
    match segment {
        PathSegment::Key(key) => {
            let mut members: HashMap<String, &'a RawValue> = serde_json::from_str(current.get())?;
            Ok(members.remove(key))
        }
        PathSegment::Index(index) => {
            let items: Vec<&'a RawValue> = serde_json::from_str(current.get())?;
            Ok(items.get(index).copied())
        }
    }
}

#[cfg(test)]
#[path = "any_tests.rs"]
mod tests;

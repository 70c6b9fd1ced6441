//! The process-wide JSON engine.
//!
//! Output matches a strict standard-library encoder: compact by default,
//! `<`, `>` and `&` escaped as `\u003c`, `\u003e` and `\u0026`, and the
//! line/paragraph separators U+2028 / U+2029 always escaped.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use once_cell::sync::Lazy;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};

use crate::error::JsonError;

static ENGINE: Lazy<JsonEngine> = Lazy::new(JsonEngine::standard);

/// Returns the engine shared by every facade function.
pub fn engine() -> &'static JsonEngine {
    &ENGINE
}

/// Encoder/decoder configuration. Fixed at first use, read-only afterwards.
#[derive(Debug, Clone, Copy)]
pub struct JsonEngine {
    escape_html: bool,
}

impl JsonEngine {
    /// Configuration compatible with a standard-library encoder.
    pub const fn standard() -> Self {
        Self { escape_html: true }
    }

    pub fn escape_html(&self) -> bool {
        self.escape_html
    }

    pub fn marshal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, JsonError> {
        let mut out = Vec::with_capacity(128);
        self.write(&mut out, value, CompactFormatter)?;
        Ok(out)
    }

    /// Pretty output. Each nesting level is indented by `indent`; every line
    /// after the first starts with `prefix`.
    pub fn marshal_indent<T: Serialize + ?Sized>(
        &self,
        value: &T,
        prefix: &str,
        indent: &str,
    ) -> Result<Vec<u8>, JsonError> {
        let mut out = Vec::with_capacity(128);
        self.write(&mut out, value, PrettyFormatter::with_indent(indent.as_bytes()))?;
        if prefix.is_empty() {
            return Ok(out);
        }
        Ok(apply_prefix(&out, prefix.as_bytes()))
    }

    pub fn unmarshal<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, JsonError> {
        serde_json::from_slice(data).map_err(JsonError::Decoding)
    }

    pub fn unmarshal_str<T: DeserializeOwned>(&self, data: &str) -> Result<T, JsonError> {
        serde_json::from_str(data).map_err(JsonError::Decoding)
    }

    pub fn unmarshal_file<T: DeserializeOwned>(&self, path: &Path) -> Result<T, JsonError> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        self.unmarshal(&data)
    }

    /// Syntax check only; no value is built.
    pub fn valid(&self, data: &[u8]) -> bool {
        serde_json::from_slice::<IgnoredAny>(data).is_ok()
    }

    fn write<W, F, T>(&self, writer: W, value: &T, formatter: F) -> Result<(), JsonError>
    where
        W: Write,
        F: Formatter,
        T: Serialize + ?Sized,
    {
        let formatter = EscapingFormatter {
            inner: formatter,
            escape_html: self.escape_html,
        };
        let mut serializer = Serializer::with_formatter(writer, formatter);
        value
            .serialize(&mut serializer)
            .map_err(JsonError::Encoding)
    }
}

impl Default for JsonEngine {
    fn default() -> Self {
        Self::standard()
    }
}

fn apply_prefix(data: &[u8], prefix: &[u8]) -> Vec<u8> {
    let lines = data.iter().filter(|b| **b == b'\n').count();
    let mut out = Vec::with_capacity(data.len() + lines * prefix.len());
    for &byte in data {
        out.push(byte);
        if byte == b'\n' {
            out.extend_from_slice(prefix);
        }
    }
    out
}

/// Wraps a layout formatter and rewrites string fragments.
///
/// Only the layout hooks overridden by `PrettyFormatter` need forwarding;
/// everything else uses the trait defaults both formatters share.
struct EscapingFormatter<F> {
    inner: F,
    escape_html: bool,
}

impl<F: Formatter> Formatter for EscapingFormatter<F> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            let escaped = match ch {
                '<' if self.escape_html => "\\u003c",
                '>' if self.escape_html => "\\u003e",
                '&' if self.escape_html => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..index].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = index + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

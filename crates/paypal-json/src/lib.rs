//! # PayPal JSON
//!
//! JSON facade used by every request and response in the PayPal client.
//! Call sites use these free functions; the engine behind them is a single
//! process-wide instance configured once (see [`JsonEngine`]).
//!
//! ```
//! let bytes = paypal_json::marshal(&vec!["a", "b"]).unwrap();
//! let back: Vec<String> = paypal_json::unmarshal(&bytes).unwrap();
//! assert_eq!(back, vec!["a", "b"]);
//! ```

mod any;
mod engine;
mod error;
mod stream;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use any::{Any, PathSegment, ValueType};
pub use engine::{engine, JsonEngine};
pub use error::JsonError;
pub use stream::{Decoder, Encoder};

pub use serde_json::value::RawValue;
pub use serde_json::Number;

/// Unparsed JSON carried through encode/decode untouched.
pub type RawMessage = Box<RawValue>;

pub fn marshal<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, JsonError> {
    engine().marshal(value)
}

pub fn marshal_indent<T: Serialize + ?Sized>(
    value: &T,
    prefix: &str,
    indent: &str,
) -> Result<Vec<u8>, JsonError> {
    engine().marshal_indent(value, prefix, indent)
}

/// Four-space indented output.
pub fn marshal_pretty<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, JsonError> {
    engine().marshal_indent(value, "", "    ")
}

/// Lossy: returns an empty string when `value` cannot be encoded.
///
/// Use [`marshal`] when the failure matters.
pub fn marshal_string<T: Serialize + ?Sized>(value: &T) -> String {
    marshal(value)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default()
}

/// Lossy pretty variant of [`marshal_string`].
pub fn marshal_string_pretty<T: Serialize + ?Sized>(value: &T) -> String {
    marshal_pretty(value)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default()
}

pub fn unmarshal<T: DeserializeOwned>(data: &[u8]) -> Result<T, JsonError> {
    engine().unmarshal(data)
}

pub fn unmarshal_str<T: DeserializeOwned>(data: &str) -> Result<T, JsonError> {
    engine().unmarshal_str(data)
}

/// Reads the whole file and decodes it. The file is closed before returning.
pub fn unmarshal_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, JsonError> {
    engine().unmarshal_file(path.as_ref())
}

/// Lazy lookup by a path of keys and indexes.
pub fn get<'a>(data: &'a [u8], path: &[PathSegment<'_>]) -> Any<'a> {
    Any::parse(data).get(path)
}

pub fn valid(data: &[u8]) -> bool {
    engine().valid(data)
}

pub fn new_encoder<W: std::io::Write>(writer: W) -> Encoder<W> {
    Encoder::new(writer)
}

pub fn new_decoder<R: std::io::Read>(reader: R) -> Decoder<R> {
    Decoder::new(reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Field {
        op: String,
        path: String,
        value: serde_json::Value,
    }

    #[test]
    fn test_marshal_unmarshal_round_trip() {
        let fields = vec![Field {
            op: "replace".to_string(),
            path: "/url".to_string(),
            value: serde_json::json!("https://example.com/hook"),
        }];
        let bytes = marshal(&fields).unwrap();
        let back: Vec<Field> = unmarshal(&bytes).unwrap();
        assert_eq!(back, fields);
    }

    #[test]
    fn test_marshal_string() {
        assert_eq!(marshal_string(&serde_json::json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_marshal_string_swallows_error() {
        let mut unencodable = HashMap::new();
        unencodable.insert(vec![1u8], 1);
        assert_eq!(marshal_string(&unencodable), "");
        assert_eq!(marshal_string_pretty(&unencodable), "");
        assert!(marshal(&unencodable).is_err());
    }

    #[test]
    fn test_marshal_pretty_uses_four_spaces() {
        let text = marshal_string_pretty(&serde_json::json!({"a": 1}));
        assert_eq!(text, "{\n    \"a\": 1\n}");
    }

    #[test]
    fn test_unmarshal_str() {
        let value: HashMap<String, i32> = unmarshal_str(r#"{"x": 3}"#).unwrap();
        assert_eq!(value["x"], 3);
    }

    #[test]
    fn test_raw_message_alias() {
        let raw: RawMessage = unmarshal(br#"{"id":"evt_1"}"#).unwrap();
        assert_eq!(raw.get(), r#"{"id":"evt_1"}"#);
    }

    #[test]
    fn test_number_reexport() {
        let n: Number = unmarshal(b"12.5").unwrap();
        assert_eq!(n.as_f64(), Some(12.5));
    }

    #[test]
    fn test_valid_facade() {
        assert!(valid(b"[]"));
        assert!(!valid(b"[,]"));
    }

    #[test]
    fn test_stream_constructors() {
        let mut encoder = new_encoder(Vec::new());
        encoder.encode(&1).unwrap();
        let mut decoder = new_decoder(std::io::Cursor::new(encoder.into_inner()));
        assert_eq!(decoder.decode::<i32>().unwrap(), 1);
    }
}

//! Streaming encoder and decoder.

use std::io::{BufReader, Read, Write};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::de::IoRead;

use crate::engine::engine;
use crate::error::JsonError;

/// Writes one JSON value per call, each followed by a newline.
pub struct Encoder<W: Write> {
    writer: W,
    indent: Option<(String, String)>,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, indent: None }
    }

    /// Switch to indented output for subsequent values.
    pub fn set_indent(&mut self, prefix: impl Into<String>, indent: impl Into<String>) {
        self.indent = Some((prefix.into(), indent.into()));
    }

    pub fn encode<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), JsonError> {
        let bytes = match &self.indent {
            Some((prefix, indent)) => engine().marshal_indent(value, prefix, indent)?,
            None => engine().marshal(value)?,
        };
        self.writer.write_all(&bytes)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), JsonError> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Reads successive JSON values from a stream.
///
/// One deserializer lives for the whole stream, so a byte peeked while
/// finding the end of a value is kept for the next one.
pub struct Decoder<R: Read> {
    de: serde_json::Deserializer<IoRead<BufReader<R>>>,
}

impl<R: Read> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            de: serde_json::Deserializer::from_reader(BufReader::new(reader)),
        }
    }

    /// Whether another value follows, skipping leading whitespace.
    pub fn more(&mut self) -> Result<bool, JsonError> {
        match self.de.end() {
            Ok(()) => Ok(false),
            Err(e) if e.is_io() => Err(JsonError::Io(e.into())),
            Err(_) => Ok(true),
        }
    }

    pub fn decode<T: DeserializeOwned>(&mut self) -> Result<T, JsonError> {
        T::deserialize(&mut self.de).map_err(JsonError::Decoding)
    }
}

impl<R: Read> From<R> for Decoder<R> {
    fn from(reader: R) -> Self {
        Self::new(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Event {
        id: String,
        kind: String,
    }

    #[test]
    fn test_encoder_writes_newline_delimited() {
        let mut encoder = Encoder::new(Vec::new());
        encoder.encode(&serde_json::json!({"a": 1})).unwrap();
        encoder.encode(&"x<y").unwrap();
        let out = String::from_utf8(encoder.into_inner()).unwrap();
        assert_eq!(out, "{\"a\":1}\n\"x\\u003cy\"\n");
    }

    #[test]
    fn test_encoder_indent() {
        let mut encoder = Encoder::new(Vec::new());
        encoder.set_indent("", "  ");
        encoder.encode(&serde_json::json!({"a": 1})).unwrap();
        let out = String::from_utf8(encoder.into_inner()).unwrap();
        assert_eq!(out, "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_decoder_reads_values_in_order() {
        let input = "{\"id\":\"1\",\"kind\":\"a\"}\n{\"id\":\"2\",\"kind\":\"b\"}\n";
        let mut decoder = Decoder::new(Cursor::new(input));

        let mut events = Vec::new();
        while decoder.more().unwrap() {
            events.push(decoder.decode::<Event>().unwrap());
        }
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].id, "2");
    }

    #[test]
    fn test_decoder_mixed_types() {
        let mut decoder = Decoder::new(Cursor::new("[1,2] \"text\" 7 "));
        assert_eq!(decoder.decode::<Vec<u8>>().unwrap(), vec![1, 2]);
        assert_eq!(decoder.decode::<String>().unwrap(), "text");
        assert_eq!(decoder.decode::<u32>().unwrap(), 7);
        assert!(!decoder.more().unwrap());
    }

    #[test]
    fn test_decoder_number_followed_by_value() {
        let mut decoder = Decoder::new(Cursor::new("3[4]12\"x\""));
        assert_eq!(decoder.decode::<u32>().unwrap(), 3);
        assert!(decoder.more().unwrap());
        assert_eq!(decoder.decode::<Vec<u32>>().unwrap(), vec![4]);
        assert_eq!(decoder.decode::<u32>().unwrap(), 12);
        assert_eq!(decoder.decode::<String>().unwrap(), "x");
        assert!(!decoder.more().unwrap());
    }

    #[test]
    fn test_decoder_empty_stream() {
        let mut decoder = Decoder::new(Cursor::new("   \n\t "));
        assert!(!decoder.more().unwrap());
    }

    #[test]
    fn test_decoder_truncated_value() {
        let mut decoder = Decoder::new(Cursor::new("{\"id\":"));
        assert!(decoder.more().unwrap());
        let err = decoder.decode::<Event>().unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn test_encode_then_decode_stream() {
        let mut encoder = Encoder::new(Vec::new());
        let event = Event {
            id: "evt_1".to_string(),
            kind: "PAYMENT.SALE.COMPLETED".to_string(),
        };
        encoder.encode(&event).unwrap();

        let mut decoder = Decoder::from(Cursor::new(encoder.into_inner()));
        assert_eq!(decoder.decode::<Event>().unwrap(), event);
        assert!(!decoder.more().unwrap());
    }
}

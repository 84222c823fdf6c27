//! # Canonical Value Codec
//!
//! The deterministic, ordered-key value model used as the wire format for
//! persisted ledger state, with a self-delimiting byte encoding.
//!
//! ## Value Model
//!
//! - `Value`: null, bool, integer, binary, text, list, dictionary
//! - `Key`: dictionary keys are binary or text; binary keys order before
//!   text keys, lexicographically within each kind
//!
//! Dictionaries are `BTreeMap<Key, Value>`, so key order is canonical by
//! construction and encoding never has to sort.
//!
//! ## Byte Encoding
//!
//! | Value        | Encoding            |
//! |--------------|---------------------|
//! | null         | `n`                 |
//! | true / false | `t` / `f`           |
//! | integer      | `i<decimal>e`       |
//! | binary       | `<len>:<bytes>`     |
//! | text         | `u<len>:<utf8>`     |
//! | list         | `l<items>e`         |
//! | dictionary   | `d<key><value>…e`   |
//!
//! Decoding is strict: duplicate dictionary keys, trailing bytes, and
//! non-minimal integer/length literals are rejected.

use crate::errors::CodecError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A dictionary key: binary or text.
///
/// The derived ordering puts every binary key before every text key and is
/// lexicographic within each kind, which is the canonical key order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Raw byte-string key.
    Binary(Vec<u8>),
    /// UTF-8 text key.
    Text(String),
}

impl Key {
    /// Creates a text key.
    pub fn text(key: impl Into<String>) -> Self {
        Self::Text(key.into())
    }

    /// Creates a binary key.
    pub fn binary(key: impl Into<Vec<u8>>) -> Self {
        Self::Binary(key.into())
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Binary(bytes) => write_binary(out, bytes),
            Self::Text(text) => write_text(out, text),
        }
    }
}

/// A canonical value tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Absence of a value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i128),
    /// Raw byte string.
    Binary(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// Ordered sequence of values.
    List(Vec<Value>),
    /// Key-ordered mapping.
    Dict(BTreeMap<Key, Value>),
}

impl Value {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a binary value.
    pub fn binary(value: impl Into<Vec<u8>>) -> Self {
        Self::Binary(value.into())
    }

    /// Human-readable name of this value's kind, for error reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "integer",
            Self::Binary(_) => "binary",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
        }
    }

    /// Returns the integer payload, if this is an integer.
    pub fn as_int(&self) -> Option<i128> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the byte payload, if this is a binary value.
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the text payload, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the items, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the mapping, if this is a dictionary.
    pub fn as_dict(&self) -> Option<&BTreeMap<Key, Value>> {
        match self {
            Self::Dict(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a text key in a dictionary value.
    ///
    /// # Errors
    ///
    /// `TypeMismatch` if this value is not a dictionary, `MissingKey` if
    /// the key is absent.
    pub fn entry(&self, key: &'static str) -> Result<&Value, CodecError> {
        let map = self.as_dict().ok_or(CodecError::TypeMismatch {
            expected: "dict",
            found: self.kind(),
        })?;
        map.get(&Key::text(key)).ok_or(CodecError::MissingKey { key })
    }

    /// Encodes this value to its canonical byte form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Null => out.push(b'n'),
            Self::Bool(true) => out.push(b't'),
            Self::Bool(false) => out.push(b'f'),
            Self::Int(value) => {
                out.push(b'i');
                out.extend_from_slice(value.to_string().as_bytes());
                out.push(b'e');
            }
            Self::Binary(bytes) => write_binary(out, bytes),
            Self::Text(text) => write_text(out, text),
            Self::List(items) => {
                out.push(b'l');
                for item in items {
                    item.write(out);
                }
                out.push(b'e');
            }
            Self::Dict(map) => {
                out.push(b'd');
                for (key, value) in map {
                    key.write(out);
                    value.write(out);
                }
                out.push(b'e');
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Binary(bytes) => write!(f, "b\"{}\"", hex::encode(bytes)),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::List(items) => write!(f, "[{} items]", items.len()),
            Self::Dict(map) => write!(f, "{{{} keys}}", map.len()),
        }
    }
}

fn write_binary(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(bytes);
}

fn write_text(out: &mut Vec<u8>, text: &str) {
    out.push(b'u');
    out.extend_from_slice(text.len().to_string().as_bytes());
    out.push(b':');
    out.extend_from_slice(text.as_bytes());
}

/// Decodes a canonical byte string into a single value.
///
/// # Errors
///
/// Rejects malformed input, duplicate dictionary keys, non-minimal
/// integer/length literals, and trailing bytes after the value.
pub fn decode(input: &[u8]) -> Result<Value, CodecError> {
    let mut decoder = Decoder { input, pos: 0 };
    let value = decoder.value()?;
    if decoder.pos != input.len() {
        return Err(CodecError::TrailingBytes {
            remaining: input.len() - decoder.pos,
        });
    }
    Ok(value)
}

struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Decoder<'_> {
    fn peek(&self) -> Result<u8, CodecError> {
        self.input
            .get(self.pos)
            .copied()
            .ok_or(CodecError::UnexpectedEof { offset: self.pos })
    }

    fn take(&mut self, count: usize) -> Result<&[u8], CodecError> {
        let end = self
            .pos
            .checked_add(count)
            .filter(|&end| end <= self.input.len())
            .ok_or(CodecError::UnexpectedEof {
                offset: self.input.len(),
            })?;
        let slice = &self.input[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn value(&mut self) -> Result<Value, CodecError> {
        match self.peek()? {
            b'n' => {
                self.pos += 1;
                Ok(Value::Null)
            }
            b't' => {
                self.pos += 1;
                Ok(Value::Bool(true))
            }
            b'f' => {
                self.pos += 1;
                Ok(Value::Bool(false))
            }
            b'i' => self.integer(),
            b'u' => {
                self.pos += 1;
                Ok(Value::Text(self.text()?))
            }
            b'0'..=b'9' => Ok(Value::Binary(self.binary()?)),
            b'l' => self.list(),
            b'd' => self.dict(),
            byte => Err(CodecError::UnexpectedByte {
                byte,
                offset: self.pos,
            }),
        }
    }

    /// Parses a `<digits>:` length prefix. Leading zeros are rejected so
    /// every length has exactly one encoding.
    fn length(&mut self) -> Result<usize, CodecError> {
        let start = self.pos;
        let mut length: usize = 0;
        let mut digits = 0usize;
        loop {
            let byte = self.peek()?;
            self.pos += 1;
            match byte {
                b'0'..=b'9' => {
                    length = length
                        .checked_mul(10)
                        .and_then(|l| l.checked_add(usize::from(byte - b'0')))
                        .ok_or(CodecError::InvalidLength { offset: start })?;
                    digits += 1;
                }
                b':' => break,
                _ => return Err(CodecError::InvalidLength { offset: start }),
            }
        }
        if digits == 0 || (digits > 1 && self.input[start] == b'0') {
            return Err(CodecError::InvalidLength { offset: start });
        }
        Ok(length)
    }

    fn binary(&mut self) -> Result<Vec<u8>, CodecError> {
        let length = self.length()?;
        Ok(self.take(length)?.to_vec())
    }

    fn text(&mut self) -> Result<String, CodecError> {
        let start = self.pos;
        let length = self.length()?;
        let raw = self.take(length)?;
        String::from_utf8(raw.to_vec()).map_err(|_| CodecError::InvalidUtf8 { offset: start })
    }

    /// Parses `i<decimal>e`. Only the minimal decimal form is accepted:
    /// no leading zeros, no `-0`, no empty digit run.
    fn integer(&mut self) -> Result<Value, CodecError> {
        let start = self.pos;
        self.pos += 1;
        let negative = if self.peek()? == b'-' {
            self.pos += 1;
            true
        } else {
            false
        };

        let digits_start = self.pos;
        let mut magnitude: i128 = 0;
        loop {
            let byte = self.peek()?;
            self.pos += 1;
            match byte {
                b'0'..=b'9' => {
                    magnitude = magnitude
                        .checked_mul(10)
                        .and_then(|m| m.checked_add(i128::from(byte - b'0')))
                        .ok_or(CodecError::InvalidInteger { offset: start })?;
                }
                b'e' => break,
                _ => return Err(CodecError::InvalidInteger { offset: start }),
            }
        }

        let digits = self.pos - 1 - digits_start;
        let leading_zero = digits > 1 && self.input[digits_start] == b'0';
        if digits == 0 || leading_zero || (negative && magnitude == 0) {
            return Err(CodecError::InvalidInteger { offset: start });
        }
        Ok(Value::Int(if negative { -magnitude } else { magnitude }))
    }

    fn list(&mut self) -> Result<Value, CodecError> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            if self.peek()? == b'e' {
                self.pos += 1;
                return Ok(Value::List(items));
            }
            items.push(self.value()?);
        }
    }

    fn dict(&mut self) -> Result<Value, CodecError> {
        self.pos += 1;
        let mut map = BTreeMap::new();
        loop {
            if self.peek()? == b'e' {
                self.pos += 1;
                return Ok(Value::Dict(map));
            }
            let key_offset = self.pos;
            let key = self.key()?;
            let value = self.value()?;
            if map.insert(key, value).is_some() {
                return Err(CodecError::DuplicateKey { offset: key_offset });
            }
        }
    }

    fn key(&mut self) -> Result<Key, CodecError> {
        match self.peek()? {
            b'u' => {
                self.pos += 1;
                Ok(Key::Text(self.text()?))
            }
            b'0'..=b'9' => Ok(Key::Binary(self.binary()?)),
            byte => Err(CodecError::UnexpectedByte {
                byte,
                offset: self.pos,
            }),
        }
    }
}

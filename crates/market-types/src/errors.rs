//! Error types for the shared market types.

use thiserror::Error;

/// Canonical codec error.
///
/// Covers both byte-level decoding failures and value-shape mismatches hit
/// when reconstructing typed entities from decoded values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("unexpected byte {byte:#04x} at offset {offset}")]
    UnexpectedByte { byte: u8, offset: usize },

    #[error("invalid length prefix at offset {offset}")]
    InvalidLength { offset: usize },

    #[error("invalid integer literal at offset {offset}")]
    InvalidInteger { offset: usize },

    #[error("invalid UTF-8 in text at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("duplicate dictionary key at offset {offset}")]
    DuplicateKey { offset: usize },

    #[error("{remaining} trailing bytes after value")]
    TrailingBytes { remaining: usize },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing dictionary key \"{key}\"")]
    MissingKey { key: &'static str },

    #[error("field \"{field}\" is out of range")]
    OutOfRange { field: &'static str },
}

/// Failure to parse an address from its hex form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AddressParseError {
    #[error("address must encode {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

//! # Shared Market Types
//!
//! Cross-subsystem domain types for the market ledger, plus the canonical
//! value codec used as the wire format for persisted ledger state.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: address and product-id primitives and the
//!   `Listing` entity are defined here and consumed by every subsystem.
//! - **Deterministic Encoding**: all persisted state goes through the
//!   `canon` value model, whose dictionaries are key-ordered by
//!   construction. Two observably equal values always encode to the same
//!   bytes.
//!
//! ## Components
//!
//! - `canon`: canonical value model (`Value`, `Key`) and byte codec
//! - `entities`: `Address`, `ProductId`, `Listing`, well-known addresses
//! - `errors`: `CodecError`, `AddressParseError`

pub mod canon;
pub mod entities;
pub mod errors;

pub use canon::{Key, Value};
pub use entities::*;
pub use errors::*;

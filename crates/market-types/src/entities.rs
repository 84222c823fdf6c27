//! # Core Domain Entities
//!
//! Address and product-id primitives plus the `Listing` entity persisted by
//! the marketplace book.
//!
//! ## Type Decisions
//!
//! - `Address` is a 20-byte account identifier with a fixed canonical byte
//!   encoding and `0x`-prefixed lowercase hex text form.
//! - `ProductId` is a 128-bit UUID; its canonical encoding is the raw
//!   16-byte form, never the hyphenated text form.
//! - `Listing` equality is full value equality. Duplicate detection in the
//!   book relies on it, not just on the product id.

use crate::canon::{Key, Value};
use crate::errors::{AddressParseError, CodecError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A 20-byte account address.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address([u8; 20]);

impl Address {
    /// Canonical byte width of an address.
    pub const LEN: usize = 20;

    /// Creates an address from its raw bytes.
    pub const fn new(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Canonical encoding: the raw bytes as a binary value.
    pub fn to_canon(&self) -> Value {
        Value::binary(self.0.to_vec())
    }

    /// Reconstructs an address from its canonical encoding.
    pub fn from_canon(value: &Value) -> Result<Self, CodecError> {
        let bytes = value.as_binary().ok_or(CodecError::TypeMismatch {
            expected: "binary address",
            found: value.kind(),
        })?;
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| CodecError::OutOfRange { field: "address" })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(hex_part)?;
        let actual = bytes.len();
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| AddressParseError::InvalidLength {
                expected: Self::LEN,
                actual,
            })
    }
}

/// Globally unique identifier of one listing.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Canonical byte width of a product id.
    pub const LEN: usize = 16;

    /// Wraps an existing UUID.
    pub const fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Creates a product id from its raw 16-byte form.
    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Generates a fresh random product id for a new listing.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the raw 16-byte form.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        self.0.as_bytes()
    }

    /// Canonical encoding: the raw 16 bytes as a binary value.
    pub fn to_canon(&self) -> Value {
        Value::binary(self.as_bytes().to_vec())
    }

    /// Reconstructs a product id from its canonical encoding.
    pub fn from_canon(value: &Value) -> Result<Self, CodecError> {
        let bytes = value.as_binary().ok_or(CodecError::TypeMismatch {
            expected: "binary product id",
            found: value.kind(),
        })?;
        bytes
            .try_into()
            .map(|raw: [u8; Self::LEN]| Self(Uuid::from_bytes(raw)))
            .map_err(|_| CodecError::OutOfRange { field: "productId" })
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProductId({})", self.0)
    }
}

/// Well-known singleton addresses in the ledger state store.
pub mod addresses {
    use super::Address;

    /// Ledger address of the marketplace listing book.
    pub const SHOP: Address = Address([0u8; Address::LEN]);
}

/// An item offered for sale.
///
/// The book inspects only `product_id` (identity) and full value equality
/// (duplicate detection); `item` is an opaque canonical payload carried
/// through serialization untouched.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Globally unique identifier of this listing.
    pub product_id: ProductId,
    /// Account that listed the item and receives the proceeds.
    pub seller_agent: Address,
    /// In-game character the item is escrowed from.
    pub seller_avatar: Address,
    /// Asking price in base currency units.
    pub price: u64,
    /// Opaque item payload, already in canonical form.
    pub item: Value,
}

impl Listing {
    /// Canonical encoding: a dictionary with fixed text keys.
    pub fn to_canon(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert(Key::text("productId"), self.product_id.to_canon());
        map.insert(Key::text("sellerAgentAddress"), self.seller_agent.to_canon());
        map.insert(Key::text("sellerAvatarAddress"), self.seller_avatar.to_canon());
        map.insert(Key::text("price"), Value::Int(i128::from(self.price)));
        map.insert(Key::text("item"), self.item.clone());
        Value::Dict(map)
    }

    /// Reconstructs a listing from its canonical encoding.
    pub fn from_canon(value: &Value) -> Result<Self, CodecError> {
        let price_value = value.entry("price")?;
        let price = price_value
            .as_int()
            .ok_or(CodecError::TypeMismatch {
                expected: "integer price",
                found: price_value.kind(),
            })?
            .try_into()
            .map_err(|_| CodecError::OutOfRange { field: "price" })?;

        Ok(Self {
            product_id: ProductId::from_canon(value.entry("productId")?)?,
            seller_agent: Address::from_canon(value.entry("sellerAgentAddress")?)?,
            seller_avatar: Address::from_canon(value.entry("sellerAvatarAddress")?)?,
            price,
            item: value.entry("item")?.clone(),
        })
    }
}

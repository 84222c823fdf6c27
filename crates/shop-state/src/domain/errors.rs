//! Listing book error types.

use market_types::{Address, CodecError, ProductId};
use thiserror::Error;

/// Listing book error.
///
/// Every variant is a contract violation surfaced synchronously to the
/// caller; nothing is retried or swallowed here. The outer transaction
/// engine decides abort semantics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    /// `register` was asked to add a listing that already exists, either by
    /// value in the seller's sequence or by product id in the global index.
    #[error("shop already contains product {product_id} (seller {seller})")]
    DuplicateListing {
        seller: Address,
        product_id: ProductId,
    },

    /// `unregister` could not find the seller + product combination. Also
    /// reported when the global index lacks an entry the seller's sequence
    /// implies should exist, which signals index corruption.
    #[error("product {product_id} (seller {seller}) not found in shop")]
    ListingNotFound {
        seller: Address,
        product_id: ProductId,
    },

    /// Canonical decoding or value-shape failure while loading a snapshot.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An integrity check over a loaded snapshot found the indexes out of
    /// sync.
    #[error("corrupt shop state: {detail}")]
    Corrupt { detail: String },
}

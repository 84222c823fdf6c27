//! # Inbound Port - ShopApi
//!
//! Primary driving port exposing the listing book to the outer
//! state-transition engine.
//!
//! The trait surface is exactly the mutation boundary plus read-only
//! lookups and serialization: callers never see the raw indexes, so the
//! cross-index invariants cannot be broken from outside.

use crate::domain::{ShopError, ShopState};
use market_types::{Address, Listing, ProductId, Value};

/// Primary API for the listing book.
///
/// The outer engine is expected to serialize access to one instance (one
/// mutator at a time) and to discard the instance on transaction failure;
/// the book itself owns no concurrency.
pub trait ShopApi: Send + Sync {
    /// Registers a listing for a seller.
    ///
    /// # Errors
    /// - `DuplicateListing`: value-equal listing already in the seller's
    ///   sequence, or product id already in the book
    fn register(&mut self, seller: Address, listing: Listing) -> Result<ProductId, ShopError>;

    /// Unregisters the listing with the given product id, pruning the
    /// seller key if its sequence becomes empty.
    ///
    /// # Errors
    /// - `ListingNotFound`: unknown seller, unmatched product id, or a
    ///   corrupted global index
    fn unregister(&mut self, seller: Address, product_id: ProductId)
        -> Result<Listing, ShopError>;

    /// Unregisters by listing value.
    ///
    /// # Errors
    /// Same as `unregister`.
    fn unregister_listing(
        &mut self,
        seller: Address,
        listing: &Listing,
    ) -> Result<Listing, ShopError>;

    /// Non-failing, seller-scoped lookup. Never consults the global index.
    fn try_get(&self, seller: &Address, product_id: &ProductId) -> Option<(Address, &Listing)>;

    /// Checks whether a product id exists anywhere in the book.
    fn contains(&self, product_id: &ProductId) -> bool;

    /// Number of active listings.
    fn len(&self) -> usize;

    /// True if no listings are active.
    fn is_empty(&self) -> bool;

    /// Serializes the book to its canonical value form.
    fn to_canon(&self) -> Value;
}

impl ShopApi for ShopState {
    fn register(&mut self, seller: Address, listing: Listing) -> Result<ProductId, ShopError> {
        ShopState::register(self, seller, listing)
    }

    fn unregister(
        &mut self,
        seller: Address,
        product_id: ProductId,
    ) -> Result<Listing, ShopError> {
        ShopState::unregister(self, seller, product_id)
    }

    fn unregister_listing(
        &mut self,
        seller: Address,
        listing: &Listing,
    ) -> Result<Listing, ShopError> {
        ShopState::unregister_listing(self, seller, listing)
    }

    fn try_get(&self, seller: &Address, product_id: &ProductId) -> Option<(Address, &Listing)> {
        ShopState::try_get(self, seller, product_id)
    }

    fn contains(&self, product_id: &ProductId) -> bool {
        ShopState::contains(self, product_id)
    }

    fn len(&self) -> usize {
        ShopState::len(self)
    }

    fn is_empty(&self) -> bool {
        ShopState::is_empty(self)
    }

    fn to_canon(&self) -> Value {
        ShopState::to_canon(self)
    }
}

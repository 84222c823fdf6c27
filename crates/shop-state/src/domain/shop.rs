//! # Listing Book - Dual-Indexed Shop State
//!
//! Implements the marketplace listing book: every active listing is held
//! both in its seller's sequence and in a global product-id index.
//!
//! ## Data Structures
//!
//! - `agent_products`: seller address → insertion-ordered listings
//! - `products`: product id → listing, O(log n) global lookup
//!
//! ## Invariants Enforced
//!
//! - A product id is in `products` iff the identical listing value sits in
//!   exactly one seller's sequence
//! - No seller sequence contains two value-equal listings
//! - A seller key exists iff its sequence is non-empty (emptied sequences
//!   are pruned on removal; the deprecated `try_unregister` shim is the
//!   one documented exception)
//! - Product ids are unique across the whole book

use super::errors::ShopError;
use market_types::canon::{self, Key, Value};
use market_types::{addresses, Address, CodecError, Listing, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// The marketplace listing book.
///
/// A ledger-addressed singleton in production (`addresses::SHOP`), but
/// instance-constructible with any address for testing. Both indexes are
/// private; all mutation goes through `register`/`unregister`, so the
/// cross-index invariants hold unless this one boundary is buggy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopState {
    /// Ledger address identifying this book in the outer state store.
    address: Address,

    /// Listings grouped by the seller that registered them, in insertion
    /// order. Order is meaningful only for iteration stability.
    agent_products: BTreeMap<Address, Vec<Listing>>,

    /// Global secondary index over every active listing.
    products: BTreeMap<ProductId, Listing>,
}

impl ShopState {
    /// Creates the empty singleton book at the well-known shop address.
    pub fn new() -> Self {
        Self::with_address(addresses::SHOP)
    }

    /// Creates an empty book at an explicit address.
    pub fn with_address(address: Address) -> Self {
        Self {
            address,
            agent_products: BTreeMap::new(),
            products: BTreeMap::new(),
        }
    }

    /// Returns the ledger address of this book.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Returns the number of active listings.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if no listings are active.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Checks whether a product id exists anywhere in the book.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.products.contains_key(product_id)
    }

    /// Gets a listing from the global index.
    pub fn product(&self, product_id: &ProductId) -> Option<&Listing> {
        self.products.get(product_id)
    }

    /// Returns the number of sellers with at least one active listing.
    pub fn seller_count(&self) -> usize {
        self.agent_products.len()
    }

    /// Returns a seller's listings in insertion order. Empty if the seller
    /// has none.
    pub fn seller_listings(&self, seller: &Address) -> &[Listing] {
        self.agent_products
            .get(seller)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterates sellers in deterministic (address) order.
    pub fn sellers(&self) -> impl Iterator<Item = &Address> {
        self.agent_products.keys()
    }

    /// Registers a listing for a seller.
    ///
    /// Both duplicate checks run before any mutation, so a failed call
    /// leaves the book observably unchanged.
    ///
    /// # Errors
    ///
    /// `DuplicateListing` if the seller's sequence already contains a
    /// value-equal listing, or the product id already exists anywhere in
    /// the book.
    pub fn register(&mut self, seller: Address, listing: Listing) -> Result<ProductId, ShopError> {
        let product_id = listing.product_id;

        let duplicate_value = self
            .agent_products
            .get(&seller)
            .is_some_and(|listings| listings.contains(&listing));
        if duplicate_value || self.products.contains_key(&product_id) {
            return Err(ShopError::DuplicateListing { seller, product_id });
        }

        self.agent_products
            .entry(seller)
            .or_default()
            .push(listing.clone());
        self.products.insert(product_id, listing);

        debug!(%seller, product = %product_id, "listing registered");
        Ok(product_id)
    }

    /// Unregisters the listing with the given product id from a seller.
    ///
    /// Prunes the seller key if its sequence becomes empty. Returns the
    /// removed listing.
    ///
    /// # Errors
    ///
    /// `ListingNotFound` if the seller key is absent, no listing in the
    /// seller's sequence matches, or the global index lacks the id (the
    /// last case signals index corruption and cannot occur unless a
    /// snapshot was loaded without validation).
    pub fn unregister(
        &mut self,
        seller: Address,
        product_id: ProductId,
    ) -> Result<Listing, ShopError> {
        let Some(listings) = self.agent_products.get_mut(&seller) else {
            return Err(ShopError::ListingNotFound { seller, product_id });
        };
        let Some(index) = listings
            .iter()
            .position(|listing| listing.product_id == product_id)
        else {
            return Err(ShopError::ListingNotFound { seller, product_id });
        };

        listings.remove(index);
        if listings.is_empty() {
            self.agent_products.remove(&seller);
        }

        match self.products.remove(&product_id) {
            Some(listing) => {
                debug!(%seller, product = %product_id, "listing unregistered");
                Ok(listing)
            }
            None => {
                warn!(%seller, product = %product_id, "global index lacked a product the seller sequence held");
                Err(ShopError::ListingNotFound { seller, product_id })
            }
        }
    }

    /// Unregisters by listing value; equivalent to `unregister` with the
    /// listing's product id.
    pub fn unregister_listing(
        &mut self,
        seller: Address,
        listing: &Listing,
    ) -> Result<Listing, ShopError> {
        self.unregister(seller, listing.product_id)
    }

    /// Non-failing, seller-scoped lookup.
    ///
    /// Scans only the seller's own sequence, never the global index: a
    /// product listed by a different seller is not found.
    pub fn try_get(&self, seller: &Address, product_id: &ProductId) -> Option<(Address, &Listing)> {
        let found = self
            .agent_products
            .get(seller)?
            .iter()
            .find(|listing| listing.product_id == *product_id)?;
        Some((*seller, found))
    }

    /// Legacy combined lookup-and-remove.
    ///
    /// Removes the found listing from both indexes but, unlike
    /// `unregister`, leaves an emptied seller key in place.
    #[deprecated(note = "use `unregister`; this path does not prune an emptied seller key")]
    pub fn try_unregister(
        &mut self,
        seller: &Address,
        product_id: &ProductId,
    ) -> Option<Listing> {
        let listings = self.agent_products.get_mut(seller)?;
        let index = listings
            .iter()
            .position(|listing| listing.product_id == *product_id)?;
        let removed = listings.remove(index);
        self.products.remove(&removed.product_id);
        Some(removed)
    }

    /// Serializes the book to its canonical value form.
    ///
    /// Top-level keys: `address` (this book's identity), `agentProducts`
    /// (binary seller address → list of listings), `products` (binary
    /// product id → listing). Dictionary ordering makes the result
    /// byte-for-byte reproducible for equal books.
    pub fn to_canon(&self) -> Value {
        let mut agents = BTreeMap::new();
        for (seller, listings) in &self.agent_products {
            agents.insert(
                Key::binary(seller.as_bytes().to_vec()),
                Value::List(listings.iter().map(Listing::to_canon).collect()),
            );
        }

        let mut products = BTreeMap::new();
        for (product_id, listing) in &self.products {
            products.insert(
                Key::binary(product_id.as_bytes().to_vec()),
                listing.to_canon(),
            );
        }

        let mut root = BTreeMap::new();
        root.insert(Key::text("address"), self.address.to_canon());
        root.insert(Key::text("agentProducts"), Value::Dict(agents));
        root.insert(Key::text("products"), Value::Dict(products));
        Value::Dict(root)
    }

    /// Reconstructs a book from its canonical value form.
    ///
    /// Both indexes are rebuilt independently from the encoded mappings
    /// and are NOT cross-checked: snapshots are only ever produced by
    /// `to_canon`, so they are assumed self-consistent. Run `validate`
    /// after loading bytes from an untrusted source.
    pub fn from_canon(value: &Value) -> Result<Self, ShopError> {
        let address = Address::from_canon(value.entry("address")?)?;

        let agents_value = value.entry("agentProducts")?;
        let agents = agents_value.as_dict().ok_or(CodecError::TypeMismatch {
            expected: "dict",
            found: agents_value.kind(),
        })?;
        let mut agent_products = BTreeMap::new();
        for (key, listings_value) in agents {
            let seller = address_from_key(key)?;
            let items = listings_value.as_list().ok_or(CodecError::TypeMismatch {
                expected: "list of listings",
                found: listings_value.kind(),
            })?;
            let listings = items
                .iter()
                .map(Listing::from_canon)
                .collect::<Result<Vec<_>, _>>()?;
            agent_products.insert(seller, listings);
        }

        let products_value = value.entry("products")?;
        let indexed = products_value.as_dict().ok_or(CodecError::TypeMismatch {
            expected: "dict",
            found: products_value.kind(),
        })?;
        let mut products = BTreeMap::new();
        for (key, listing_value) in indexed {
            products.insert(product_id_from_key(key)?, Listing::from_canon(listing_value)?);
        }

        Ok(Self {
            address,
            agent_products,
            products,
        })
    }

    /// Serializes the book to canonical bytes.
    pub fn encode(&self) -> Vec<u8> {
        self.to_canon().to_bytes()
    }

    /// Reconstructs a book from canonical bytes. Trust-on-load, like
    /// `from_canon`.
    pub fn decode(bytes: &[u8]) -> Result<Self, ShopError> {
        Self::from_canon(&canon::decode(bytes)?)
    }

    /// Explicit cross-index integrity check.
    ///
    /// Verifies everything deserialization deliberately skips: non-empty
    /// sequences, no value-equal duplicates per seller, product-id
    /// uniqueness across sellers, and exact agreement between the two
    /// indexes. Reports the first violation found.
    pub fn validate(&self) -> Result<(), ShopError> {
        let mut seen = BTreeSet::new();
        for (seller, listings) in &self.agent_products {
            if listings.is_empty() {
                return Err(ShopError::Corrupt {
                    detail: format!("seller {seller} has an empty sequence"),
                });
            }
            for (index, listing) in listings.iter().enumerate() {
                if listings[..index].contains(listing) {
                    return Err(ShopError::Corrupt {
                        detail: format!(
                            "seller {seller} holds two equal listings for product {}",
                            listing.product_id
                        ),
                    });
                }
                if !seen.insert(listing.product_id) {
                    return Err(ShopError::Corrupt {
                        detail: format!(
                            "product {} appears in more than one sequence",
                            listing.product_id
                        ),
                    });
                }
                match self.products.get(&listing.product_id) {
                    Some(indexed) if indexed == listing => {}
                    Some(_) => {
                        return Err(ShopError::Corrupt {
                            detail: format!(
                                "product {} differs between the two indexes",
                                listing.product_id
                            ),
                        })
                    }
                    None => {
                        return Err(ShopError::Corrupt {
                            detail: format!(
                                "product {} is missing from the global index",
                                listing.product_id
                            ),
                        })
                    }
                }
            }
        }

        if let Some(orphan) = self.products.keys().find(|id| !seen.contains(id)) {
            return Err(ShopError::Corrupt {
                detail: format!("product {orphan} is not held by any seller"),
            });
        }
        Ok(())
    }
}

impl Default for ShopState {
    fn default() -> Self {
        Self::new()
    }
}

fn address_from_key(key: &Key) -> Result<Address, CodecError> {
    let Key::Binary(bytes) = key else {
        return Err(CodecError::TypeMismatch {
            expected: "binary seller key",
            found: "text",
        });
    };
    <[u8; Address::LEN]>::try_from(bytes.as_slice())
        .map(Address::new)
        .map_err(|_| CodecError::OutOfRange { field: "address" })
}

fn product_id_from_key(key: &Key) -> Result<ProductId, CodecError> {
    let Key::Binary(bytes) = key else {
        return Err(CodecError::TypeMismatch {
            expected: "binary product key",
            found: "text",
        });
    };
    <[u8; ProductId::LEN]>::try_from(bytes.as_slice())
        .map(ProductId::from_bytes)
        .map_err(|_| CodecError::OutOfRange { field: "productId" })
}

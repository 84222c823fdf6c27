//! # Integration Test Flows
//!
//! End-to-end listing scenarios driven through the `ShopApi` port, the way
//! the outer transition engine uses the book while applying transactions.

#[cfg(test)]
mod tests {
    use market_types::{Address, Listing, ProductId, Value};
    use shop_state::{ShopApi, ShopError, ShopState};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn seller(byte: u8) -> Address {
        Address::new([byte; 20])
    }

    fn listing(owner: Address, id: ProductId, price: u64) -> Listing {
        Listing {
            product_id: id,
            seller_agent: owner,
            seller_avatar: owner,
            price,
            item: Value::text("potion"),
        }
    }

    fn product(byte: u8) -> ProductId {
        ProductId::from_bytes([byte; 16])
    }

    // =========================================================================
    // LISTING LIFECYCLE
    // =========================================================================

    /// Re-registering the same listing fails and the book still
    /// contains exactly one listing for the product id.
    #[test]
    fn test_double_register_rejected() {
        let mut shop = ShopState::new();
        let owner = seller(0xA1);
        let item = listing(owner, product(0x01), 100);

        shop.register(owner, item.clone()).unwrap();
        let result = shop.register(owner, item.clone());

        assert_eq!(
            result,
            Err(ShopError::DuplicateListing {
                seller: owner,
                product_id: item.product_id
            })
        );
        assert_eq!(shop.len(), 1);
        assert_eq!(shop.seller_listings(&owner).len(), 1);
    }

    /// After unregistering a seller's only listing, the seller
    /// key is gone and only the other seller's product remains indexed.
    #[test]
    fn test_unregister_clears_seller_and_global_entry() {
        let mut shop = ShopState::new();
        let seller_x = seller(0xA1);
        let seller_y = seller(0xB2);
        let item_1 = listing(seller_x, product(0x01), 100);
        let item_2 = listing(seller_y, product(0x02), 200);

        shop.register(seller_x, item_1.clone()).unwrap();
        shop.register(seller_y, item_2.clone()).unwrap();
        shop.unregister(seller_x, item_1.product_id).unwrap();

        assert!(shop.try_get(&seller_x, &item_1.product_id).is_none());
        assert!(shop.sellers().all(|s| *s != seller_x));
        assert!(!shop.contains(&item_1.product_id));
        assert!(shop.contains(&item_2.product_id));
        assert_eq!(shop.len(), 1);
    }

    /// Unregistering from a seller that never registered
    /// anything fails with not-found.
    #[test]
    fn test_unregister_unknown_seller_rejected() {
        let mut shop = ShopState::new();
        let ghost = seller(0xEE);
        let id = product(0x63);

        assert_eq!(
            shop.unregister(ghost, id),
            Err(ShopError::ListingNotFound {
                seller: ghost,
                product_id: id
            })
        );
    }

    /// Serialize a two-seller, three-listing book, reload it,
    /// and check all three lookups behave identically.
    #[test]
    fn test_reloaded_book_answers_lookups_identically() {
        let mut shop = ShopState::new();
        let seller_x = seller(0xA1);
        let seller_y = seller(0xB2);
        let items = [
            (seller_x, listing(seller_x, product(0x01), 100)),
            (seller_x, listing(seller_x, product(0x02), 150)),
            (seller_y, listing(seller_y, product(0x03), 200)),
        ];
        for (owner, item) in &items {
            shop.register(*owner, item.clone()).unwrap();
        }

        let restored = ShopState::decode(&shop.encode()).unwrap();

        for (owner, item) in &items {
            assert_eq!(
                restored.try_get(owner, &item.product_id),
                shop.try_get(owner, &item.product_id)
            );
            assert_eq!(
                restored.try_get(owner, &item.product_id).map(|(_, l)| l),
                Some(item)
            );
        }
    }

    // =========================================================================
    // TRANSACTION-ENGINE STYLE FLOWS
    // =========================================================================

    /// Drive the book exclusively through the port, as the transition
    /// engine does.
    #[test]
    fn test_list_cancel_relist_through_port() {
        let mut shop: Box<dyn ShopApi> = Box::<ShopState>::default();
        let owner = seller(0xC3);
        let item = listing(owner, product(0x10), 900);

        let id = shop.register(owner, item.clone()).unwrap();
        let cancelled = shop.unregister_listing(owner, &item).unwrap();
        assert_eq!(cancelled.product_id, id);

        // Relisting the same product after cancellation is a fresh listing.
        shop.register(owner, item).unwrap();
        assert_eq!(shop.len(), 1);
    }

    /// A failed register mid-"transaction" leaves earlier registrations
    /// intact and nothing half-applied; the outer engine can re-serialize
    /// the exact pre-failure state.
    #[test]
    fn test_failed_register_leaves_committed_state_intact() {
        let mut shop = ShopState::new();
        let seller_x = seller(0xA1);
        let seller_y = seller(0xB2);

        shop.register(seller_x, listing(seller_x, product(0x01), 100))
            .unwrap();
        let committed = shop.encode();

        // Same product id offered by another seller: rejected pre-mutation.
        let result = shop.register(seller_y, listing(seller_y, product(0x01), 999));
        assert!(matches!(result, Err(ShopError::DuplicateListing { .. })));

        assert_eq!(shop.encode(), committed);
        assert!(shop.validate().is_ok());
    }

    #[test]
    fn test_interleaved_sellers_keep_sequences_independent() {
        let mut shop = ShopState::new();
        let seller_x = seller(0xA1);
        let seller_y = seller(0xB2);

        shop.register(seller_x, listing(seller_x, product(0x01), 10))
            .unwrap();
        shop.register(seller_y, listing(seller_y, product(0x02), 20))
            .unwrap();
        shop.register(seller_x, listing(seller_x, product(0x03), 30))
            .unwrap();

        let x_products: Vec<_> = shop
            .seller_listings(&seller_x)
            .iter()
            .map(|l| l.product_id)
            .collect();
        assert_eq!(x_products, vec![product(0x01), product(0x03)]);
        assert_eq!(shop.seller_listings(&seller_y).len(), 1);
        assert_eq!(shop.len(), 3);
    }
}

//! The buyer's cart, persisted on every mutation.

use std::sync::{Arc, RwLock};

use common::ProductId;
use domain::{CartItem, CartItemPatch, CartTotals, GST_RATE_BPS, item_count};
use snapshot_store::{Result, SnapshotStore};

/// Snapshot key for the cart line sequence.
pub const CART_KEY: &str = "cart";

/// Holds the buyer's pending selections.
///
/// Lines are keyed by product ID; adding a product already in the cart
/// replaces that line wholesale. Every mutation durably persists the
/// full cart snapshot before returning, and totals are recomputed from
/// the lines on every call.
#[derive(Clone)]
pub struct CartStore<S: SnapshotStore> {
    items: Arc<RwLock<Vec<CartItem>>>,
    store: S,
    tax_rate_bps: u32,
}

impl<S: SnapshotStore> CartStore<S> {
    /// Loads the cart from the store; a missing or unreadable snapshot
    /// starts an empty cart.
    pub fn new(store: S) -> Self {
        Self::with_tax_rate(store, GST_RATE_BPS)
    }

    /// Loads the cart with an explicit tax rate in basis points.
    pub fn with_tax_rate(store: S, tax_rate_bps: u32) -> Self {
        let items = store.load_or_default(CART_KEY);
        Self {
            items: Arc::new(RwLock::new(items)),
            store,
            tax_rate_bps,
        }
    }

    /// Adds a line, replacing any existing line with the same product ID.
    pub fn add_item(&self, item: CartItem) -> Result<()> {
        let mut items = self.items.write().unwrap();
        match items.iter().position(|i| i.product_id == item.product_id) {
            Some(index) => items[index] = item,
            None => items.push(item),
        }
        self.store.save(CART_KEY, &*items)
    }

    /// Removes the matching line; a no-op when absent.
    pub fn remove_item(&self, product_id: &ProductId) -> Result<()> {
        let mut items = self.items.write().unwrap();
        items.retain(|i| &i.product_id != product_id);
        self.store.save(CART_KEY, &*items)
    }

    /// Merges partial fields into the matching line; a no-op when absent.
    pub fn update_item(&self, product_id: &ProductId, patch: &CartItemPatch) -> Result<()> {
        let mut items = self.items.write().unwrap();
        if let Some(item) = items.iter_mut().find(|i| &i.product_id == product_id) {
            patch.apply_to(item);
        }
        self.store.save(CART_KEY, &*items)
    }

    /// Empties the cart.
    pub fn clear(&self) -> Result<()> {
        let mut items = self.items.write().unwrap();
        items.clear();
        self.store.save(CART_KEY, &*items)
    }

    /// Returns a copy of the current lines, in insertion order.
    pub fn items(&self) -> Vec<CartItem> {
        self.items.read().unwrap().clone()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.read().unwrap().is_empty()
    }

    /// Total quantity across all lines.
    pub fn item_count(&self) -> u32 {
        item_count(&self.items.read().unwrap())
    }

    /// Computes subtotal, tax, and total from the current lines.
    pub fn totals(&self) -> CartTotals {
        CartTotals::compute(&self.items.read().unwrap(), self.tax_rate_bps)
    }
}

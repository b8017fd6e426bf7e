//! redb-backed cart persistence
//!
//! The storefront serializes the full cart after every transition and
//! restores it on startup, so a cart survives restarts on the same device
//! (cross-session, not cross-device).

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use thiserror::Error;

use super::Cart;

/// Single-row table: key = "cart", value = JSON-serialized Cart
const CART_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cart_state");

const CART_KEY: &str = "cart";

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Local cart store
pub struct CartStore {
    db: Database,
}

impl CartStore {
    /// Open (or create) the store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CartStoreError> {
        let db = Database::create(path)?;
        Ok(Self { db })
    }

    /// Persist the cart, replacing any previous snapshot.
    pub fn save(&self, cart: &Cart) -> Result<(), CartStoreError> {
        let bytes = serde_json::to_vec(cart)?;
        let tx = self.db.begin_write()?;
        {
            let mut table = tx.open_table(CART_TABLE)?;
            table.insert(CART_KEY, bytes.as_slice())?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Load the persisted cart; an absent or unreadable snapshot yields the
    /// empty cart.
    pub fn load(&self) -> Result<Cart, CartStoreError> {
        let tx = self.db.begin_read()?;
        let table = match tx.open_table(CART_TABLE) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Cart::default()),
            Err(e) => return Err(e.into()),
        };
        match table.get(CART_KEY)? {
            Some(bytes) => match serde_json::from_slice(bytes.value()) {
                Ok(cart) => Ok(cart),
                Err(e) => {
                    tracing::warn!("Discarding unreadable cart snapshot: {e}");
                    Ok(Cart::default())
                }
            },
            None => Ok(Cart::default()),
        }
    }

    /// Drop the persisted cart (checkout or explicit user action).
    pub fn clear(&self) -> Result<(), CartStoreError> {
        let tx = self.db.begin_write()?;
        {
            let mut table = tx.open_table(CART_TABLE)?;
            table.remove(CART_KEY)?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartAction, ProductRef};

    fn temp_store() -> (tempfile::TempDir, CartStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = CartStore::open(dir.path().join("cart.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_load_missing_yields_empty_cart() {
        let (_dir, store) = temp_store();
        assert_eq!(store.load().unwrap(), Cart::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_dir, store) = temp_store();
        let cart = Cart::default().apply(CartAction::Add {
            product: ProductRef {
                product_id: "p1".to_string(),
                name: "Widget".to_string(),
                sku: "W-1".to_string(),
                unit_price: 19.99,
                stock: 8,
            },
            quantity: 2,
        });
        store.save(&cart).unwrap();
        assert_eq!(store.load().unwrap(), cart);
    }

    #[test]
    fn test_clear_drops_snapshot() {
        let (_dir, store) = temp_store();
        let cart = Cart::default().apply(CartAction::Add {
            product: ProductRef {
                product_id: "p1".to_string(),
                name: "Widget".to_string(),
                sku: "W-1".to_string(),
                unit_price: 5.0,
                stock: 3,
            },
            quantity: 1,
        });
        store.save(&cart).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), Cart::default());
    }
}

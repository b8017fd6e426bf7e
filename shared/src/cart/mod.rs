//! Storefront cart reducer
//!
//! The cart is an immutable value driven by four actions. Transitions are
//! total: out-of-range quantities are clamped by an explicit policy
//! function, never rejected. Totals are recomputed after every transition
//! via [`crate::money::compute_totals`].
//!
//! The cart lives entirely client-side and is never the source of truth
//! for a placed order; [`store::CartStore`] persists it across sessions.

mod store;

pub use store::{CartStore, CartStoreError};

use serde::{Deserialize, Serialize};

use crate::money::{self, CartTotals, Priced};

/// The product fields the cart needs when a line is added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub unit_price: f64,
    pub stock: u32,
}

/// A single cart line. Carries the stock ceiling captured at add time so
/// later quantity updates can clamp without a product lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub stock: u32,
    pub total_price: f64,
}

impl Priced for CartLine {
    fn unit_price(&self) -> f64 {
        self.unit_price
    }
    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Cart actions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartAction {
    Add { product: ProductRef, quantity: u32 },
    Remove { product_id: String },
    UpdateQuantity { product_id: String, quantity: i64 },
    Clear,
}

/// Quantity clamping policy: floor 1, ceiling `stock`.
///
/// Kept separate from the dispatch so the policy itself is testable.
pub fn clamp_quantity(requested: u32, stock: u32) -> u32 {
    requested.max(1).min(stock.max(1))
}

/// The cart value: line items plus derived totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartLine>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub shipping_cost: f64,
    pub total_amount: f64,
}

impl Cart {
    /// Apply an action, returning the next cart value.
    ///
    /// Transitions never fail; invalid quantities are clamped.
    pub fn apply(self, action: CartAction) -> Cart {
        match action {
            CartAction::Add { product, quantity } => self.add(product, quantity),
            CartAction::Remove { product_id } => self.remove(&product_id),
            CartAction::UpdateQuantity { product_id, quantity } => {
                if quantity <= 0 {
                    self.remove(&product_id)
                } else {
                    self.update_quantity(&product_id, quantity as u32)
                }
            }
            CartAction::Clear => Cart::default(),
        }
    }

    fn add(mut self, product: ProductRef, quantity: u32) -> Cart {
        match self
            .items
            .iter_mut()
            .find(|line| line.product_id == product.product_id)
        {
            Some(line) => {
                // the incoming ProductRef carries the fresher stock and price
                line.stock = product.stock;
                line.unit_price = product.unit_price;
                line.quantity = clamp_quantity(line.quantity.saturating_add(quantity), line.stock);
                line.total_price = money::line_total(line.unit_price, line.quantity);
            }
            None => {
                let quantity = clamp_quantity(quantity, product.stock);
                self.items.push(CartLine {
                    total_price: money::line_total(product.unit_price, quantity),
                    product_id: product.product_id,
                    name: product.name,
                    sku: product.sku,
                    unit_price: product.unit_price,
                    quantity,
                    stock: product.stock,
                });
            }
        }
        self.recompute()
    }

    fn remove(mut self, product_id: &str) -> Cart {
        self.items.retain(|line| line.product_id != product_id);
        self.recompute()
    }

    fn update_quantity(mut self, product_id: &str, quantity: u32) -> Cart {
        if let Some(line) = self.items.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = clamp_quantity(quantity, line.stock);
            line.total_price = money::line_total(line.unit_price, line.quantity);
        }
        self.recompute()
    }

    fn recompute(mut self) -> Cart {
        let CartTotals {
            subtotal,
            tax_amount,
            shipping_cost,
            total_amount,
        } = money::compute_totals(&self.items);
        self.subtotal = subtotal;
        self.tax_amount = tax_amount;
        self.shipping_cost = shipping_cost;
        self.total_amount = total_amount;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64, stock: u32) -> ProductRef {
        ProductRef {
            product_id: id.to_string(),
            name: format!("Product {id}"),
            sku: format!("SKU-{id}"),
            unit_price: price,
            stock,
        }
    }

    #[test]
    fn test_add_new_line() {
        let cart = Cart::default().apply(CartAction::Add {
            product: product("p1", 100.0, 10),
            quantity: 3,
        });
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.items[0].total_price, 300.0);
        assert_eq!(cart.subtotal, 300.0);
        assert_eq!(cart.shipping_cost, 50.0);
        assert_eq!(cart.total_amount, 350.0);
    }

    #[test]
    fn test_add_merges_existing_line() {
        let cart = Cart::default()
            .apply(CartAction::Add {
                product: product("p1", 10.0, 10),
                quantity: 2,
            })
            .apply(CartAction::Add {
                product: product("p1", 10.0, 10),
                quantity: 3,
            });
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 5);
    }

    #[test]
    fn test_add_merge_uses_fresh_stock_and_price() {
        let cart = Cart::default()
            .apply(CartAction::Add {
                product: product("p1", 10.0, 2),
                quantity: 2,
            })
            .apply(CartAction::Add {
                product: product("p1", 12.0, 5),
                quantity: 3,
            });
        // clamped against the restocked level, not the stale snapshot
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].stock, 5);
        assert_eq!(cart.items[0].unit_price, 12.0);
        assert_eq!(cart.items[0].total_price, 60.0);
    }

    #[test]
    fn test_add_clamps_to_stock_without_error() {
        let cart = Cart::default().apply(CartAction::Add {
            product: product("p1", 10.0, 4),
            quantity: 99,
        });
        assert_eq!(cart.items[0].quantity, 4);
    }

    #[test]
    fn test_add_zero_quantity_floors_to_one() {
        let cart = Cart::default().apply(CartAction::Add {
            product: product("p1", 10.0, 4),
            quantity: 0,
        });
        assert_eq!(cart.items[0].quantity, 1);
    }

    #[test]
    fn test_update_quantity_idempotent() {
        let base = Cart::default().apply(CartAction::Add {
            product: product("p1", 10.0, 10),
            quantity: 1,
        });
        let once = base.clone().apply(CartAction::UpdateQuantity {
            product_id: "p1".to_string(),
            quantity: 7,
        });
        let twice = once.clone().apply(CartAction::UpdateQuantity {
            product_id: "p1".to_string(),
            quantity: 7,
        });
        assert_eq!(once, twice);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let cart = Cart::default()
            .apply(CartAction::Add {
                product: product("p1", 10.0, 10),
                quantity: 2,
            })
            .apply(CartAction::UpdateQuantity {
                product_id: "p1".to_string(),
                quantity: 0,
            });
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal, 0.0);
    }

    #[test]
    fn test_remove_unknown_product_is_noop() {
        let cart = Cart::default()
            .apply(CartAction::Add {
                product: product("p1", 10.0, 10),
                quantity: 2,
            })
            .apply(CartAction::Remove {
                product_id: "missing".to_string(),
            });
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn test_clear_resets_to_empty_constant() {
        let cart = Cart::default()
            .apply(CartAction::Add {
                product: product("p1", 300.0, 10),
                quantity: 2,
            })
            .apply(CartAction::Clear);
        assert_eq!(cart, Cart::default());
        assert_eq!(cart.total_amount, 0.0);
    }

    #[test]
    fn test_clamp_policy() {
        assert_eq!(clamp_quantity(0, 5), 1);
        assert_eq!(clamp_quantity(3, 5), 3);
        assert_eq!(clamp_quantity(9, 5), 5);
        // Zero stock still floors to one rather than erroring
        assert_eq!(clamp_quantity(2, 0), 1);
    }
}

//! Order line item

use serde::{Deserialize, Serialize};

use crate::money::{self, Priced};

/// A product entry inside an order.
///
/// Invariant: `total_price == round2(unit_price × quantity)`; maintained by
/// the constructor, never edited field-by-field. Owned by the containing
/// order, never shared between aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub total_price: f64,
}

impl LineItem {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        sku: impl Into<String>,
        unit_price: f64,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            sku: sku.into(),
            unit_price,
            quantity,
            total_price: money::line_total(unit_price, quantity),
        }
    }
}

impl Priced for LineItem {
    fn unit_price(&self) -> f64 {
        self.unit_price
    }
    fn quantity(&self) -> u32 {
        self.quantity
    }
}

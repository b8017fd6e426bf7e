//! Totals Calculator
//!
//! Cent-precision arithmetic for carts and orders.
//! Uses rust_decimal for precise calculations, stores as f64.

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Orders at or below this subtotal pay the flat shipping fee.
pub const FREE_SHIPPING_THRESHOLD: f64 = 500.0;

/// Flat shipping fee charged below the free-shipping threshold.
pub const FLAT_SHIPPING_FEE: f64 = 50.0;

/// Convert f64 to Decimal for calculation
#[inline]
fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Round a monetary value to cents (half-up).
pub fn round2(value: f64) -> f64 {
    to_f64(to_decimal(value))
}

/// Anything with a unit price and a quantity.
///
/// Implemented by [`crate::cart::CartLine`] and [`crate::models::LineItem`]
/// so both feed the same totals calculation.
pub trait Priced {
    fn unit_price(&self) -> f64;
    fn quantity(&self) -> u32;
}

/// Line total: round2(unit_price × quantity)
pub fn line_total(unit_price: f64, quantity: u32) -> f64 {
    to_f64(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Shipping rule: free above the threshold, flat fee at or below it.
pub fn shipping_cost(subtotal: f64) -> f64 {
    if subtotal > FREE_SHIPPING_THRESHOLD {
        0.0
    } else {
        FLAT_SHIPPING_FEE
    }
}

/// Computed cart totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    pub shipping_cost: f64,
    pub total_amount: f64,
}

/// Storefront totals: threshold-based shipping, no tax.
///
/// subtotal = round2(Σ unit_price × quantity); shipping per
/// [`shipping_cost`]; total = round2(subtotal + shipping + tax).
/// Always defined, including for an empty item list.
pub fn compute_totals<T: Priced>(items: &[T]) -> CartTotals {
    let subtotal = items.iter().fold(Decimal::ZERO, |acc, item| {
        acc + to_decimal(item.unit_price()) * Decimal::from(item.quantity())
    });
    let subtotal = to_f64(subtotal);

    let shipping = shipping_cost(subtotal);
    let tax = 0.0;

    CartTotals {
        subtotal,
        tax_amount: tax,
        shipping_cost: shipping,
        total_amount: to_f64(to_decimal(subtotal) + to_decimal(shipping) + to_decimal(tax)),
    }
}

/// Admin order form totals: operator-entered components, simply summed.
///
/// total = round2(subtotal + tax + shipping − discount)
pub fn sum_totals(subtotal: f64, tax_amount: f64, shipping_cost: f64, discount_amount: f64) -> f64 {
    to_f64(
        to_decimal(subtotal) + to_decimal(tax_amount) + to_decimal(shipping_cost)
            - to_decimal(discount_amount),
    )
}

//! Shared domain logic for the SP panel suite.
//!
//! This crate holds everything the storefront client and the panel server
//! have to agree on:
//!
//! - **Money** (`money`): cent-precision totals calculation
//! - **Cart** (`cart`): the storefront cart reducer and its local store
//! - **Models** (`models`): line items, addresses, status enums, roles
//!
//! It deliberately has no HTTP or server-side database dependencies.

pub mod cart;
pub mod models;
pub mod money;
pub mod util;

pub use cart::{Cart, CartAction, CartLine, CartStore, ProductRef};
pub use models::{Address, LineItem, OrderStatus, PaymentMethod, PaymentStatus, Role};
pub use money::{CartTotals, compute_totals, shipping_cost, sum_totals};

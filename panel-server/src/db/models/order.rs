//! Order model

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

use shared::models::{Address, LineItem, OrderStatus, PaymentMethod, PaymentStatus};

/// Order customer block
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Customer {
    #[validate(length(min = 1, message = "customer name is required"))]
    pub name: String,
    #[validate(email(message = "valid customer email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "customer phone is required"))]
    pub phone: String,
}

/// Persisted order aggregate
///
/// Invariant: `total_amount = subtotal + tax_amount + shipping_cost −
/// discount_amount`, maintained by the builder; `items` is non-empty.
/// Orders are never physically deleted except by explicit admin bulk
/// delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Unique, date-prefixed sequential number (e.g. SP2608300001)
    pub order_number: String,
    pub customer: Customer,
    pub billing_address: Address,
    pub shipping_address: Address,
    pub items: Vec<LineItem>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub shipping_cost: f64,
    pub discount_amount: f64,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
    /// User id of the creating operator or customer account
    pub created_by: String,
    /// Order date, Unix millis
    pub order_date: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Address validation used for the billing block
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AddressDraft {
    #[validate(length(min = 1, message = "address name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "address line is required"))]
    pub address1: String,
    pub address2: Option<String>,
    #[validate(length(min = 1, message = "city is required"))]
    pub city: String,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
}

impl From<AddressDraft> for Address {
    fn from(d: AddressDraft) -> Self {
        Address {
            name: d.name,
            address1: d.address1,
            address2: d.address2,
            city: d.city,
            postal_code: d.postal_code,
            country: d.country,
            phone: d.phone,
        }
    }
}

/// One requested order line before pricing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemDraft {
    #[validate(length(min = 1, message = "product id is required"))]
    pub product_id: String,
    #[validate(length(min = 1, message = "product name is required"))]
    pub name: String,
    pub sku: String,
    #[validate(range(min = 0.0, message = "unit price cannot be negative"))]
    pub unit_price: f64,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
}

/// Checkout / admin order form input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderDraft {
    #[validate(nested)]
    pub customer: Customer,
    #[validate(nested)]
    pub billing_address: AddressDraft,
    /// Defaults to the billing address when absent
    pub shipping_address: Option<AddressDraft>,
    #[validate(length(min = 1, message = "items cannot be empty"), nested)]
    pub items: Vec<OrderItemDraft>,
    /// Operator-entered amounts (admin order form); all default to zero
    #[serde(default)]
    pub tax_amount: f64,
    #[serde(default)]
    pub shipping_cost: f64,
    #[serde(default)]
    pub discount_amount: f64,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Order list filters, interpreted directly from query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Substring match on order number or customer name
    pub search: Option<String>,
    /// "order_date" (default) | "total_amount" | "order_number"
    pub sort_by: Option<String>,
    /// "asc" | "desc" (default)
    pub order: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

impl Default for OrderListQuery {
    fn default() -> Self {
        Self {
            status: None,
            payment_status: None,
            search: None,
            sort_by: None,
            order: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

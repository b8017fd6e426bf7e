//! Order aggregate builder

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

use shared::models::{LineItem, OrderStatus, PaymentStatus};
use shared::money;
use shared::util::now_millis;

use crate::db::models::{Order, OrderDraft};
use crate::db::repository::OrderRepository;
use crate::orders::OrderNumberGenerator;
use crate::utils::{AppError, AppResult, validation_error_map};

/// Turns a validated order form into a persisted order aggregate.
///
/// The builder recomputes every monetary field from the draft lines;
/// client-supplied totals are never trusted. When no shipping address is
/// given, the billing address is used for both.
#[derive(Clone)]
pub struct OrderBuilder {
    orders: OrderRepository,
    numbers: OrderNumberGenerator,
}

impl OrderBuilder {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            numbers: OrderNumberGenerator::new(db),
        }
    }

    pub async fn build(&self, draft: OrderDraft, created_by: &str) -> AppResult<Order> {
        if let Err(errors) = draft.validate() {
            return Err(AppError::validation_fields(validation_error_map(&errors)));
        }

        let items: Vec<LineItem> = draft
            .items
            .iter()
            .map(|i| LineItem::new(i.product_id.clone(), i.name.clone(), i.sku.clone(), i.unit_price, i.quantity))
            .collect();

        let subtotal = money::round2(items.iter().map(|i| i.total_price).sum());
        let tax_amount = money::round2(draft.tax_amount);
        let shipping_cost = money::round2(draft.shipping_cost);
        let discount_amount = money::round2(draft.discount_amount);
        let total_amount = money::sum_totals(subtotal, tax_amount, shipping_cost, discount_amount);

        let order_number = self.numbers.next().await?;

        let billing = shared::models::Address::from(draft.billing_address);
        let shipping = draft
            .shipping_address
            .map(shared::models::Address::from)
            .unwrap_or_else(|| billing.clone());

        let now = now_millis();
        let order = Order {
            id: None,
            order_number,
            customer: draft.customer,
            billing_address: billing,
            shipping_address: shipping,
            items,
            subtotal,
            tax_amount,
            shipping_cost,
            discount_amount,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::AwaitingPayment,
            payment_method: draft.payment_method,
            created_by: created_by.to_string(),
            order_date: now,
            created_at: now,
            updated_at: now,
        };

        Ok(self.orders.create(order).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::{AddressDraft, Customer, OrderItemDraft};
    use shared::models::PaymentMethod;

    fn draft(items: Vec<OrderItemDraft>) -> OrderDraft {
        OrderDraft {
            customer: Customer {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                phone: "555-0100".to_string(),
            },
            billing_address: AddressDraft {
                name: "Ada".to_string(),
                address1: "1 Main St".to_string(),
                address2: None,
                city: "Springfield".to_string(),
                postal_code: None,
                country: None,
                phone: None,
            },
            shipping_address: None,
            items,
            tax_amount: 0.0,
            shipping_cost: 0.0,
            discount_amount: 0.0,
            payment_method: PaymentMethod::BankTransfer,
        }
    }

    fn item(price: f64, qty: u32) -> OrderItemDraft {
        OrderItemDraft {
            product_id: "product:p1".to_string(),
            name: "Widget".to_string(),
            sku: "W-1".to_string(),
            unit_price: price,
            quantity: qty,
        }
    }

    async fn builder() -> OrderBuilder {
        let svc = DbService::memory().await.unwrap();
        OrderBuilder::new(svc.db)
    }

    #[tokio::test]
    async fn test_builds_and_numbers_orders() {
        let builder = builder().await;

        let first = builder.build(draft(vec![item(100.0, 3)]), "user:op").await.unwrap();
        let second = builder.build(draft(vec![item(50.0, 1)]), "user:op").await.unwrap();

        assert!(first.order_number.ends_with("0001"));
        assert!(second.order_number.ends_with("0002"));
        assert_eq!(first.subtotal, 300.0);
        assert_eq!(first.total_amount, 300.0);
        assert_eq!(first.status, OrderStatus::Pending);
        assert_eq!(first.payment_status, PaymentStatus::AwaitingPayment);
        assert_eq!(first.created_by, "user:op");
        assert_eq!(first.shipping_address, first.billing_address);
    }

    #[tokio::test]
    async fn test_operator_amounts_are_summed() {
        let builder = builder().await;
        let mut d = draft(vec![item(100.0, 2)]);
        d.tax_amount = 18.0;
        d.shipping_cost = 25.0;
        d.discount_amount = 43.0;

        let order = builder.build(d, "user:op").await.unwrap();
        assert_eq!(order.subtotal, 200.0);
        assert_eq!(order.total_amount, 200.0);
    }

    #[tokio::test]
    async fn test_empty_items_rejected_with_field_key() {
        let builder = builder().await;
        let err = builder.build(draft(vec![]), "user:op").await.unwrap_err();
        match err {
            AppError::ValidationFields(map) => {
                assert!(map.contains_key("items"), "{map:?}");
            }
            other => panic!("expected field validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_customer_email_keyed_by_path() {
        let builder = builder().await;
        let mut d = draft(vec![item(10.0, 1)]);
        d.customer.email = "not-an-email".to_string();

        let err = builder.build(d, "user:op").await.unwrap_err();
        match err {
            AppError::ValidationFields(map) => {
                assert!(map.contains_key("customer.email"), "{map:?}");
            }
            other => panic!("expected field validation error, got {other:?}"),
        }
    }
}

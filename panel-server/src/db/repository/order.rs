//! Order repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Order, OrderListQuery};
use shared::models::{OrderStatus, PaymentStatus};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const ORDER_TABLE: &str = "order";

/// One page of orders plus the unpaged total
#[derive(Debug, Clone, serde::Serialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist a fully-built order aggregate.
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let pure_id = strip_table_prefix(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select((ORDER_TABLE, pure_id)).await?;
        Ok(order)
    }

    /// Filtered, sorted, paged listing.
    ///
    /// Sort keys other than the known columns fall back to order_date.
    pub async fn find(&self, query: &OrderListQuery) -> RepoResult<OrderPage> {
        let mut filter = String::from(" FROM order WHERE true");
        if query.status.is_some() {
            filter.push_str(" AND status = $status");
        }
        if query.payment_status.is_some() {
            filter.push_str(" AND payment_status = $payment_status");
        }
        if query.search.is_some() {
            filter.push_str(
                " AND (string::lowercase(order_number) CONTAINS $search \
                 OR string::lowercase(customer.name) CONTAINS $search)",
            );
        }

        let sort_by = match query.sort_by.as_deref() {
            Some("total_amount") => "total_amount",
            Some("order_number") => "order_number",
            _ => "order_date",
        };
        let direction = match query.order.as_deref() {
            Some("asc") => "ASC",
            _ => "DESC",
        };

        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, 200);
        // widened so a hostile page parameter cannot overflow
        let start = u64::from(page - 1) * u64::from(page_size);

        let sql = format!(
            "SELECT *{filter} ORDER BY {sort_by} {direction} LIMIT $limit START $start; \
             SELECT count() AS total{filter} GROUP ALL;"
        );

        let mut q = self
            .base
            .db()
            .query(sql)
            .bind(("limit", page_size as i64))
            .bind(("start", start as i64));
        if let Some(status) = query.status {
            q = q.bind(("status", status));
        }
        if let Some(payment_status) = query.payment_status {
            q = q.bind(("payment_status", payment_status));
        }
        if let Some(search) = &query.search {
            q = q.bind(("search", search.to_lowercase()));
        }

        let mut result = q.await?;
        let orders: Vec<Order> = result.take(0)?;

        #[derive(serde::Deserialize)]
        struct CountRow {
            total: u64,
        }
        let counts: Vec<CountRow> = result.take(1)?;
        let total = counts.first().map(|c| c.total).unwrap_or(0);

        Ok(OrderPage {
            orders,
            total,
            page,
            page_size,
        })
    }

    /// Orders placed at or after the given Unix-millis timestamp.
    pub async fn find_since(&self, from: i64) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE order_date >= $from ORDER BY order_date")
            .bind(("from", from))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Status transition. Any transition between enumerated states is
    /// accepted; history is whatever the operator says it is.
    pub async fn update_status(
        &self,
        id: &str,
        status: Option<OrderStatus>,
        payment_status: Option<PaymentStatus>,
    ) -> RepoResult<Order> {
        let mut order = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("order '{id}' not found")))?;

        if let Some(status) = status {
            order.status = status;
        }
        if let Some(payment_status) = payment_status {
            order.payment_status = payment_status;
        }
        order.updated_at = now_millis();

        let rid = order
            .id
            .clone()
            .ok_or_else(|| RepoError::Database("order record without id".to_string()))?;
        let updated: Option<Order> = self.base.db().update(rid).content(order).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update order".to_string()))
    }

    /// Admin bulk delete. Missing ids are skipped.
    pub async fn bulk_delete(&self, ids: &[String]) -> RepoResult<u32> {
        let mut deleted = 0u32;
        for id in ids {
            let pure_id = strip_table_prefix(ORDER_TABLE, id);
            let removed: Option<Order> = self.base.db().delete((ORDER_TABLE, pure_id)).await?;
            if removed.is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

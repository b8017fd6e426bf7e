//! Reporting aggregator
//!
//! Reads orders and products, aggregates in memory. Reports are
//! computed per request; there is no materialized view or cache.
//! Cancelled orders are excluded from every revenue figure.

use std::collections::HashMap;

use chrono::{Datelike, Duration, TimeZone, Utc};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use shared::models::OrderStatus;
use shared::money::round2;

use crate::db::models::Order;
use crate::db::repository::{OrderRepository, ProductRepository};
use crate::utils::AppResult;

const UNCATEGORIZED: &str = "uncategorized";

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyRevenue {
    /// Calendar month, "YYYY-MM"
    pub month: String,
    pub revenue: f64,
    pub order_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub quantity: u64,
    pub revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyGrowth {
    pub month: String,
    pub revenue: f64,
    /// Percent change against the previous month, 0 when there is no
    /// previous revenue to compare against
    pub growth_percent: f64,
}

#[derive(Clone)]
pub struct ReportService {
    orders: OrderRepository,
    products: ProductRepository,
}

impl ReportService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db),
        }
    }

    pub async fn monthly_revenue(&self, months: u32) -> AppResult<Vec<MonthlyRevenue>> {
        let orders = self.orders.find_since(window_start(months)).await?;
        Ok(aggregate_monthly_revenue(&orders))
    }

    pub async fn revenue_by_category(&self, months: u32) -> AppResult<Vec<CategoryRevenue>> {
        let orders = self.orders.find_since(window_start(months)).await?;
        let products = self.products.find_all().await?;
        let categories: HashMap<String, String> = products
            .into_iter()
            .filter_map(|p| {
                p.id.as_ref()
                    .map(|id| (id.key().to_string(), p.category.clone()))
            })
            .collect();
        Ok(aggregate_by_category(&orders, &categories))
    }

    pub async fn top_products(&self, months: u32, limit: usize) -> AppResult<Vec<TopProduct>> {
        let orders = self.orders.find_since(window_start(months)).await?;
        Ok(aggregate_top_products(&orders, limit))
    }

    pub async fn monthly_growth(&self, months: u32) -> AppResult<Vec<MonthlyGrowth>> {
        let revenue = self.monthly_revenue(months).await?;
        Ok(compute_growth(&revenue))
    }
}

/// Percent change of `current` against `previous`, rounded to cents.
/// A zero baseline yields 0 rather than a division error or infinity.
pub fn growth_percent(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        round2((current - previous) / previous * 100.0)
    }
}

fn window_start(months: u32) -> i64 {
    // approximate: calendar months are bucketed exactly, only the fetch
    // window uses 31-day months
    (Utc::now() - Duration::days(31 * months as i64)).timestamp_millis()
}

fn month_key(timestamp_millis: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => format!("{:04}-{:02}", dt.year(), dt.month()),
        None => "0000-00".to_string(),
    }
}

fn revenue_orders(orders: &[Order]) -> impl Iterator<Item = &Order> {
    orders.iter().filter(|o| o.status != OrderStatus::Cancelled)
}

fn aggregate_monthly_revenue(orders: &[Order]) -> Vec<MonthlyRevenue> {
    let mut buckets: HashMap<String, (f64, u64)> = HashMap::new();
    for order in revenue_orders(orders) {
        let entry = buckets.entry(month_key(order.order_date)).or_default();
        entry.0 += order.total_amount;
        entry.1 += 1;
    }

    let mut rows: Vec<MonthlyRevenue> = buckets
        .into_iter()
        .map(|(month, (revenue, order_count))| MonthlyRevenue {
            month,
            revenue: round2(revenue),
            order_count,
        })
        .collect();
    rows.sort_by(|a, b| a.month.cmp(&b.month));
    rows
}

fn aggregate_by_category(
    orders: &[Order],
    categories: &HashMap<String, String>,
) -> Vec<CategoryRevenue> {
    let mut buckets: HashMap<&str, f64> = HashMap::new();
    for order in revenue_orders(orders) {
        for item in &order.items {
            let key = item
                .product_id
                .strip_prefix("product:")
                .unwrap_or(&item.product_id);
            let category = categories
                .get(key)
                .map(String::as_str)
                .unwrap_or(UNCATEGORIZED);
            *buckets.entry(category).or_default() += item.total_price;
        }
    }

    let mut rows: Vec<CategoryRevenue> = buckets
        .into_iter()
        .map(|(category, revenue)| CategoryRevenue {
            category: category.to_string(),
            revenue: round2(revenue),
        })
        .collect();
    rows.sort_by(|a, b| b.revenue.partial_cmp(&a.revenue).unwrap_or(std::cmp::Ordering::Equal));
    rows
}

fn aggregate_top_products(orders: &[Order], limit: usize) -> Vec<TopProduct> {
    let mut buckets: HashMap<&str, (String, u64, f64)> = HashMap::new();
    for order in revenue_orders(orders) {
        for item in &order.items {
            let entry = buckets
                .entry(item.product_id.as_str())
                .or_insert_with(|| (item.name.clone(), 0, 0.0));
            entry.1 += item.quantity as u64;
            entry.2 += item.total_price;
        }
    }

    let mut rows: Vec<TopProduct> = buckets
        .into_iter()
        .map(|(product_id, (name, quantity, revenue))| TopProduct {
            product_id: product_id.to_string(),
            name,
            quantity,
            revenue: round2(revenue),
        })
        .collect();
    rows.sort_by(|a, b| b.revenue.partial_cmp(&a.revenue).unwrap_or(std::cmp::Ordering::Equal));
    rows.truncate(limit);
    rows
}

fn compute_growth(revenue: &[MonthlyRevenue]) -> Vec<MonthlyGrowth> {
    let mut rows = Vec::with_capacity(revenue.len());
    let mut previous = 0.0;
    for row in revenue {
        rows.push(MonthlyGrowth {
            month: row.month.clone(),
            revenue: row.revenue,
            growth_percent: growth_percent(row.revenue, previous),
        });
        previous = row.revenue;
    }
    rows
}

//! Reporting handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::reports::{CategoryRevenue, MonthlyGrowth, MonthlyRevenue, ReportService, TopProduct};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// Lookback window in calendar months
    #[serde(default = "default_months")]
    pub months: u32,
    /// Row cap for top-product listings
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_months() -> u32 {
    12
}

fn default_limit() -> usize {
    10
}

pub async fn monthly_revenue(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<MonthlyRevenue>>> {
    let service = ReportService::new(state.db.clone());
    Ok(Json(service.monthly_revenue(query.months).await?))
}

pub async fn revenue_by_category(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<CategoryRevenue>>> {
    let service = ReportService::new(state.db.clone());
    Ok(Json(service.revenue_by_category(query.months).await?))
}

pub async fn top_products(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<TopProduct>>> {
    let service = ReportService::new(state.db.clone());
    Ok(Json(service.top_products(query.months, query.limit).await?))
}

pub async fn monthly_growth(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<MonthlyGrowth>>> {
    let service = ReportService::new(state.db.clone());
    Ok(Json(service.monthly_growth(query.months).await?))
}

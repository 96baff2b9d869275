//! Read-only summary KPIs exposed by the store's reporting functions.

use crate::error::PostgreSQLStoreError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio_postgres::{Client, Row};

const SUMMARY_KPIS_SQL: &str = "SELECT * FROM fn_summary_kpis($1::int, $2::text[])";

/// Headline numbers over all orders and over a recent window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryKpis {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub orders_window: i64,
    pub revenue_window: f64,
    pub active_customers_window: i64,
    pub avg_order_value_all: f64,
    pub avg_order_value_window: f64,
    pub orders_per_min_window: f64,
}

/// An empty category list means "all categories".
pub fn category_filter(categories: &[String]) -> Option<Vec<String>> {
    let filtered: Vec<String> = categories
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect();
    (!filtered.is_empty()).then_some(filtered)
}

/// Fetch the summary KPIs for the last `window_minutes` minutes.
///
/// Columns that are missing or NULL read as zero.
pub async fn fetch_summary_kpis(
    client: &Client,
    window_minutes: i32,
    categories: &[String],
) -> Result<SummaryKpis, PostgreSQLStoreError> {
    let filter = category_filter(categories);
    let row = client
        .query_opt(SUMMARY_KPIS_SQL, &[&window_minutes, &filter])
        .await?;

    Ok(row.map(|row| summary_from_row(&row)).unwrap_or_default())
}

fn summary_from_row(row: &Row) -> SummaryKpis {
    SummaryKpis {
        total_orders: int_column(row, "total_orders"),
        total_revenue: numeric_column(row, "total_revenue"),
        orders_window: int_column(row, "orders_window"),
        revenue_window: numeric_column(row, "revenue_window"),
        active_customers_window: int_column(row, "active_customers_window"),
        avg_order_value_all: numeric_column(row, "avg_order_value_all"),
        avg_order_value_window: numeric_column(row, "avg_order_value_window"),
        orders_per_min_window: numeric_column(row, "orders_per_min_window"),
    }
}

fn int_column(row: &Row, name: &str) -> i64 {
    if let Ok(value) = row.try_get::<_, Option<i64>>(name) {
        return value.unwrap_or(0);
    }
    if let Ok(value) = row.try_get::<_, Option<i32>>(name) {
        return value.map(i64::from).unwrap_or(0);
    }
    0
}

fn numeric_column(row: &Row, name: &str) -> f64 {
    if let Ok(value) = row.try_get::<_, Option<Decimal>>(name) {
        return value.and_then(|d| d.to_f64()).unwrap_or(0.0);
    }
    if let Ok(value) = row.try_get::<_, Option<f64>>(name) {
        return value.unwrap_or(0.0);
    }
    if let Ok(value) = row.try_get::<_, Option<f32>>(name) {
        return value.map(f64::from).unwrap_or(0.0);
    }
    int_column(row, name) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter() {
        assert_eq!(category_filter(&[]), None);
        assert_eq!(category_filter(&["  ".to_string()]), None);
        assert_eq!(
            category_filter(&["Books".to_string(), " Games ".to_string()]),
            Some(vec!["Books".to_string(), "Games".to_string()])
        );
    }
}

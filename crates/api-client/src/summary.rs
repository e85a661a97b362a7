use crate::error::ApiError;
use crate::responses::{CustomerNode, OrderNode};
use chrono::{DateTime, Utc};
use core_types::{CustomerStats, LiveMetrics, OrderStats};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

/// Aggregates raw order and customer nodes into a `LiveMetrics` snapshot.
///
/// Order totals are summed as exact decimals. A customer with more than one
/// order counts as returning. The conversion rate is passed through as given,
/// since the store has no session data to derive it from.
pub fn summarize_metrics(
    orders: &[OrderNode],
    customers: &[CustomerNode],
    conversion_rate: f64,
    now: DateTime<Utc>,
) -> Result<LiveMetrics, ApiError> {
    let total_revenue = orders
        .iter()
        .map(|order| {
            let amount = &order.total_price_set.shop_money.amount;
            Decimal::from_str(amount.trim())
                .map_err(|e| ApiError::InvalidData(format!("Invalid order amount '{}': {}", amount, e)))
        })
        .sum::<Result<Decimal, ApiError>>()?;

    let order_count = orders.len() as u64;
    let average_value = if order_count > 0 {
        total_revenue / Decimal::from(order_count)
    } else {
        Decimal::ZERO
    };

    let total_customers = customers.len() as u64;
    let returning = customers
        .iter()
        .filter(|customer| customer.number_of_orders > 1)
        .count() as u64;
    let retention_rate = if total_customers > 0 {
        (returning as f64 / total_customers as f64) * 100.0
    } else {
        0.0
    };

    Ok(LiveMetrics {
        orders: OrderStats {
            count: order_count,
            total_revenue: total_revenue.to_f64().unwrap_or_default(),
            average_value: average_value.to_f64().unwrap_or_default(),
        },
        customers: CustomerStats {
            total: total_customers,
            returning,
            new_customers: total_customers - returning,
            retention_rate,
        },
        conversion_rate,
        last_updated: now,
    })
}

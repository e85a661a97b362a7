use crate::error::CoreError;
use crate::metrics::Metrics;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Order totals aggregated over a date window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub count: u64,
    pub total_revenue: f64,
    /// `total_revenue / count`, or `0` when there are no orders.
    pub average_value: f64,
}

/// Customer counts and the retention rate derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerStats {
    pub total: u64,
    /// Customers with more than one order.
    pub returning: u64,
    #[serde(rename = "new")]
    pub new_customers: u64,
    /// `returning / total * 100`, or `0` when there are no customers.
    pub retention_rate: f64,
}

/// The store-level snapshot produced by a metrics provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMetrics {
    pub orders: OrderStats,
    pub customers: CustomerStats,
    /// Supplied by the provider; there is no session analytics behind it.
    pub conversion_rate: f64,
    pub last_updated: DateTime<Utc>,
}

impl LiveMetrics {
    /// Builds the calculator's baseline from this snapshot.
    ///
    /// Traffic and acquisition cost are not available from the store, so the
    /// caller provides them.
    pub fn to_baseline(&self, traffic: f64, customer_acquisition_cost: f64) -> Metrics {
        Metrics {
            conversion_rate: self.conversion_rate,
            average_order_value: self.orders.average_value,
            retention_rate: self.customers.retention_rate,
            traffic,
            customer_acquisition_cost,
        }
    }
}

/// The store the metrics were fetched from. Never carries the access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub domain: String,
    pub name: String,
}

impl StoreInfo {
    pub fn from_domain(domain: &str) -> Self {
        let name = domain
            .strip_suffix(".myshopify.com")
            .unwrap_or(domain)
            .to_string();
        Self {
            domain: domain.to_string(),
            name,
        }
    }
}

/// An inclusive window of time to aggregate metrics over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl DateRange {
    pub const DEFAULT_DAYS: u32 = 30;

    pub fn new(start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Result<Self, CoreError> {
        if start_date > end_date {
            return Err(CoreError::InvalidDateRange {
                start: start_date.to_rfc3339(),
                end: end_date.to_rfc3339(),
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The `days` days leading up to `now`.
    pub fn last_days(days: u32, now: DateTime<Utc>) -> Self {
        Self {
            start_date: now - Duration::days(i64::from(days)),
            end_date: now,
        }
    }

    pub fn start_day(&self) -> NaiveDate {
        self.start_date.date_naive()
    }

    pub fn end_day(&self) -> NaiveDate {
        self.end_date.date_naive()
    }

    /// A stable identifier used to tell whether this window was already fetched.
    ///
    /// Orders are filtered by calendar day, so two windows covering the same
    /// days share a key.
    pub fn key(&self) -> String {
        format!("{}_{}", self.start_day(), self.end_day())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn live(average_value: f64, retention_rate: f64) -> LiveMetrics {
        LiveMetrics {
            orders: OrderStats {
                count: 4,
                total_revenue: average_value * 4.0,
                average_value,
            },
            customers: CustomerStats {
                total: 10,
                returning: 3,
                new_customers: 7,
                retention_rate,
            },
            conversion_rate: 2.3,
            last_updated: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_to_baseline_maps_fields() {
        let baseline = live(85.0, 30.0).to_baseline(10000.0, 50.0);

        assert_eq!(baseline, Metrics::new(2.3, 85.0, 30.0, 10000.0, 50.0));
    }

    #[test]
    fn test_store_name_strips_shopify_suffix() {
        let store = StoreInfo::from_domain("acme-goods.myshopify.com");
        assert_eq!(store.name, "acme-goods");
        assert_eq!(store.domain, "acme-goods.myshopify.com");

        let custom = StoreInfo::from_domain("shop.example.com");
        assert_eq!(custom.name, "shop.example.com");
    }

    #[test]
    fn test_date_range_rejects_inverted_window() {
        let start = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        assert!(matches!(
            DateRange::new(start, end),
            Err(CoreError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn test_last_days_and_key() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 12, 0, 0).unwrap();
        let range = DateRange::last_days(30, now);

        assert_eq!(range.start_day(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(range.end_day(), NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(range.key(), DateRange::last_days(30, now).key());
        assert_ne!(range.key(), DateRange::last_days(7, now).key());
        assert_eq!(range.key(), "2025-03-01_2025-03-31");

        let later_same_day = Utc.with_ymd_and_hms(2025, 3, 31, 18, 30, 0).unwrap();
        assert_eq!(range.key(), DateRange::last_days(30, later_same_day).key());
    }

    #[test]
    fn test_customer_stats_new_field_name() {
        let json = serde_json::to_value(live(10.0, 30.0).customers).unwrap();
        assert_eq!(json["new"], 7);
        assert_eq!(json["retentionRate"], 30.0);
    }
}

use serde::{Deserialize, Serialize};

/// A snapshot of the five business figures a projection starts from.
///
/// Percentages are expressed on a 0-100 scale (`2.3` means 2.3%). None of the
/// ranges are enforced here; callers are responsible for rejecting nonsense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Share of sessions that end in an order, in percent.
    pub conversion_rate: f64,
    /// Currency amount per order.
    pub average_order_value: f64,
    /// Share of customers that come back for a second order, in percent.
    pub retention_rate: f64,
    /// Sessions in the period.
    pub traffic: f64,
    /// Currency amount per acquired customer. Carried through projections but
    /// not part of the revenue model.
    pub customer_acquisition_cost: f64,
}

impl Metrics {
    pub fn new(
        conversion_rate: f64,
        average_order_value: f64,
        retention_rate: f64,
        traffic: f64,
        customer_acquisition_cost: f64,
    ) -> Self {
        Self {
            conversion_rate,
            average_order_value,
            retention_rate,
            traffic,
            customer_acquisition_cost,
        }
    }
}

/// The deltas a user applies on top of a baseline `Metrics`.
///
/// The four `*_change` rate fields are relative percentages (`10` is +10%) and
/// scale the matching metric. `cac_change` is an absolute amount that is added
/// to the acquisition cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustments {
    #[serde(default)]
    pub cvr_change: f64,
    #[serde(default)]
    pub aov_change: f64,
    #[serde(default)]
    pub retention_change: f64,
    #[serde(default)]
    pub traffic_change: f64,
    #[serde(default)]
    pub cac_change: f64,
}

impl Adjustments {
    /// The identity adjustment: every delta is zero.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_cvr_change(mut self, pct: f64) -> Self {
        self.cvr_change = pct;
        self
    }

    pub fn with_aov_change(mut self, pct: f64) -> Self {
        self.aov_change = pct;
        self
    }

    pub fn with_retention_change(mut self, pct: f64) -> Self {
        self.retention_change = pct;
        self
    }

    pub fn with_traffic_change(mut self, pct: f64) -> Self {
        self.traffic_change = pct;
        self
    }

    pub fn with_cac_change(mut self, amount: f64) -> Self {
        self.cac_change = amount;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_serialize_camel_case() {
        let metrics = Metrics::new(2.3, 85.0, 30.0, 10000.0, 50.0);
        let json = serde_json::to_value(metrics).unwrap();

        assert_eq!(json["conversionRate"], 2.3);
        assert_eq!(json["averageOrderValue"], 85.0);
        assert_eq!(json["customerAcquisitionCost"], 50.0);
    }

    #[test]
    fn test_adjustments_missing_fields_default_to_zero() {
        let adjustments: Adjustments = serde_json::from_str(r#"{"cvrChange": 10}"#).unwrap();

        assert_eq!(adjustments, Adjustments::none().with_cvr_change(10.0));
    }
}

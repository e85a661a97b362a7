use crate::metrics::{Adjustments, Metrics};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many months of sustained revenue increase it takes to pay back the
/// implementation cost of a scenario.
///
/// On the wire this is a plain number, or `null` when the scenario never
/// breaks even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum BreakEven {
    Months(u64),
    /// The projected increase is zero or negative.
    Never,
}

impl BreakEven {
    pub fn months(&self) -> Option<u64> {
        match self {
            BreakEven::Months(months) => Some(*months),
            BreakEven::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, BreakEven::Never)
    }
}

impl From<Option<u64>> for BreakEven {
    fn from(value: Option<u64>) -> Self {
        value.map_or(BreakEven::Never, BreakEven::Months)
    }
}

impl From<BreakEven> for Option<u64> {
    fn from(value: BreakEven) -> Self {
        value.months()
    }
}

/// Renders `N/A` for `Never`, the month count otherwise.
impl fmt::Display for BreakEven {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakEven::Months(months) => write!(f, "{}", months),
            BreakEven::Never => f.write_str("N/A"),
        }
    }
}

/// Revenue together with the metrics that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueSnapshot {
    pub revenue: f64,
    pub metrics: Metrics,
}

/// The difference between the projected and the current snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Impact {
    pub revenue_increase: f64,
    /// Relative increase in percent; `0` when the current revenue is not positive.
    pub percentage_increase: f64,
    pub break_even_months: BreakEven,
}

/// The before/after comparison produced for one set of adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResults {
    pub current: RevenueSnapshot,
    pub projected: RevenueSnapshot,
    pub impact: Impact,
}

/// One row of a side-by-side comparison, tagged with its position in the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub id: String,
    pub adjustments: Adjustments,
    pub results: CalculationResults,
}

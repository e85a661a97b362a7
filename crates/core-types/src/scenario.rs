use crate::metrics::Adjustments;
use crate::results::CalculationResults;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, saved pairing of an adjustment set with the results it produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub adjustments: Adjustments,
    pub results: CalculationResults,
    pub created_at: DateTime<Utc>,
}

impl Scenario {
    /// Wraps a calculation into a scenario with a fresh identifier.
    ///
    /// A missing or blank name is replaced by `Scenario <timestamp>`.
    pub fn new(
        name: Option<&str>,
        adjustments: Adjustments,
        results: CalculationResults,
        created_at: DateTime<Utc>,
    ) -> Self {
        let name = match name.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => default_name(created_at),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            adjustments,
            results,
            created_at,
        }
    }
}

fn default_name(created_at: DateTime<Utc>) -> String {
    format!("Scenario {}", created_at.format("%Y-%m-%d %H:%M:%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use crate::results::{BreakEven, Impact, RevenueSnapshot};
    use chrono::TimeZone;

    fn results() -> CalculationResults {
        let metrics = Metrics::new(2.0, 50.0, 20.0, 1000.0, 10.0);
        let snapshot = RevenueSnapshot {
            revenue: 1200.0,
            metrics,
        };
        CalculationResults {
            current: snapshot,
            projected: snapshot,
            impact: Impact {
                revenue_increase: 0.0,
                percentage_increase: 0.0,
                break_even_months: BreakEven::Never,
            },
        }
    }

    #[test]
    fn test_blank_name_is_generated() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let scenario = Scenario::new(Some("   "), Adjustments::none(), results(), at);

        assert_eq!(scenario.name, "Scenario 2025-03-14 09:26:53");
    }

    #[test]
    fn test_given_name_is_trimmed_and_kept() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap();
        let scenario = Scenario::new(Some(" Optimistic Growth "), Adjustments::none(), results(), at);

        assert_eq!(scenario.name, "Optimistic Growth");
        assert!(Uuid::parse_str(&scenario.id).is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let at = Utc::now();
        let a = Scenario::new(None, Adjustments::none(), results(), at);
        let b = Scenario::new(None, Adjustments::none(), results(), at);

        assert_ne!(a.id, b.id);
    }
}

use core_types::{
    Adjustments, BreakEven, CalculationResults, Impact, Metrics, RevenueSnapshot,
    ScenarioComparison,
};

/// The one-off cost a scenario has to earn back, in the same currency as the
/// average order value.
pub const IMPLEMENTATION_COST: f64 = 10_000.0;

/// Revenue for one period under the two-stream model.
///
/// Every converted visitor buys once, and the retained share of those same
/// visitors buys exactly one more time. There is no compounding beyond that
/// single repeat cycle.
pub fn revenue(metrics: &Metrics) -> f64 {
    let customers = metrics.traffic * (metrics.conversion_rate / 100.0);
    let first_time_revenue = customers * metrics.average_order_value;
    let repeat_revenue =
        customers * (metrics.retention_rate / 100.0) * metrics.average_order_value;
    first_time_revenue + repeat_revenue
}

/// Applies `adjustments` to `baseline` without clamping the outcome.
///
/// The rate fields scale multiplicatively; the acquisition cost moves by an
/// absolute amount.
pub fn adjust_metrics(baseline: &Metrics, adjustments: &Adjustments) -> Metrics {
    Metrics {
        conversion_rate: baseline.conversion_rate * (1.0 + adjustments.cvr_change / 100.0),
        average_order_value: baseline.average_order_value
            * (1.0 + adjustments.aov_change / 100.0),
        retention_rate: baseline.retention_rate * (1.0 + adjustments.retention_change / 100.0),
        traffic: baseline.traffic * (1.0 + adjustments.traffic_change / 100.0),
        customer_acquisition_cost: baseline.customer_acquisition_cost + adjustments.cac_change,
    }
}

/// Months needed for `monthly_increase` to cover `IMPLEMENTATION_COST`.
///
/// Anything that is not strictly positive (including NaN) never breaks even.
pub fn break_even(monthly_increase: f64) -> BreakEven {
    if monthly_increase > 0.0 {
        // Float-to-int `as` saturates, so a vanishing increase cannot panic.
        BreakEven::Months((IMPLEMENTATION_COST / monthly_increase).ceil() as u64)
    } else {
        BreakEven::Never
    }
}

/// The main entry point: projects `adjustments` on top of `baseline`.
pub fn project(baseline: &Metrics, adjustments: &Adjustments) -> CalculationResults {
    let current_revenue = revenue(baseline);

    let adjusted = adjust_metrics(baseline, adjustments);
    let projected_revenue = revenue(&adjusted);

    let revenue_increase = projected_revenue - current_revenue;
    let percentage_increase = if current_revenue > 0.0 {
        (revenue_increase / current_revenue) * 100.0
    } else {
        0.0
    };

    CalculationResults {
        current: RevenueSnapshot {
            revenue: current_revenue,
            metrics: *baseline,
        },
        projected: RevenueSnapshot {
            revenue: projected_revenue,
            metrics: adjusted,
        },
        impact: Impact {
            revenue_increase,
            percentage_increase,
            break_even_months: break_even(revenue_increase),
        },
    }
}

/// Projects every adjustment set in order, tagging each with `scenario-<index>`.
pub fn compare_scenarios(
    baseline: &Metrics,
    scenarios: &[Adjustments],
) -> Vec<ScenarioComparison> {
    scenarios
        .iter()
        .enumerate()
        .map(|(index, adjustments)| ScenarioComparison {
            id: format!("scenario-{}", index),
            adjustments: *adjustments,
            results: project(baseline, adjustments),
        })
        .collect()
}

/// A calculator bound to a single baseline snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalculationEngine {
    baseline: Metrics,
}

impl CalculationEngine {
    pub fn new(baseline: Metrics) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> &Metrics {
        &self.baseline
    }

    pub fn project(&self, adjustments: &Adjustments) -> CalculationResults {
        project(&self.baseline, adjustments)
    }

    pub fn compare_scenarios(&self, scenarios: &[Adjustments]) -> Vec<ScenarioComparison> {
        compare_scenarios(&self.baseline, scenarios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn baseline() -> Metrics {
        Metrics::new(2.3, 85.0, 30.0, 10000.0, 50.0)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_revenue_two_streams() {
        // 230 customers * 85 + 230 * 0.30 * 85
        assert_close(revenue(&baseline()), 19550.0 + 5865.0);
    }

    #[test]
    fn test_project_conversion_uplift() {
        let results = project(&baseline(), &Adjustments::none().with_cvr_change(10.0));

        assert_close(results.current.revenue, 25415.0);
        assert_close(results.projected.metrics.conversion_rate, 2.53);
        assert_close(results.projected.revenue, 27956.5);
        assert_close(results.impact.revenue_increase, 2541.5);
        assert_close(results.impact.percentage_increase, 10.0);
        assert_eq!(results.impact.break_even_months, BreakEven::Months(4));
    }

    #[test]
    fn test_identity_adjustment() {
        let results = project(&baseline(), &Adjustments::none());

        assert_eq!(results.projected.metrics, results.current.metrics);
        assert_eq!(results.impact.revenue_increase, 0.0);
        assert_eq!(results.impact.percentage_increase, 0.0);
        assert_eq!(results.impact.break_even_months, BreakEven::Never);
    }

    #[test]
    fn test_current_snapshot_is_the_untouched_baseline() {
        let base = baseline();
        let results = project(&base, &Adjustments::none().with_aov_change(-20.0));

        assert_eq!(results.current.metrics, base);
    }

    #[test]
    fn test_zero_traffic_guards_percentage() {
        let base = Metrics {
            traffic: 0.0,
            ..baseline()
        };
        let adjustments = Adjustments::none()
            .with_cvr_change(50.0)
            .with_aov_change(25.0)
            .with_traffic_change(200.0);
        let results = project(&base, &adjustments);

        assert_eq!(results.current.revenue, 0.0);
        assert_eq!(results.projected.revenue, 0.0);
        assert_eq!(results.impact.percentage_increase, 0.0);
        assert_eq!(results.impact.break_even_months, BreakEven::Never);
    }

    #[test]
    fn test_zero_conversion_guards_percentage() {
        let base = Metrics {
            conversion_rate: 0.0,
            ..baseline()
        };
        let results = project(&base, &Adjustments::none().with_traffic_change(100.0));

        assert_eq!(results.impact.percentage_increase, 0.0);
        assert!(results.impact.percentage_increase.is_finite());
    }

    #[test]
    fn test_cac_is_additive() {
        let results = project(&baseline(), &Adjustments::none().with_cac_change(12.5));

        assert_eq!(results.projected.metrics.customer_acquisition_cost, 62.5);
        // Acquisition cost does not feed the revenue model.
        assert_eq!(results.impact.revenue_increase, 0.0);
    }

    #[test]
    fn test_adjustments_are_not_clamped() {
        let results = project(&baseline(), &Adjustments::none().with_cvr_change(-150.0));

        assert_close(results.projected.metrics.conversion_rate, -1.15);
        assert!(results.projected.revenue < 0.0);
        assert!(results.impact.break_even_months.is_never());
    }

    #[test]
    fn test_negative_increase_never_breaks_even() {
        let results = project(&baseline(), &Adjustments::none().with_traffic_change(-10.0));

        assert!(results.impact.revenue_increase < 0.0);
        assert_close(results.impact.percentage_increase, -10.0);
        assert_eq!(results.impact.break_even_months, BreakEven::Never);
    }

    #[test]
    fn test_break_even_rounds_up() {
        assert_eq!(break_even(10_000.0), BreakEven::Months(1));
        assert_eq!(break_even(9_999.0), BreakEven::Months(2));
        assert_eq!(break_even(2_500.0), BreakEven::Months(4));
        assert_eq!(break_even(0.0), BreakEven::Never);
        assert_eq!(break_even(-1.0), BreakEven::Never);
        assert_eq!(break_even(f64::NAN), BreakEven::Never);
    }

    #[test]
    fn test_break_even_tiny_increase_saturates() {
        assert_eq!(break_even(f64::MIN_POSITIVE), BreakEven::Months(u64::MAX));
    }

    #[test]
    fn test_compare_scenarios_tags_by_position() {
        let scenarios = vec![
            Adjustments::none().with_cvr_change(10.0),
            Adjustments::none(),
            Adjustments::none().with_cvr_change(10.0),
        ];
        let compared = compare_scenarios(&baseline(), &scenarios);

        assert_eq!(compared.len(), 3);
        assert_eq!(compared[0].id, "scenario-0");
        assert_eq!(compared[2].id, "scenario-2");
        assert_eq!(compared[1].adjustments, Adjustments::none());
        // Duplicates are kept and produce identical results.
        assert_eq!(compared[0].results, compared[2].results);
    }

    #[test]
    fn test_compare_scenarios_empty() {
        assert!(compare_scenarios(&baseline(), &[]).is_empty());
    }

    #[test]
    fn test_engine_delegates_to_free_functions() {
        let engine = CalculationEngine::new(baseline());
        let adjustments = Adjustments::none().with_retention_change(20.0);

        assert_eq!(engine.baseline(), &baseline());
        assert_eq!(engine.project(&adjustments), project(&baseline(), &adjustments));
        assert_eq!(
            engine.compare_scenarios(&[adjustments]),
            compare_scenarios(&baseline(), &[adjustments])
        );
    }
}

use crate::error::StoreError;
use crate::store::ScenarioStore;
use core_types::{DateRange, LiveMetrics, Metrics, StoreInfo};
use serde::Serialize;

/// The two baseline inputs the store cannot provide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineDefaults {
    pub traffic: f64,
    pub customer_acquisition_cost: f64,
}

/// Everything the application remembers about the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub current_store: Option<StoreInfo>,
    pub metrics: Option<LiveMetrics>,
    pub date_range: Option<DateRange>,
    /// Key of the last window whose metrics were fetched successfully.
    pub last_fetched_range: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub scenarios: ScenarioStore,
}

/// A serializable view of the session for status endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub current_store: Option<StoreInfo>,
    pub date_range: Option<DateRange>,
    pub has_metrics: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub scenario_count: usize,
    pub scenario_capacity: usize,
}

impl SessionState {
    pub fn new(scenario_capacity: usize) -> Self {
        Self {
            scenarios: ScenarioStore::new(scenario_capacity),
            ..Self::default()
        }
    }

    /// Selects `range` and decides whether it needs fetching.
    ///
    /// Returns `false` when the metrics for exactly this window are already
    /// held. Otherwise the session is marked as loading and `true` is returned.
    pub fn begin_fetch(&mut self, range: DateRange) -> bool {
        self.date_range = Some(range);

        let key = range.key();
        if self.metrics.is_some() && self.last_fetched_range.as_deref() == Some(key.as_str()) {
            tracing::debug!(range = %key, "Metrics for this range are already loaded.");
            // Any fetch still in flight is for another window and will be discarded.
            self.is_loading = false;
            return false;
        }

        self.is_loading = true;
        self.error = None;
        true
    }

    /// Whether `range` covers the same days as the selected window.
    fn is_current(&self, range: DateRange) -> bool {
        self.date_range.is_some_and(|selected| selected.key() == range.key())
    }

    /// Stores the metrics fetched for `range`.
    ///
    /// Returns `false`, leaving the session untouched, when another window was
    /// selected while the fetch was in flight.
    pub fn complete_fetch(&mut self, range: DateRange, store: StoreInfo, metrics: LiveMetrics) -> bool {
        if !self.is_current(range) {
            return false;
        }
        self.current_store = Some(store);
        self.metrics = Some(metrics);
        self.last_fetched_range = Some(range.key());
        self.is_loading = false;
        self.error = None;
        true
    }

    /// Records a failed fetch for `range`. Stale failures are ignored and
    /// reported with `false`.
    pub fn fail_fetch(&mut self, range: DateRange, message: impl Into<String>) -> bool {
        if !self.is_current(range) {
            return false;
        }
        self.is_loading = false;
        self.error = Some(message.into());
        true
    }

    /// The calculator's baseline, built from the last fetched metrics.
    pub fn baseline(&self, defaults: BaselineDefaults) -> Result<Metrics, StoreError> {
        self.metrics
            .as_ref()
            .map(|live| live.to_baseline(defaults.traffic, defaults.customer_acquisition_cost))
            .ok_or(StoreError::NoMetrics)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_store: self.current_store.clone(),
            date_range: self.date_range,
            has_metrics: self.metrics.is_some(),
            is_loading: self.is_loading,
            error: self.error.clone(),
            scenario_count: self.scenarios.len(),
            scenario_capacity: self.scenarios.capacity(),
        }
    }
}

use crate::error::StoreError;
use core_types::Scenario;
use std::collections::VecDeque;

/// How many scenarios are kept unless configured otherwise.
pub const DEFAULT_CAPACITY: usize = 10;

/// A bounded list of saved scenarios, oldest first.
///
/// Adding to a full store evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    scenarios: VecDeque<Scenario>,
    capacity: usize,
}

impl ScenarioStore {
    /// A store holding at most `capacity` scenarios. A capacity of zero is
    /// raised to one so that a freshly saved scenario is always retrievable.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            scenarios: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Appends `scenario` and returns the one evicted to make room, if any.
    pub fn add(&mut self, scenario: Scenario) -> Option<Scenario> {
        self.scenarios.push_back(scenario);
        if self.scenarios.len() > self.capacity {
            let evicted = self.scenarios.pop_front();
            if let Some(evicted) = &evicted {
                tracing::debug!(id = %evicted.id, name = %evicted.name, "Evicted oldest scenario.");
            }
            return evicted;
        }
        None
    }

    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Result<Scenario, StoreError> {
        let index = self
            .scenarios
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.scenarios
            .remove(index)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn clear(&mut self) {
        self.scenarios.clear();
    }

    /// Saved scenarios, oldest first.
    pub fn list(&self) -> Vec<Scenario> {
        self.scenarios.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }
}

impl Default for ScenarioStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_types::{
        Adjustments, BreakEven, CalculationResults, Impact, Metrics, RevenueSnapshot,
    };

    fn scenario(name: &str) -> Scenario {
        let snapshot = RevenueSnapshot {
            revenue: 100.0,
            metrics: Metrics::new(2.0, 50.0, 10.0, 100.0, 5.0),
        };
        let results = CalculationResults {
            current: snapshot,
            projected: snapshot,
            impact: Impact {
                revenue_increase: 0.0,
                percentage_increase: 0.0,
                break_even_months: BreakEven::Never,
            },
        };
        Scenario::new(Some(name), Adjustments::none(), results, Utc::now())
    }

    #[test]
    fn test_keeps_the_most_recent_ten() {
        let mut store = ScenarioStore::default();
        let mut evicted = Vec::new();

        for i in 0..12 {
            if let Some(old) = store.add(scenario(&format!("s{}", i))) {
                evicted.push(old.name);
            }
        }

        assert_eq!(store.len(), 10);
        assert_eq!(evicted, vec!["s0", "s1"]);
        let names: Vec<String> = store.iter().map(|s| s.name.clone()).collect();
        assert_eq!(names.first().map(String::as_str), Some("s2"));
        assert_eq!(names.last().map(String::as_str), Some("s11"));
    }

    #[test]
    fn test_remove_and_get() {
        let mut store = ScenarioStore::new(3);
        let keep = scenario("keep");
        let discard = scenario("drop");
        let keep_id = keep.id.clone();
        let drop_id = discard.id.clone();
        store.add(keep);
        store.add(discard);

        let removed = store.remove(&drop_id).unwrap();

        assert_eq!(removed.name, "drop");
        assert!(store.get(&drop_id).is_none());
        assert_eq!(store.get(&keep_id).map(|s| s.name.as_str()), Some("keep"));
        assert_eq!(
            store.remove(&drop_id),
            Err(StoreError::NotFound(drop_id.clone()))
        );
    }

    #[test]
    fn test_clear() {
        let mut store = ScenarioStore::new(2);
        store.add(scenario("a"));
        store.add(scenario("b"));

        store.clear();

        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_zero_capacity_still_holds_one() {
        let mut store = ScenarioStore::new(0);
        assert_eq!(store.capacity(), 1);

        store.add(scenario("first"));
        let evicted = store.add(scenario("second"));

        assert_eq!(evicted.map(|s| s.name), Some("first".to_string()));
        assert_eq!(store.list()[0].name, "second");
    }
}

//! # Uplift Core Types
//!
//! The shared vocabulary of the workspace. Every other crate speaks in these
//! structs: the metrics snapshot fetched from the store, the adjustments a user
//! dials in, the projection the calculator hands back and the saved scenario
//! that wraps both.
//!
//! As a Layer 0 crate it holds data only. No I/O, no calculation logic.

pub mod error;
pub mod live;
pub mod metrics;
pub mod results;
pub mod scenario;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use live::{CustomerStats, DateRange, LiveMetrics, OrderStats, StoreInfo};
pub use metrics::{Adjustments, Metrics};
pub use results::{BreakEven, CalculationResults, Impact, RevenueSnapshot, ScenarioComparison};
pub use scenario::Scenario;

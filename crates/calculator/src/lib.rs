//! # Uplift Calculation Engine
//!
//! Turns a baseline metrics snapshot plus a set of adjustments into a
//! before/after revenue projection.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the
//!   store connector, the scenario store or any presentation surface. It
//!   depends only on `core-types` (Layer 0).
//! - **Total Functions:** Every `(Metrics, Adjustments)` pair yields a result.
//!   Numeric edge cases degrade to defined values (`0` or `BreakEven::Never`)
//!   instead of errors or panics. The crate has no error type.
//! - **Stateless Calculation:** Nothing is cached between calls. The
//!   `CalculationEngine` only remembers its baseline for convenience.
//!
//! ## Public API
//!
//! - `project`: one baseline, one adjustment set, one `CalculationResults`.
//! - `compare_scenarios`: `project` mapped over a list of adjustment sets.
//! - `revenue`, `break_even`, `adjust_metrics`: the building blocks.
//! - `CalculationEngine`: a baseline bound to the functions above.

pub mod engine;

pub use engine::{
    CalculationEngine, IMPLEMENTATION_COST, adjust_metrics, break_even, compare_scenarios,
    project, revenue,
};

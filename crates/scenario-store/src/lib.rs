//! # Uplift Scenario Store
//!
//! The in-memory state the application keeps between calculations.
//!
//! ## Architectural Principles
//!
//! - **Ephemeral State:** Nothing here is persisted. The store keeps the
//!   most recent scenarios only and forgets everything on restart.
//! - **Explicit State:** `SessionState` is a plain struct handed to whoever
//!   owns it (the web server wraps it in a mutex). There is no global.
//!
//! ## Public API
//!
//! - `ScenarioStore`: a bounded, insertion-ordered list of saved scenarios.
//! - `SessionState`: the current store, live metrics, date range and
//!   loading/error flags, plus the `ScenarioStore`.
//! - `StoreError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod session;
pub mod store;

pub use error::StoreError;
pub use session::{BaselineDefaults, SessionSnapshot, SessionState};
pub use store::{DEFAULT_CAPACITY, ScenarioStore};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Scenario '{0}' was not found.")]
    NotFound(String),

    #[error("No metrics available. Please connect to a Shopify store first.")]
    NoMetrics,
}

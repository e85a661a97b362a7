use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No scenarios to export")]
    NoScenarios,

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to finish export buffer: {0}")]
    Io(String),
}

//! # Uplift Export
//!
//! Turns saved scenarios into downloadable files.
//!
//! ## Public API
//!
//! - `to_json`: a pretty-printed structural dump of the scenario list.
//! - `to_csv`: one flattened, human-readable row per scenario.
//! - `ExportFormat`: the supported formats with their content types and extensions.
//! - `export_file_name`: the `scenarios-<date>.<ext>` name for a download.

pub mod error;
pub mod format;

use chrono::NaiveDate;
use core_types::Scenario;
use serde::Serialize;

pub use error::ExportError;
pub use format::{format_currency, format_percent};

/// A supported export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("Unsupported export format '{}'. Use 'json' or 'csv'.", other)),
        }
    }
}

/// `scenarios-YYYY-MM-DD.<ext>`
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("scenarios-{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// Serializes `scenarios` in the requested format.
pub fn export(scenarios: &[Scenario], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => to_json(scenarios),
        ExportFormat::Csv => to_csv(scenarios),
    }
}

pub fn to_json(scenarios: &[Scenario]) -> Result<String, ExportError> {
    if scenarios.is_empty() {
        return Err(ExportError::NoScenarios);
    }
    Ok(serde_json::to_string_pretty(scenarios)?)
}

/// One spreadsheet row. Field names are the column headers.
#[derive(Debug, Serialize)]
struct ScenarioRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Created At")]
    created_at: String,
    #[serde(rename = "CVR Change")]
    cvr_change: String,
    #[serde(rename = "AOV Change")]
    aov_change: String,
    #[serde(rename = "Retention Change")]
    retention_change: String,
    #[serde(rename = "Traffic Change")]
    traffic_change: String,
    #[serde(rename = "Current Revenue")]
    current_revenue: String,
    #[serde(rename = "Projected Revenue")]
    projected_revenue: String,
    #[serde(rename = "Revenue Increase")]
    revenue_increase: String,
    #[serde(rename = "ROI")]
    roi: String,
    #[serde(rename = "Break-even Months")]
    break_even_months: String,
}

impl From<&Scenario> for ScenarioRecord {
    fn from(scenario: &Scenario) -> Self {
        let adjustments = &scenario.adjustments;
        let results = &scenario.results;
        Self {
            name: scenario.name.clone(),
            created_at: scenario
                .created_at
                .format("%-m/%-d/%Y, %-I:%M:%S %p")
                .to_string(),
            cvr_change: format!("{}%", adjustments.cvr_change),
            aov_change: format!("{}%", adjustments.aov_change),
            retention_change: format!("{}%", adjustments.retention_change),
            traffic_change: format!("{}%", adjustments.traffic_change),
            current_revenue: format_currency(results.current.revenue),
            projected_revenue: format_currency(results.projected.revenue),
            revenue_increase: format_currency(results.impact.revenue_increase),
            roi: format_percent(results.impact.percentage_increase),
            break_even_months: results.impact.break_even_months.to_string(),
        }
    }
}

pub fn to_csv(scenarios: &[Scenario]) -> Result<String, ExportError> {
    if scenarios.is_empty() {
        return Err(ExportError::NoScenarios);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    for scenario in scenarios {
        writer.serialize(ScenarioRecord::from(scenario))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.to_string()))?;

    String::from_utf8(bytes).map_err(|e| ExportError::Io(e.to_string()))
}

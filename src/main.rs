use anyhow::{Context, bail};
use api_client::{MetricsProvider, ShopifyClient};
use calculator::CalculationEngine;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::Config;
use core_types::{Adjustments, CalculationResults, DateRange, LiveMetrics, Metrics, Scenario};
use export::{ExportFormat, format_currency, format_percent};
use indicatif::{ProgressBar, ProgressStyle};
use scenario_store::ScenarioStore;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// The main entry point for the Uplift scenario calculator.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = configuration::load_config_from(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let _guard = configuration::init_tracing(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Metrics(args) => handle_metrics(args, &config).await,
        Commands::Simulate(args) => handle_simulate(args, &config).await,
        Commands::Compare(args) => handle_compare(args, &config).await,
        Commands::Serve => web_server::run_server(config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// What-if revenue scenarios for a Shopify store.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = configuration::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and print live store metrics.
    Metrics(MetricsArgs),
    /// Project revenue for a single set of adjustments.
    Simulate(SimulateArgs),
    /// Project several adjustment sets side by side.
    Compare(CompareArgs),
    /// Run the HTTP API.
    Serve,
}

#[derive(Args)]
struct RangeArgs {
    /// Aggregate over the last N days.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    days: Option<u32>,

    /// First day of the window (format: YYYY-MM-DD).
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Last day of the window (format: YYYY-MM-DD).
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,
}

#[derive(Args)]
struct MetricsArgs {
    #[command(flatten)]
    range: RangeArgs,

    /// Print the snapshot as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BaselineArgs {
    /// Baseline metrics as JSON instead of fetching them from the store,
    /// e.g. '{"conversionRate":2.3,"averageOrderValue":85,"retentionRate":30,"traffic":10000,"customerAcquisitionCost":50}'.
    #[arg(long)]
    baseline: Option<String>,

    #[command(flatten)]
    range: RangeArgs,
}

#[derive(Args)]
struct AdjustmentArgs {
    /// Conversion rate change in percent.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    cvr: f64,

    /// Average order value change in percent.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    aov: f64,

    /// Retention rate change in percent.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    retention: f64,

    /// Traffic change in percent.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    traffic: f64,

    /// Customer acquisition cost change, in currency units.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    cac: f64,
}

impl From<&AdjustmentArgs> for Adjustments {
    fn from(args: &AdjustmentArgs) -> Self {
        Adjustments::none()
            .with_cvr_change(args.cvr)
            .with_aov_change(args.aov)
            .with_retention_change(args.retention)
            .with_traffic_change(args.traffic)
            .with_cac_change(args.cac)
    }
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    adjustments: AdjustmentArgs,

    #[command(flatten)]
    baseline: BaselineArgs,

    /// Print the results as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CompareArgs {
    /// A JSON array of adjustment sets, inline or as a path to a file.
    #[arg(long)]
    scenarios: String,

    #[command(flatten)]
    baseline: BaselineArgs,

    /// Save the compared scenarios to this file (or directory).
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export format; inferred from the file extension when omitted.
    #[arg(long)]
    format: Option<ExportFormat>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_metrics(args: MetricsArgs, config: &Config) -> anyhow::Result<()> {
    let range = resolve_range(&args.range, config)?;
    let metrics = fetch_live_metrics(config, &range).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);
    table.add_row(vec!["Window".to_string(), format!("{} to {}", range.start_day(), range.end_day())]);
    table.add_row(vec!["Orders".to_string(), metrics.orders.count.to_string()]);
    table.add_row(vec!["Total Revenue".to_string(), format_currency(metrics.orders.total_revenue)]);
    table.add_row(vec!["Average Order Value".to_string(), format_currency(metrics.orders.average_value)]);
    table.add_row(vec!["Customers".to_string(), metrics.customers.total.to_string()]);
    table.add_row(vec!["Returning Customers".to_string(), metrics.customers.returning.to_string()]);
    table.add_row(vec!["Retention Rate".to_string(), format_percent(metrics.customers.retention_rate)]);
    table.add_row(vec!["Conversion Rate".to_string(), format_percent(metrics.conversion_rate)]);
    println!("{table}");

    Ok(())
}

async fn handle_simulate(args: SimulateArgs, config: &Config) -> anyhow::Result<()> {
    let engine = CalculationEngine::new(resolve_baseline(&args.baseline, config).await?);
    let results = engine.project(&Adjustments::from(&args.adjustments));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{}", results_table(&results));
    }
    Ok(())
}

async fn handle_compare(args: CompareArgs, config: &Config) -> anyhow::Result<()> {
    let adjustment_sets = parse_adjustment_sets(&args.scenarios)?;
    let engine = CalculationEngine::new(resolve_baseline(&args.baseline, config).await?);
    let comparisons = engine.compare_scenarios(&adjustment_sets);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Scenario",
        "CVR",
        "AOV",
        "Retention",
        "Traffic",
        "Projected Revenue",
        "Increase",
        "ROI",
        "Break-even (months)",
    ]);
    for comparison in &comparisons {
        let adjustments = &comparison.adjustments;
        let impact = &comparison.results.impact;
        table.add_row(vec![
            comparison.id.clone(),
            format!("{}%", adjustments.cvr_change),
            format!("{}%", adjustments.aov_change),
            format!("{}%", adjustments.retention_change),
            format!("{}%", adjustments.traffic_change),
            format_currency(comparison.results.projected.revenue),
            format_currency(impact.revenue_increase),
            format_percent(impact.percentage_increase),
            impact.break_even_months.to_string(),
        ]);
    }
    println!("{table}");

    let Some(target) = args.export else {
        return Ok(());
    };

    let now = Utc::now();
    let mut store = ScenarioStore::new(config.scenarios.max_saved);
    for (i, comparison) in comparisons.into_iter().enumerate() {
        let name = format!("Scenario {}", i + 1);
        let scenario = Scenario::new(Some(&name), comparison.adjustments, comparison.results, now);
        if let Some(evicted) = store.add(scenario) {
            tracing::warn!(name = %evicted.name, capacity = store.capacity(), "Scenario store full, dropped from export.");
        }
    }

    let format = match args.format {
        Some(format) => format,
        None => infer_format(&target),
    };
    let path = if target.is_dir() {
        target.join(export::export_file_name(format, now.date_naive()))
    } else {
        target
    };

    let body = export::export(&store.list(), format)?;
    std::fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Exported {} scenarios to {}", store.len(), path.display());

    Ok(())
}

// ==============================================================================
// Helpers
// ==============================================================================

fn resolve_range(args: &RangeArgs, config: &Config) -> anyhow::Result<DateRange> {
    match (args.from, args.to) {
        (Some(from), Some(to)) => {
            let start = from.and_hms_opt(0, 0, 0).context("Invalid start date")?.and_utc();
            let end = to.and_hms_opt(23, 59, 59).context("Invalid end date")?.and_utc();
            Ok(DateRange::new(start, end)?)
        }
        (None, None) => Ok(DateRange::last_days(
            args.days.unwrap_or(config.simulation.default_days),
            Utc::now(),
        )),
        _ => bail!("--from and --to must be given together"),
    }
}

async fn fetch_live_metrics(config: &Config, range: &DateRange) -> anyhow::Result<LiveMetrics> {
    let client = ShopifyClient::new(&config.shopify, config.simulation.placeholder_conversion_rate)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message(format!("Fetching metrics from {}...", client.store().domain));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.fetch_metrics(range).await;
    spinner.finish_and_clear();

    Ok(result?)
}

async fn resolve_baseline(args: &BaselineArgs, config: &Config) -> anyhow::Result<Metrics> {
    if let Some(raw) = &args.baseline {
        return serde_json::from_str(raw).context("Failed to parse --baseline as metrics JSON");
    }

    let range = resolve_range(&args.range, config)?;
    let live = fetch_live_metrics(config, &range).await?;
    Ok(live.to_baseline(
        config.simulation.default_traffic,
        config.simulation.default_customer_acquisition_cost,
    ))
}

/// Accepts either an inline JSON array or a path to a file holding one.
fn parse_adjustment_sets(input: &str) -> anyhow::Result<Vec<Adjustments>> {
    let trimmed = input.trim();
    let json = if trimmed.starts_with('[') {
        trimmed.to_string()
    } else {
        std::fs::read_to_string(trimmed).with_context(|| format!("Failed to read {}", trimmed))?
    };
    serde_json::from_str(&json).context("Expected a JSON array of adjustment sets")
}

fn infer_format(path: &Path) -> ExportFormat {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
        .unwrap_or_default()
}

fn results_table(results: &CalculationResults) -> Table {
    let current = &results.current;
    let projected = &results.projected;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["", "Current", "Projected"]);
    table.add_row(vec![
        "Revenue".to_string(),
        format_currency(current.revenue),
        format_currency(projected.revenue),
    ]);
    table.add_row(vec![
        "Conversion Rate".to_string(),
        format_percent(current.metrics.conversion_rate),
        format_percent(projected.metrics.conversion_rate),
    ]);
    table.add_row(vec![
        "Average Order Value".to_string(),
        format_currency(current.metrics.average_order_value),
        format_currency(projected.metrics.average_order_value),
    ]);
    table.add_row(vec![
        "Retention Rate".to_string(),
        format_percent(current.metrics.retention_rate),
        format_percent(projected.metrics.retention_rate),
    ]);
    table.add_row(vec![
        "Traffic".to_string(),
        format!("{:.0}", current.metrics.traffic),
        format!("{:.0}", projected.metrics.traffic),
    ]);
    table.add_row(vec![
        "Revenue Increase".to_string(),
        String::new(),
        format_currency(results.impact.revenue_increase),
    ]);
    table.add_row(vec![
        "ROI".to_string(),
        String::new(),
        format_percent(results.impact.percentage_increase),
    ]);
    table.add_row(vec![
        "Break-even (months)".to_string(),
        String::new(),
        results.impact.break_even_months.to_string(),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_negative_adjustments() {
        let cli = Cli::try_parse_from(["uplift", "simulate", "--aov", "-5", "--cvr", "10"]).unwrap();

        match cli.command {
            Commands::Simulate(args) => {
                let adjustments = Adjustments::from(&args.adjustments);
                assert_eq!(adjustments.aov_change, -5.0);
                assert_eq!(adjustments.cvr_change, 10.0);
                assert_eq!(adjustments.traffic_change, 0.0);
            }
            _ => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_from_requires_to() {
        assert!(Cli::try_parse_from(["uplift", "metrics", "--from", "2025-01-01"]).is_err());
        assert!(Cli::try_parse_from(["uplift", "metrics", "--days", "7", "--from", "2025-01-01", "--to", "2025-01-31"]).is_err());
    }

    #[test]
    fn test_resolve_explicit_range_covers_whole_days() {
        let args = RangeArgs {
            days: None,
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            to: NaiveDate::from_ymd_opt(2025, 1, 31),
        };

        let range = resolve_range(&args, &Config::default()).unwrap();

        assert_eq!(range.start_day(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        assert_eq!(range.end_day(), NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    }

    #[test]
    fn test_parse_inline_adjustment_sets() {
        let sets = parse_adjustment_sets(r#"[{"cvrChange": 10}, {"aovChange": -5, "cacChange": 3}]"#).unwrap();

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0], Adjustments::none().with_cvr_change(10.0));
        assert_eq!(sets[1].cac_change, 3.0);
    }

    #[test]
    fn test_infer_format() {
        assert_eq!(infer_format(Path::new("out/scenarios.csv")), ExportFormat::Csv);
        assert_eq!(infer_format(Path::new("out/scenarios.json")), ExportFormat::Json);
        assert_eq!(infer_format(Path::new("out")), ExportFormat::Json);
    }
}

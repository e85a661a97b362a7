use crate::error::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its `Default`, so an empty (or missing)
/// `config.toml` yields a runnable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub shopify: ShopifyConfig,
    pub simulation: SimulationDefaults,
    pub scenarios: ScenarioSettings,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Rejects values that would make the application misbehave at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scenarios.max_saved == 0 {
            return Err(ConfigError::ValidationError(
                "scenarios.max_saved must be at least 1".to_string(),
            ));
        }
        let traffic = self.simulation.default_traffic;
        if traffic.is_nan() || traffic <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "simulation.default_traffic must be positive, got {}",
                self.simulation.default_traffic
            )));
        }
        if self.shopify.api_version.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "shopify.api_version must not be empty".to_string(),
            ));
        }
        if self.shopify.page_size == 0 || self.shopify.page_size > 250 {
            return Err(ConfigError::ValidationError(format!(
                "shopify.page_size must be between 1 and 250, got {}",
                self.shopify.page_size
            )));
        }
        Ok(())
    }
}

/// Connection settings for the Shopify Admin GraphQL API.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ShopifyConfig {
    /// The shop domain, e.g. `acme.myshopify.com`.
    pub store_domain: String,
    pub admin_api_token: String,
    /// The Admin API version segment of the endpoint URL.
    pub api_version: String,
    /// How many orders and customers to request per query (Shopify caps this at 250).
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

impl ShopifyConfig {
    pub fn is_configured(&self) -> bool {
        !self.store_domain.trim().is_empty() && !self.admin_api_token.trim().is_empty()
    }
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            store_domain: String::new(),
            admin_api_token: String::new(),
            api_version: "2025-10".to_string(),
            page_size: 250,
            request_timeout_secs: 30,
        }
    }
}

// The token must never end up in a log line.
impl fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_domain", &self.store_domain)
            .field("admin_api_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("page_size", &self.page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Inputs the store cannot provide, used to complete a baseline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationDefaults {
    /// Sessions per period assumed when building a baseline from live metrics.
    pub default_traffic: f64,
    pub default_customer_acquisition_cost: f64,
    /// Reported as the conversion rate until real session analytics exist.
    pub placeholder_conversion_rate: f64,
    /// Length of the metrics window when none is requested.
    pub default_days: u32,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            default_traffic: 10_000.0,
            default_customer_acquisition_cost: 50.0,
            placeholder_conversion_rate: 2.3,
            default_days: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScenarioSettings {
    /// The most recent scenarios kept; older ones are evicted first.
    pub max_saved: usize,
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        Self { max_saved: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!("Invalid server address: {}", e)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            body_limit_bytes: 1024 * 1024,
        }
    }
}

/// Sign-in happens upstream (an OAuth proxy); this only restricts which
/// e-mail domain the proxy is allowed to let through.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// When unset, the allow-list check is disabled.
    pub allowed_domain: Option<String>,
    /// The header the proxy stores the signed-in e-mail address in.
    pub email_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            allowed_domain: None,
            email_header: "x-auth-request-email".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "uplift.log".to_string(),
        }
    }
}

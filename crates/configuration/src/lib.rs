use crate::error::ConfigError;
use std::env;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AuthConfig, Config, LoggingConfig, ScenarioSettings, ServerConfig, ShopifyConfig,
    SimulationDefaults,
};

/// The file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration from `config.toml` in the working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Loads the application configuration, layering sources from lowest to highest priority:
///
/// 1. Built-in defaults.
/// 2. The TOML file at `path`, if it exists.
/// 3. `UPLIFT_`-prefixed environment variables, with `__` between nested keys
///    (e.g. `UPLIFT_SERVER__PORT=8080`).
/// 4. `SHOPIFY_STORE_DOMAIN` and `SHOPIFY_ADMIN_API_TOKEN`.
///
/// The result is validated before it is returned.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    tracing::debug!(path = %path.display(), "Loading configuration.");

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("UPLIFT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("shopify.store_domain", env::var("SHOPIFY_STORE_DOMAIN").ok())?
        .set_override_option(
            "shopify.admin_api_token",
            env::var("SHOPIFY_ADMIN_API_TOKEN").ok(),
        )?
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}

use api_client::{MetricsProvider, ShopifyClient, error::ApiError};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};
use configuration::{AuthConfig, Config};
use scenario_store::{BaselineDefaults, SessionState};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};
// Note: Tracing is handled by the main application configuration.

pub mod auth;
pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    /// `None` when Shopify credentials are not configured.
    pub provider: Option<Arc<dyn MetricsProvider>>,
    pub session: Mutex<SessionState>,
    pub defaults: BaselineDefaults,
    pub default_days: u32,
    pub auth: AuthConfig,
    pub body_limit_bytes: usize,
}

impl AppState {
    pub fn new(provider: Option<Arc<dyn MetricsProvider>>, config: &Config) -> Self {
        Self {
            provider,
            session: Mutex::new(SessionState::new(config.scenarios.max_saved)),
            defaults: BaselineDefaults {
                traffic: config.simulation.default_traffic,
                customer_acquisition_cost: config.simulation.default_customer_acquisition_cost,
            },
            default_days: config.simulation.default_days,
            auth: config.auth.clone(),
            body_limit_bytes: config.server.body_limit_bytes,
        }
    }

    /// Builds the state with a live Shopify client. Missing credentials are not
    /// fatal: the server still simulates against explicit baselines.
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let provider: Option<Arc<dyn MetricsProvider>> =
            match ShopifyClient::new(&config.shopify, config.simulation.placeholder_conversion_rate) {
                Ok(client) => Some(Arc::new(client)),
                Err(ApiError::NotConfigured) => {
                    tracing::warn!("Shopify credentials not configured; /api/metrics will be unavailable.");
                    None
                }
                Err(e) => return Err(e),
            };
        Ok(Self::new(provider, config))
    }
}

/// Assembles the application routes and middleware around `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // Everything except the health check sits behind the domain allow-list.
    let protected = Router::new()
        .route("/api/session", get(handlers::get_session))
        .route("/api/metrics", get(handlers::get_metrics))
        .route("/api/simulate", post(handlers::simulate))
        .route("/api/compare", post(handlers::compare))
        .route(
            "/api/scenarios",
            get(handlers::list_scenarios)
                .post(handlers::save_scenario)
                .delete(handlers::clear_scenarios),
        )
        .route("/api/scenarios/export", get(handlers::export_scenarios))
        .route("/api/scenarios/:id", delete(handlers::delete_scenario))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_allowed_domain,
        ));

    let body_limit = state.body_limit_bytes;

    Router::new()
        .route("/api/health", get(handlers::health))
        .merge(protected)
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let addr = config.server.socket_addr()?;
    let state = Arc::new(AppState::from_config(&config)?);
    let app = build_router(state);

    tracing::info!("Web server started and listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping web server.");
}

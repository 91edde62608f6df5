//! Flood Risk Assessment Platform - Backend Server
//!
//! Fuses satellite-derived vegetation, surface water, soil moisture and water
//! level indicators into a flood risk score for any point on the globe.

use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use external::SatelliteIndicatorClient;
use services::{IndicatorSource, RiskAssessmentService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub assessment: Arc<RiskAssessmentService>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flood_risk_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Flood Risk Assessment Server");
    tracing::info!("Environment: {}", config.environment);

    if config.provider.api_key.is_empty() {
        tracing::warn!("No indicator API key configured; requests may be rejected upstream");
    }

    let client = SatelliteIndicatorClient::new(&config.provider)?;
    let source = IndicatorSource::new(
        Arc::new(client),
        Duration::from_secs(config.provider.timeout_secs),
        config.provider.retries,
    );
    let assessment = RiskAssessmentService::new(source, config.assessment.clone())?;

    tracing::info!(
        endpoint = %config.provider.api_endpoint,
        lookback_days = config.assessment.lookback_days,
        policy = ?config.assessment.missing_indicator_policy,
        "Assessment pipeline ready"
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        assessment: Arc::new(assessment),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Flood Risk Assessment Platform API v1.0"
}

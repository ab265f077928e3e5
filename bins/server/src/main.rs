//! Tally API Server
//!
//! Main entry point for the Tally dashboard service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_api::{AppState, create_router};
use tally_core::dashboard::{DashboardService, RecordStore};
use tally_db::{DashboardRepository, connect_with};
use tally_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect_with(&config.database).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)?,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Create dashboard service
    let store: Arc<dyn RecordStore> = Arc::new(DashboardRepository::new(db));
    let dashboard = DashboardService::new(store, config.dashboard);
    info!(
        recent_limit = config.dashboard.recent_limit,
        expense_window_days = config.dashboard.expense_window_days,
        income_window_days = config.dashboard.income_window_days,
        "Dashboard service configured"
    );

    // Create application state
    let state = AppState {
        dashboard: Arc::new(dashboard),
        jwt_service: Arc::new(jwt_service),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! Paisa API Server
//!
//! Main entry point for the Paisa wallet backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paisa_api::{AppState, create_router};
use paisa_core::payment::{SignatureVerifier, StubGateway};
use paisa_db::connect;
use paisa_shared::AppConfig;
use paisa_shared::types::MinorUnits;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paisa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Wire the payment gateway and signature verifier
    let gateway = StubGateway::new(
        config.payment.currency.clone(),
        MinorUnits::new(config.payment.min_topup_minor),
    );
    let verifier = SignatureVerifier::new(config.payment.key_secret.clone());
    info!(
        key_id = %config.payment.key_id,
        currency = %config.payment.currency,
        "Payment gateway configured"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        gateway: Arc::new(gateway),
        verifier: Arc::new(verifier),
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

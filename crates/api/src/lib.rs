//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for wallets, users, and payment top-ups
//! - Shared application state
//! - JSON error responses in the `{ "error", "message" }` shape

pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use paisa_core::payment::{PaymentGateway, SignatureVerifier};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Payment gateway for top-up orders.
    pub gateway: Arc<dyn PaymentGateway>,
    /// Signature verifier for payment callbacks.
    pub verifier: Arc<SignatureVerifier>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

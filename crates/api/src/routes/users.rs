//! User registration routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use paisa_db::repositories::{UserError, UserRepository};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/users", post(create_user))
}

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Email address, used as the transfer handle.
    pub email: String,
    /// Display name.
    pub full_name: String,
}

/// POST `/users` - Register a user with a zero-balance wallet.
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    let email = payload.email.trim();
    let full_name = payload.full_name.trim();

    if email.is_empty() || !email.contains('@') {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_email",
                "message": "A valid email address is required"
            })),
        )
            .into_response();
    }

    if full_name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_name",
                "message": "Full name is required"
            })),
        )
            .into_response();
    }

    let users_repo = UserRepository::new((*state.db).clone());

    match users_repo.create_user(email, full_name).await {
        Ok((user, wallet)) => {
            info!(user_id = %user.id, "User registered");
            (
                StatusCode::CREATED,
                Json(json!({
                    "user": {
                        "id": user.id,
                        "email": user.email,
                        "full_name": user.full_name,
                        "created_at": user.created_at.to_rfc3339(),
                    },
                    "wallet": {
                        "id": wallet.id,
                        "balance": wallet.balance,
                    }
                })),
            )
                .into_response()
        }
        Err(UserError::EmailTaken(_)) => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "email_taken",
                "message": "Email is already registered"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create user");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

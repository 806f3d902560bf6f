//! Wallet routes: statement, top-up orders, payment verification, payments.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;
use paisa_core::ledger::{LedgerError, TransactionDirection};
use paisa_core::payment::PaymentError;
use paisa_db::entities::wallet_transactions;
use paisa_db::repositories::{WalletError, WalletRepository};
use paisa_shared::types::MinorUnits;

/// Creates the wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallet/{user_id}", get(get_wallet))
        .route("/wallet/create-order", post(create_order))
        .route("/wallet/verify-payment", post(verify_payment))
        .route("/wallet/pay-to-user", post(pay_to_user))
        .route("/wallet/debit", post(debit))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a top-up order.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Order amount in minor currency units (paise).
    pub amount: i64,
}

/// Request body for verifying a gateway payment.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    /// Gateway order id.
    pub order_id: String,
    /// Gateway payment id.
    pub payment_id: String,
    /// Hex HMAC-SHA256 signature over `"{order_id}|{payment_id}"`.
    pub signature: String,
    /// Paid amount in minor currency units.
    pub amount: i64,
    /// Wallet owner to credit.
    pub user_id: Uuid,
}

/// Request body for a peer-to-peer payment.
#[derive(Debug, Deserialize)]
pub struct PayToUserRequest {
    /// Sender user id.
    pub sender_id: Uuid,
    /// Recipient email address.
    pub recipient_email: String,
    /// Amount as a decimal string, at most 2 fractional digits.
    pub amount: String,
    /// Optional note recorded on the sender's ledger entry.
    pub description: Option<String>,
}

/// Request body for a direct debit (e.g. campus purchase).
#[derive(Debug, Deserialize)]
pub struct DebitRequest {
    /// Wallet owner to debit.
    pub user_id: Uuid,
    /// Amount as a decimal string, at most 2 fractional digits.
    pub amount: String,
    /// Optional note recorded on the ledger entry.
    pub description: Option<String>,
}

/// One ledger entry in a wallet statement.
#[derive(Debug, Serialize)]
pub struct TransactionItem {
    /// Entry id.
    pub id: Uuid,
    /// Entry amount, always positive.
    pub amount: Decimal,
    /// "credit" or "debit".
    pub direction: &'static str,
    /// Ledger note.
    pub description: String,
    /// Creation timestamp.
    pub created_at: String,
}

impl From<wallet_transactions::Model> for TransactionItem {
    fn from(entry: wallet_transactions::Model) -> Self {
        Self {
            id: entry.id,
            amount: entry.amount,
            direction: TransactionDirection::from(entry.direction).as_str(),
            description: entry.description,
            created_at: entry.created_at.to_rfc3339(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/wallet/{user_id}` - Balance and transaction history, newest first.
async fn get_wallet(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> impl IntoResponse {
    let wallets_repo = WalletRepository::new((*state.db).clone());

    match wallets_repo.statement(user_id).await {
        Ok(statement) => {
            let transactions: Vec<TransactionItem> =
                statement.entries.into_iter().map(Into::into).collect();

            (
                StatusCode::OK,
                Json(json!({
                    "balance": statement.wallet.balance,
                    "transactions": transactions,
                })),
            )
                .into_response()
        }
        Err(e) => wallet_error_response("Failed to load wallet statement", &e),
    }
}

/// POST `/wallet/create-order` - Request a top-up order from the gateway.
async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> impl IntoResponse {
    match state.gateway.create_order(MinorUnits::new(payload.amount)).await {
        Ok(order) => (StatusCode::OK, Json(json!({ "order": order }))).into_response(),
        Err(PaymentError::AmountBelowMinimum { minimum, .. }) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "amount_below_minimum",
                "message": format!("Order amount must be at least {minimum} minor units")
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Gateway order creation failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({
                    "error": "gateway_error",
                    "message": "Payment gateway is unavailable"
                })),
            )
                .into_response()
        }
    }
}

/// POST `/wallet/verify-payment` - Verify a gateway signature, then credit.
///
/// The signature check always runs; a mismatch rejects the top-up before any
/// balance is touched.
async fn verify_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<VerifyPaymentRequest>,
) -> impl IntoResponse {
    if let Err(e) = state
        .verifier
        .verify(&payload.order_id, &payload.payment_id, &payload.signature)
    {
        warn!(order_id = %payload.order_id, error = %e, "Payment verification failed");
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "verification_failed",
                "message": "Payment signature verification failed"
            })),
        )
            .into_response();
    }

    let amount = MinorUnits::new(payload.amount).to_decimal();
    let description = format!("Wallet top-up ({})", payload.payment_id);
    let wallets_repo = WalletRepository::new((*state.db).clone());

    match wallets_repo
        .credit(
            payload.user_id,
            amount,
            &description,
            idempotency_key(&headers),
        )
        .await
    {
        Ok(outcome) => {
            info!(user_id = %payload.user_id, order_id = %payload.order_id, "Top-up credited");
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Payment verified and wallet credited",
                    "balance": outcome.wallet.balance,
                })),
            )
                .into_response()
        }
        Err(e) => wallet_error_response("Failed to credit verified top-up", &e),
    }
}

/// POST `/wallet/pay-to-user` - Transfer funds to another user by email.
async fn pay_to_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PayToUserRequest>,
) -> impl IntoResponse {
    let amount = match parse_amount(&payload.amount) {
        Ok(a) => a,
        Err(response) => return response,
    };

    let wallets_repo = WalletRepository::new((*state.db).clone());

    match wallets_repo
        .transfer(
            payload.sender_id,
            &payload.recipient_email,
            amount,
            payload.description.as_deref(),
            idempotency_key(&headers),
        )
        .await
    {
        Ok(outcome) => {
            info!(
                sender_id = %payload.sender_id,
                amount = %amount,
                "Payment sent"
            );
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Payment successful",
                    "balance": outcome.sender_wallet.balance,
                })),
            )
                .into_response()
        }
        Err(e) => wallet_error_response("Failed to transfer funds", &e),
    }
}

/// POST `/wallet/debit` - Debit a wallet directly.
async fn debit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<DebitRequest>,
) -> impl IntoResponse {
    let amount = match parse_amount(&payload.amount) {
        Ok(a) => a,
        Err(response) => return response,
    };

    let description = payload.description.as_deref().unwrap_or("Wallet debit");
    let wallets_repo = WalletRepository::new((*state.db).clone());

    match wallets_repo
        .debit(payload.user_id, amount, description, idempotency_key(&headers))
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "message": "Amount debited",
                "wallet": {
                    "id": outcome.wallet.id,
                    "balance": outcome.wallet.balance,
                }
            })),
        )
            .into_response(),
        Err(e) => wallet_error_response("Failed to debit wallet", &e),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Extracts the optional `Idempotency-Key` header.
fn idempotency_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("idempotency-key")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
}

/// Parses a request amount string into a `Decimal`.
fn parse_amount(raw: &str) -> Result<Decimal, Response> {
    match Decimal::from_str(raw.trim()) {
        Ok(amount) => Ok(amount),
        Err(_) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Invalid amount format"
            })),
        )
            .into_response()),
    }
}

/// Maps a repository error to a JSON error response.
fn wallet_error_response(context: &str, e: &WalletError) -> Response {
    match e {
        WalletError::Ledger(ledger) => {
            let (code, status) = match ledger {
                LedgerError::InsufficientFunds { .. } => {
                    ("insufficient_funds", StatusCode::BAD_REQUEST)
                }
                LedgerError::SameAccountTransfer => {
                    ("same_account_transfer", StatusCode::BAD_REQUEST)
                }
                _ => ("invalid_amount", StatusCode::BAD_REQUEST),
            };
            (
                status,
                Json(json!({ "error": code, "message": ledger.to_string() })),
            )
                .into_response()
        }
        WalletError::WalletNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "wallet_not_found",
                "message": "Wallet not found"
            })),
        )
            .into_response(),
        WalletError::RecipientNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "recipient_not_found",
                "message": "Recipient not found"
            })),
        )
            .into_response(),
        WalletError::DuplicateRequest => (
            StatusCode::CONFLICT,
            Json(json!({
                "error": "duplicate_request",
                "message": "Idempotency key was already used"
            })),
        )
            .into_response(),
        WalletError::Database(err) => {
            error!(error = %err, "{context}");
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

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("120.50", dec!(120.50))]
    #[case(" 10 ", dec!(10))]
    #[case("0.01", dec!(0.01))]
    fn test_parse_amount_accepts(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_amount(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("ten rupees")]
    #[case("")]
    #[case("1,000")]
    fn test_parse_amount_rejects(#[case] raw: &str) {
        assert!(parse_amount(raw).is_err());
    }

    #[test]
    fn test_idempotency_key_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(idempotency_key(&headers), None);

        headers.insert("idempotency-key", HeaderValue::from_static("  abc-123 "));
        assert_eq!(idempotency_key(&headers), Some("abc-123"));

        headers.insert("idempotency-key", HeaderValue::from_static("   "));
        assert_eq!(idempotency_key(&headers), None);
    }
}

//! Error types for payment operations.

use thiserror::Error;

/// Errors from order creation and payment verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    /// Order amount is below the gateway minimum.
    #[error("Order amount {amount} is below the minimum of {minimum} minor units")]
    AmountBelowMinimum {
        /// Requested amount in minor units.
        amount: i64,
        /// Minimum accepted amount in minor units.
        minimum: i64,
    },

    /// Supplied signature does not match the recomputed value.
    #[error("Payment verification failed")]
    VerificationFailed,

    /// The gateway rejected or failed the request.
    #[error("Payment gateway error: {0}")]
    Gateway(String),
}

//! Error types for ledger operations.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from ledger validation and balance mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Amount is zero.
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    /// Amount is negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Amount has more fractional digits than the ledger supports.
    #[error("Amount has {scale} fractional digits, at most {max} allowed")]
    ExcessPrecision {
        /// Fractional digits supplied.
        scale: u32,
        /// Fractional digits allowed.
        max: u32,
    },

    /// Debit would drive the balance negative.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientFunds {
        /// Balance available before the debit.
        available: Decimal,
        /// Amount requested.
        requested: Decimal,
    },

    /// Sender and recipient resolve to the same wallet.
    #[error("Cannot transfer to the same wallet")]
    SameAccountTransfer,
}

impl LedgerError {
    /// Returns true if the error is an invalid-amount rejection.
    #[must_use]
    pub const fn is_invalid_amount(&self) -> bool {
        matches!(
            self,
            Self::ZeroAmount | Self::NegativeAmount | Self::ExcessPrecision { .. }
        )
    }
}

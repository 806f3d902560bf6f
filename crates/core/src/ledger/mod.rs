//! Wallet ledger logic.
//!
//! This module implements the core ledger functionality:
//! - Transaction directions (credits and debits)
//! - Amount validation rules
//! - Balance mutation with the non-negative invariant
//! - Transfer planning between two wallets
//! - Error types for ledger operations

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{Posting, TransactionDirection, TransferPlan};

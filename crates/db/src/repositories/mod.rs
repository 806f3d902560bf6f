//! Repository abstractions for data access.
//!
//! Repositories own all writes to the ledger tables. Balance mutations run
//! inside a database transaction with the affected wallet rows locked via
//! `SELECT ... FOR UPDATE`, so concurrent requests serialize per wallet.

pub mod user;
pub mod wallet;

pub use user::{UserError, UserRepository};
pub use wallet::{
    MutationOutcome, TransferOutcome, WalletError, WalletRepository, WalletStatement,
};

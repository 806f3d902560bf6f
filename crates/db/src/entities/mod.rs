//! `SeaORM` entity definitions.

pub mod idempotency_keys;
pub mod sea_orm_active_enums;
pub mod users;
pub mod wallet_transactions;
pub mod wallets;

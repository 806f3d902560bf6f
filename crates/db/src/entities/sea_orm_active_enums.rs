//! Database enum mappings.

use paisa_core::ledger;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of a wallet transaction, mapped to the `transaction_direction`
/// Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_direction")]
#[serde(rename_all = "lowercase")]
pub enum TransactionDirection {
    /// Balance increases.
    #[sea_orm(string_value = "credit")]
    Credit,
    /// Balance decreases.
    #[sea_orm(string_value = "debit")]
    Debit,
}

impl From<ledger::TransactionDirection> for TransactionDirection {
    fn from(value: ledger::TransactionDirection) -> Self {
        match value {
            ledger::TransactionDirection::Credit => Self::Credit,
            ledger::TransactionDirection::Debit => Self::Debit,
        }
    }
}

impl From<TransactionDirection> for ledger::TransactionDirection {
    fn from(value: TransactionDirection) -> Self {
        match value {
            TransactionDirection::Credit => Self::Credit,
            TransactionDirection::Debit => Self::Debit,
        }
    }
}

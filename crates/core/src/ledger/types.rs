//! Ledger domain types for wallet mutation and transfer planning.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a ledger entry relative to the owning wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionDirection {
    /// Balance increases.
    Credit,
    /// Balance decreases.
    Debit,
}

impl TransactionDirection {
    /// Returns the lowercase wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl std::fmt::Display for TransactionDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            other => Err(format!("Unknown transaction direction: {other}")),
        }
    }
}

/// A single planned ledger entry: one wallet, one direction, one amount.
///
/// Postings are produced by validation and consumed by the persistence layer
/// inside an atomic unit; the amount is always a validated positive magnitude.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// The wallet whose balance this posting mutates.
    pub wallet_id: Uuid,
    /// Whether the balance increases or decreases.
    pub direction: TransactionDirection,
    /// Positive amount in major units.
    pub amount: Decimal,
    /// Human-readable description recorded on the ledger entry.
    pub description: String,
}

/// A validated peer-to-peer transfer: one debit and one matching credit.
///
/// Both postings carry the same amount; they commit together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    /// Posting against the sender's wallet.
    pub debit: Posting,
    /// Posting against the recipient's wallet.
    pub credit: Posting,
}

impl TransferPlan {
    /// Returns the transferred amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.debit.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(TransactionDirection::Credit)]
    #[case(TransactionDirection::Debit)]
    fn test_direction_round_trip(#[case] dir: TransactionDirection) {
        assert_eq!(TransactionDirection::from_str(dir.as_str()).unwrap(), dir);
    }

    #[rstest]
    #[case("refund")]
    #[case("CREDIT")]
    #[case("")]
    fn test_direction_rejects_unknown(#[case] raw: &str) {
        assert!(TransactionDirection::from_str(raw).is_err());
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(TransactionDirection::Credit.to_string(), "credit");
        assert_eq!(TransactionDirection::Debit.to_string(), "debit");
    }
}

//! Ledger service for amount validation and balance mutation.
//!
//! This service contains pure business logic with no database dependencies.
//! The persistence layer calls into it while holding the relevant wallet rows
//! locked, so the funds check and the mutation stay indivisible.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::types::{Posting, TransactionDirection, TransferPlan};
use paisa_shared::types::AMOUNT_SCALE;

/// Ledger service for wallet balance rules.
pub struct LedgerService;

impl LedgerService {
    /// Validates a monetary amount and normalizes it to ledger scale.
    ///
    /// The amount must be strictly positive with at most [`AMOUNT_SCALE`]
    /// fractional digits.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the amount is zero, negative, or has excess
    /// precision.
    pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
        if amount.is_zero() {
            return Err(LedgerError::ZeroAmount);
        }
        if amount.is_sign_negative() {
            return Err(LedgerError::NegativeAmount);
        }
        if amount.scale() > AMOUNT_SCALE {
            return Err(LedgerError::ExcessPrecision {
                scale: amount.scale(),
                max: AMOUNT_SCALE,
            });
        }

        let mut normalized = amount;
        normalized.rescale(AMOUNT_SCALE);
        Ok(normalized)
    }

    /// Applies a single posting to a balance and returns the new balance.
    ///
    /// For debits the precondition `balance >= amount` is checked here, in the
    /// same call that computes the mutation, so a caller holding the wallet
    /// lock cannot interleave a stale check with the write.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the amount is invalid or a debit would drive
    /// the balance negative.
    pub fn apply(
        balance: Decimal,
        amount: Decimal,
        direction: TransactionDirection,
    ) -> Result<Decimal, LedgerError> {
        let amount = Self::validate_amount(amount)?;

        match direction {
            TransactionDirection::Credit => Ok(balance + amount),
            TransactionDirection::Debit => {
                if balance < amount {
                    return Err(LedgerError::InsufficientFunds {
                        available: balance,
                        requested: amount,
                    });
                }
                Ok(balance - amount)
            }
        }
    }

    /// Plans a peer-to-peer transfer as a matched debit/credit pair.
    ///
    /// Produces the sender's debit posting and the recipient's credit posting
    /// with ledger descriptions. The funds check happens later, when the
    /// postings are applied under the wallet locks.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the amount is invalid or both sides resolve
    /// to the same wallet.
    pub fn plan_transfer(
        sender_wallet_id: Uuid,
        recipient_wallet_id: Uuid,
        recipient_email: &str,
        sender_email: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<TransferPlan, LedgerError> {
        if sender_wallet_id == recipient_wallet_id {
            return Err(LedgerError::SameAccountTransfer);
        }

        let amount = Self::validate_amount(amount)?;

        let debit_description = description
            .map_or_else(|| format!("Payment to {recipient_email}"), String::from);

        Ok(TransferPlan {
            debit: Posting {
                wallet_id: sender_wallet_id,
                direction: TransactionDirection::Debit,
                amount,
                description: debit_description,
            },
            credit: Posting {
                wallet_id: recipient_wallet_id,
                direction: TransactionDirection::Credit,
                amount,
                description: format!("Received from {sender_email}"),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_amount_positive() {
        assert_eq!(LedgerService::validate_amount(dec!(100)).unwrap(), dec!(100.00));
        assert_eq!(
            LedgerService::validate_amount(dec!(0.01)).unwrap(),
            dec!(0.01)
        );
    }

    #[test]
    fn test_validate_amount_zero() {
        assert_eq!(
            LedgerService::validate_amount(dec!(0)),
            Err(LedgerError::ZeroAmount)
        );
    }

    #[test]
    fn test_validate_amount_negative() {
        assert_eq!(
            LedgerService::validate_amount(dec!(-5)),
            Err(LedgerError::NegativeAmount)
        );
    }

    #[test]
    fn test_validate_amount_excess_precision() {
        assert!(matches!(
            LedgerService::validate_amount(dec!(1.005)),
            Err(LedgerError::ExcessPrecision { scale: 3, max: 2 })
        ));
    }

    #[test]
    fn test_apply_credit() {
        let balance = LedgerService::apply(dec!(0), dec!(500), TransactionDirection::Credit)
            .unwrap();
        assert_eq!(balance, dec!(500.00));
    }

    #[test]
    fn test_apply_debit() {
        let balance = LedgerService::apply(dec!(500), dec!(200), TransactionDirection::Debit)
            .unwrap();
        assert_eq!(balance, dec!(300.00));
    }

    #[test]
    fn test_apply_debit_exact_balance() {
        let balance = LedgerService::apply(dec!(500), dec!(500), TransactionDirection::Debit)
            .unwrap();
        assert_eq!(balance, dec!(0.00));
    }

    #[test]
    fn test_apply_debit_insufficient_funds() {
        let result = LedgerService::apply(dec!(500), dec!(600), TransactionDirection::Debit);
        assert_eq!(
            result,
            Err(LedgerError::InsufficientFunds {
                available: dec!(500),
                requested: dec!(600.00),
            })
        );
    }

    #[test]
    fn test_apply_rejects_invalid_amount() {
        assert!(
            LedgerService::apply(dec!(100), dec!(0), TransactionDirection::Credit)
                .unwrap_err()
                .is_invalid_amount()
        );
        assert!(
            LedgerService::apply(dec!(100), dec!(-1), TransactionDirection::Debit)
                .unwrap_err()
                .is_invalid_amount()
        );
    }

    #[test]
    fn test_plan_transfer() {
        let sender = Uuid::new_v4();
        let recipient = Uuid::new_v4();

        let plan = LedgerService::plan_transfer(
            sender,
            recipient,
            "friend@campus.edu",
            "me@campus.edu",
            dec!(300),
            Some("lunch"),
        )
        .unwrap();

        assert_eq!(plan.amount(), dec!(300.00));
        assert_eq!(plan.debit.wallet_id, sender);
        assert_eq!(plan.debit.direction, TransactionDirection::Debit);
        assert_eq!(plan.debit.description, "lunch");
        assert_eq!(plan.credit.wallet_id, recipient);
        assert_eq!(plan.credit.direction, TransactionDirection::Credit);
        assert_eq!(plan.credit.description, "Received from me@campus.edu");
    }

    #[test]
    fn test_plan_transfer_default_description() {
        let plan = LedgerService::plan_transfer(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "friend@campus.edu",
            "me@campus.edu",
            dec!(50),
            None,
        )
        .unwrap();

        assert_eq!(plan.debit.description, "Payment to friend@campus.edu");
    }

    #[test]
    fn test_plan_transfer_same_wallet() {
        let wallet = Uuid::new_v4();
        let result = LedgerService::plan_transfer(
            wallet,
            wallet,
            "me@campus.edu",
            "me@campus.edu",
            dec!(10),
            None,
        );
        assert_eq!(result, Err(LedgerError::SameAccountTransfer));
    }

    #[test]
    fn test_plan_transfer_invalid_amount() {
        let result = LedgerService::plan_transfer(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "friend@campus.edu",
            "me@campus.edu",
            dec!(0),
            None,
        );
        assert_eq!(result, Err(LedgerError::ZeroAmount));
    }
}

//! Property-based tests for LedgerService.
//!
//! Checked properties:
//! - Conservation: transfers never change the total across wallets; the total
//!   moves only by the net of external credits minus debits.
//! - Non-negativity: no committed mutation leaves a balance negative.
//! - Rejection leaves no trace: a failed operation changes nothing.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::service::LedgerService;
use super::types::TransactionDirection;

/// Strategy to generate amounts (0.01 to 10,000.00), valid at ledger scale.
fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// One randomly generated ledger operation against a small set of wallets.
#[derive(Debug, Clone)]
enum Op {
    Credit { wallet: usize, amount: Decimal },
    Debit { wallet: usize, amount: Decimal },
    Transfer { from: usize, to: usize, amount: Decimal },
}

fn op(num_wallets: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..num_wallets, amount()).prop_map(|(wallet, amount)| Op::Credit { wallet, amount }),
        (0..num_wallets, amount()).prop_map(|(wallet, amount)| Op::Debit { wallet, amount }),
        (0..num_wallets, 0..num_wallets, amount())
            .prop_map(|(from, to, amount)| Op::Transfer { from, to, amount }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any committed sequence of operations, every balance stays
    /// non-negative and the total equals external credits minus debits.
    #[test]
    fn prop_conservation_and_non_negativity(
        ops in proptest::collection::vec(op(4), 1..60),
    ) {
        let mut balances = [Decimal::ZERO; 4];
        let mut external_net = Decimal::ZERO;

        for op in ops {
            match op {
                Op::Credit { wallet, amount } => {
                    if let Ok(next) = LedgerService::apply(
                        balances[wallet], amount, TransactionDirection::Credit,
                    ) {
                        balances[wallet] = next;
                        external_net += amount;
                    }
                }
                Op::Debit { wallet, amount } => {
                    if let Ok(next) = LedgerService::apply(
                        balances[wallet], amount, TransactionDirection::Debit,
                    ) {
                        balances[wallet] = next;
                        external_net -= amount;
                    }
                }
                Op::Transfer { from, to, amount } => {
                    if from == to {
                        continue;
                    }
                    // Both legs commit together or neither does.
                    if let Ok(debited) = LedgerService::apply(
                        balances[from], amount, TransactionDirection::Debit,
                    ) {
                        let credited = LedgerService::apply(
                            balances[to], amount, TransactionDirection::Credit,
                        ).expect("credit of a valid amount cannot fail");
                        balances[from] = debited;
                        balances[to] = credited;
                    }
                }
            }

            for balance in &balances {
                prop_assert!(*balance >= Decimal::ZERO);
            }
        }

        let total: Decimal = balances.iter().copied().sum();
        prop_assert_eq!(total, external_net);
    }

    /// A debit exceeding the balance is rejected and reports the shortfall.
    #[test]
    fn prop_overdraft_always_rejected(
        balance_cents in 0i64..100_000,
        excess_cents in 1i64..100_000,
    ) {
        let balance = Decimal::new(balance_cents, 2);
        let requested = balance + Decimal::new(excess_cents, 2);

        let result = LedgerService::apply(balance, requested, TransactionDirection::Debit);
        prop_assert!(result.is_err());
    }

    /// A transfer plan always carries equal debit and credit magnitudes.
    #[test]
    fn prop_transfer_plan_symmetry(amount in amount()) {
        let plan = LedgerService::plan_transfer(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "recipient@campus.edu",
            "sender@campus.edu",
            amount,
            None,
        ).expect("valid amounts produce a plan");

        prop_assert_eq!(plan.debit.amount, plan.credit.amount);
        prop_assert_eq!(plan.debit.direction, TransactionDirection::Debit);
        prop_assert_eq!(plan.credit.direction, TransactionDirection::Credit);
    }
}

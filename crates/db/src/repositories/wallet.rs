//! Wallet repository for balance mutations and statements.
//!
//! Every mutation (credit, debit, transfer) runs inside a database
//! transaction. The wallet rows being mutated are locked with
//! `SELECT ... FOR UPDATE` before the balance is read, so two concurrent
//! debits against the same wallet serialize and the second one sees the
//! balance left by the first. Transfers lock both wallets in ascending
//! wallet-id order to avoid lock-order deadlocks.
//!
//! Idempotency keys are checked and recorded inside the same transaction:
//! a replayed key returns the previously recorded entry without applying
//! the mutation again, and two racing requests with the same key resolve
//! via the primary-key constraint on `idempotency_keys`.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use paisa_core::ledger::{LedgerError, LedgerService, Posting, TransactionDirection};

use crate::entities::{
    idempotency_keys, users, wallet_transactions, wallets,
    sea_orm_active_enums,
};
use crate::repositories::user::is_unique_violation;

/// Error types for wallet operations.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// No wallet exists for the given user.
    #[error("Wallet not found for user: {0}")]
    WalletNotFound(Uuid),

    /// Transfer recipient not found by email.
    #[error("Recipient not found: {0}")]
    RecipientNotFound(String),

    /// Ledger rule violation (invalid amount, insufficient funds, ...).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Idempotency key already used by a different or in-flight request.
    #[error("Duplicate request for idempotency key")]
    DuplicateRequest,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Result of a credit or debit.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// Wallet after the mutation.
    pub wallet: wallets::Model,
    /// Ledger entry recording the mutation.
    pub entry: wallet_transactions::Model,
    /// True if this was an idempotent replay and nothing was applied.
    pub replayed: bool,
}

/// Result of a transfer between two users.
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    /// Sender wallet after the transfer.
    pub sender_wallet: wallets::Model,
    /// Recipient wallet after the transfer.
    pub recipient_wallet: wallets::Model,
    /// Debit entry on the sender's wallet.
    pub debit: wallet_transactions::Model,
    /// True if this was an idempotent replay and nothing was applied.
    pub replayed: bool,
}

/// A wallet together with its transaction history, newest first.
#[derive(Debug, Clone)]
pub struct WalletStatement {
    /// The wallet.
    pub wallet: wallets::Model,
    /// Ledger entries, ordered by creation time descending.
    pub entries: Vec<wallet_transactions::Model>,
}

/// Wallet repository for ledger operations.
#[derive(Debug, Clone)]
pub struct WalletRepository {
    db: DatabaseConnection,
}

impl WalletRepository {
    /// Creates a new wallet repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the wallet and full transaction history for a user.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::WalletNotFound`] if the user has no wallet.
    pub async fn statement(&self, user_id: Uuid) -> Result<WalletStatement, WalletError> {
        let wallet = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?
            .ok_or(WalletError::WalletNotFound(user_id))?;

        let entries = wallet_transactions::Entity::find()
            .filter(wallet_transactions::Column::WalletId.eq(wallet.id))
            .order_by_desc(wallet_transactions::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(WalletStatement { wallet, entries })
    }

    /// Credits a user's wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is invalid, the wallet does not exist,
    /// or the idempotency key conflicts.
    pub async fn credit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        description: &str,
        idempotency_key: Option<&str>,
    ) -> Result<MutationOutcome, WalletError> {
        self.mutate(
            user_id,
            amount,
            TransactionDirection::Credit,
            description,
            idempotency_key,
        )
        .await
    }

    /// Debits a user's wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is invalid, the balance is
    /// insufficient, the wallet does not exist, or the idempotency key
    /// conflicts.
    pub async fn debit(
        &self,
        user_id: Uuid,
        amount: Decimal,
        description: &str,
        idempotency_key: Option<&str>,
    ) -> Result<MutationOutcome, WalletError> {
        self.mutate(
            user_id,
            amount,
            TransactionDirection::Debit,
            description,
            idempotency_key,
        )
        .await
    }

    /// Applies a single-wallet mutation with the wallet row locked.
    async fn mutate(
        &self,
        user_id: Uuid,
        amount: Decimal,
        direction: TransactionDirection,
        description: &str,
        idempotency_key: Option<&str>,
    ) -> Result<MutationOutcome, WalletError> {
        let amount = LedgerService::validate_amount(amount)?;
        let operation = direction.as_str();

        let txn = self.db.begin().await?;

        if let Some(key) = idempotency_key {
            if let Some(stored) = self.find_replay(&txn, key, user_id, operation).await? {
                txn.commit().await?;
                return Ok(stored);
            }
        }

        // Lock the wallet row; the balance read below sees committed state
        // left by any concurrent mutation that held the lock before us.
        let wallet = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(WalletError::WalletNotFound(user_id))?;

        let new_balance = LedgerService::apply(wallet.balance, amount, direction)?;
        let now = Utc::now().into();

        let entry = wallet_transactions::ActiveModel {
            id: Set(Uuid::new_v4()),
            wallet_id: Set(wallet.id),
            amount: Set(amount),
            direction: Set(direction.into()),
            description: Set(description.to_owned()),
            created_at: Set(now),
        };
        let entry = entry.insert(&txn).await?;

        let mut active: wallets::ActiveModel = wallet.into();
        active.balance = Set(new_balance);
        active.updated_at = Set(now);
        let wallet = active.update(&txn).await?;

        if let Some(key) = idempotency_key {
            self.record_key(&txn, key, user_id, operation, entry.id)
                .await?;
        }

        txn.commit().await?;

        Ok(MutationOutcome {
            wallet,
            entry,
            replayed: false,
        })
    }

    /// Transfers funds from one user to another, resolved by email.
    ///
    /// Debits the sender, credits the recipient, and records one ledger
    /// entry per wallet, all in a single database transaction. Both wallet
    /// rows are locked in ascending wallet-id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is invalid, the recipient does not
    /// exist, the transfer is to the sender's own wallet, the sender's
    /// balance is insufficient, or the idempotency key conflicts.
    pub async fn transfer(
        &self,
        sender_user_id: Uuid,
        recipient_email: &str,
        amount: Decimal,
        description: Option<&str>,
        idempotency_key: Option<&str>,
    ) -> Result<TransferOutcome, WalletError> {
        let amount = LedgerService::validate_amount(amount)?;

        let txn = self.db.begin().await?;

        if let Some(key) = idempotency_key {
            if let Some(stored) = self
                .find_transfer_replay(&txn, key, sender_user_id, recipient_email)
                .await?
            {
                txn.commit().await?;
                return Ok(stored);
            }
        }

        let sender = users::Entity::find_by_id(sender_user_id)
            .one(&txn)
            .await?
            .ok_or(WalletError::WalletNotFound(sender_user_id))?;

        let recipient = users::Entity::find()
            .filter(users::Column::Email.eq(recipient_email.to_lowercase()))
            .one(&txn)
            .await?
            .ok_or_else(|| WalletError::RecipientNotFound(recipient_email.to_owned()))?;

        // One locked query for both rows, ordered by wallet id, so two
        // opposing transfers acquire the locks in the same order.
        let locked = wallets::Entity::find()
            .filter(wallets::Column::UserId.is_in([sender.id, recipient.id]))
            .order_by_asc(wallets::Column::Id)
            .lock_exclusive()
            .all(&txn)
            .await?;

        let sender_wallet = locked
            .iter()
            .find(|w| w.user_id == sender.id)
            .cloned()
            .ok_or(WalletError::WalletNotFound(sender.id))?;
        let recipient_wallet = locked
            .iter()
            .find(|w| w.user_id == recipient.id)
            .cloned()
            .ok_or(WalletError::WalletNotFound(recipient.id))?;

        let plan = LedgerService::plan_transfer(
            sender_wallet.id,
            recipient_wallet.id,
            &recipient.email,
            &sender.email,
            amount,
            description,
        )?;

        let new_sender_balance =
            LedgerService::apply(sender_wallet.balance, amount, TransactionDirection::Debit)?;
        let new_recipient_balance = LedgerService::apply(
            recipient_wallet.balance,
            amount,
            TransactionDirection::Credit,
        )?;

        let now = Utc::now().into();
        let debit = insert_posting(&txn, &plan.debit, now).await?;
        insert_posting(&txn, &plan.credit, now).await?;

        let sender_wallet = update_balance(&txn, sender_wallet, new_sender_balance, now).await?;
        let recipient_wallet =
            update_balance(&txn, recipient_wallet, new_recipient_balance, now).await?;

        if let Some(key) = idempotency_key {
            self.record_key(&txn, key, sender_user_id, "transfer", debit.id)
                .await?;
        }

        txn.commit().await?;

        Ok(TransferOutcome {
            sender_wallet,
            recipient_wallet,
            debit,
            replayed: false,
        })
    }

    /// Looks up a stored idempotency key for a credit or debit.
    ///
    /// Returns the previously recorded outcome if the key matches the same
    /// user and operation, and [`WalletError::DuplicateRequest`] if the key
    /// was used for something else.
    async fn find_replay(
        &self,
        txn: &DatabaseTransaction,
        key: &str,
        user_id: Uuid,
        operation: &str,
    ) -> Result<Option<MutationOutcome>, WalletError> {
        let Some(stored) = idempotency_keys::Entity::find_by_id(key).one(txn).await? else {
            return Ok(None);
        };

        if stored.user_id != user_id || stored.operation != operation {
            return Err(WalletError::DuplicateRequest);
        }

        let entry = wallet_transactions::Entity::find_by_id(stored.transaction_id)
            .one(txn)
            .await?
            .ok_or(WalletError::DuplicateRequest)?;

        let wallet = wallets::Entity::find_by_id(entry.wallet_id)
            .one(txn)
            .await?
            .ok_or(WalletError::WalletNotFound(user_id))?;

        Ok(Some(MutationOutcome {
            wallet,
            entry,
            replayed: true,
        }))
    }

    /// Looks up a stored idempotency key for a transfer.
    async fn find_transfer_replay(
        &self,
        txn: &DatabaseTransaction,
        key: &str,
        sender_user_id: Uuid,
        recipient_email: &str,
    ) -> Result<Option<TransferOutcome>, WalletError> {
        let Some(stored) = idempotency_keys::Entity::find_by_id(key).one(txn).await? else {
            return Ok(None);
        };

        if stored.user_id != sender_user_id || stored.operation != "transfer" {
            return Err(WalletError::DuplicateRequest);
        }

        let debit = wallet_transactions::Entity::find_by_id(stored.transaction_id)
            .one(txn)
            .await?
            .ok_or(WalletError::DuplicateRequest)?;

        let sender_wallet = wallets::Entity::find_by_id(debit.wallet_id)
            .one(txn)
            .await?
            .ok_or(WalletError::WalletNotFound(sender_user_id))?;

        let recipient = users::Entity::find()
            .filter(users::Column::Email.eq(recipient_email.to_lowercase()))
            .one(txn)
            .await?
            .ok_or_else(|| WalletError::RecipientNotFound(recipient_email.to_owned()))?;

        let recipient_wallet = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(recipient.id))
            .one(txn)
            .await?
            .ok_or(WalletError::WalletNotFound(recipient.id))?;

        Ok(Some(TransferOutcome {
            sender_wallet,
            recipient_wallet,
            debit,
            replayed: true,
        }))
    }

    /// Records an idempotency key for an applied mutation.
    ///
    /// A primary-key violation here means another request with the same key
    /// committed first; the caller's transaction rolls back and the client
    /// gets a conflict instead of a double-application.
    async fn record_key(
        &self,
        txn: &DatabaseTransaction,
        key: &str,
        user_id: Uuid,
        operation: &str,
        transaction_id: Uuid,
    ) -> Result<(), WalletError> {
        let row = idempotency_keys::ActiveModel {
            key: Set(key.to_owned()),
            user_id: Set(user_id),
            operation: Set(operation.to_owned()),
            transaction_id: Set(transaction_id),
            created_at: Set(Utc::now().into()),
        };

        row.insert(txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                WalletError::DuplicateRequest
            } else {
                WalletError::Database(e)
            }
        })?;

        Ok(())
    }
}

/// Inserts one ledger entry from a planned posting.
async fn insert_posting(
    txn: &DatabaseTransaction,
    posting: &Posting,
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Result<wallet_transactions::Model, WalletError> {
    let entry = wallet_transactions::ActiveModel {
        id: Set(Uuid::new_v4()),
        wallet_id: Set(posting.wallet_id),
        amount: Set(posting.amount),
        direction: Set(sea_orm_active_enums::TransactionDirection::from(
            posting.direction,
        )),
        description: Set(posting.description.clone()),
        created_at: Set(now),
    };

    Ok(entry.insert(txn).await?)
}

/// Writes a new balance to a locked wallet row.
async fn update_balance(
    txn: &DatabaseTransaction,
    wallet: wallets::Model,
    balance: Decimal,
    now: chrono::DateTime<chrono::FixedOffset>,
) -> Result<wallets::Model, WalletError> {
    let mut active: wallets::ActiveModel = wallet.into();
    active.balance = Set(balance);
    active.updated_at = Set(now);

    Ok(active.update(txn).await?)
}

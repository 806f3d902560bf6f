//! User repository for account creation and lookup.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{users, wallets};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// User not found by id.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Email address is already registered.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// User repository for account operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a user together with their zero-balance wallet.
    ///
    /// Both rows are inserted in one database transaction: a user without a
    /// wallet never becomes visible.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::EmailTaken`] if the email is already registered,
    /// or [`UserError::Database`] on other database failures.
    pub async fn create_user(
        &self,
        email: &str,
        full_name: &str,
    ) -> Result<(users::Model, wallets::Model), UserError> {
        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_lowercase()),
            full_name: Set(full_name.to_owned()),
            created_at: Set(now),
        };
        let user = user.insert(&txn).await.map_err(|e| {
            if is_unique_violation(&e) {
                UserError::EmailTaken(email.to_lowercase())
            } else {
                UserError::Database(e)
            }
        })?;

        let wallet = wallets::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user.id),
            balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let wallet = wallet.insert(&txn).await?;

        txn.commit().await?;

        Ok((user, wallet))
    }

    /// Finds a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if no user exists with the given id.
    pub async fn find_by_id(&self, user_id: Uuid) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }

    /// Finds a user by email, if one exists.
    ///
    /// The lookup is case-insensitive: emails are stored lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::Database`] if the query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, UserError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await?;

        Ok(user)
    }
}

/// Returns true if the error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Credential store backed by the `users` table
use crate::{
    account::NewAccount,
    db::{self, models::AccountRecord},
    error::{AppError, AppResult},
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, name, paternal_surname, maternal_surname, \
     active, created_at, created_by, updated_at, updated_by";

/// Lookup and insert operations the authenticator needs
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find the account with this login identifier
    async fn find_by_login(&self, email: &str) -> AppResult<Option<AccountRecord>>;

    /// Insert a new account. A taken login identifier is a `Conflict`.
    async fn insert(&self, account: NewAccount) -> AppResult<AccountRecord>;
}

/// Fields changed by an account update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub paternal_surname: Option<String>,
    pub maternal_surname: Option<String>,
    pub active: Option<bool>,
}

/// SQLite account store
pub struct SqliteAccountStore {
    db: SqlitePool,
}

impl SqliteAccountStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// List all accounts
    pub async fn list(&self) -> AppResult<Vec<AccountRecord>> {
        let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY id", ACCOUNT_COLUMNS))
            .fetch_all(&self.db)
            .await?;

        rows.iter().map(AccountRecord::from_row).collect()
    }

    /// Get account by id
    pub async fn get(&self, id: i64) -> AppResult<AccountRecord> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", ACCOUNT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found(format!("user {} not found", id)))?;

        AccountRecord::from_row(&row)
    }

    /// Apply a partial update, stamping the acting account
    pub async fn update(
        &self,
        id: i64,
        changes: AccountChanges,
        updated_by: i64,
    ) -> AppResult<AccountRecord> {
        let now = db::format_timestamp(Utc::now());

        let result = sqlx::query(
            r#"
            UPDATE users SET
                name = COALESCE(?, name),
                password_hash = COALESCE(?, password_hash),
                paternal_surname = COALESCE(?, paternal_surname),
                maternal_surname = COALESCE(?, maternal_surname),
                active = COALESCE(?, active),
                updated_at = ?,
                updated_by = ?
            WHERE id = ?
            "#,
        )
        .bind(changes.name)
        .bind(changes.password_hash)
        .bind(changes.paternal_surname)
        .bind(changes.maternal_surname)
        .bind(changes.active)
        .bind(&now)
        .bind(updated_by)
        .bind(id)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("user {} not found", id)));
        }

        tracing::info!(account_id = id, updated_by, "Account updated");
        self.get(id).await
    }

    /// Delete account by id
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("user {} not found", id)));
        }

        tracing::info!(account_id = id, "Account deleted");
        Ok(())
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn find_by_login(&self, email: &str) -> AppResult<Option<AccountRecord>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", ACCOUNT_COLUMNS))
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        row.as_ref().map(AccountRecord::from_row).transpose()
    }

    async fn insert(&self, account: NewAccount) -> AppResult<AccountRecord> {
        let now = db::format_timestamp(Utc::now());

        let result = sqlx::query(
            r#"
            INSERT INTO users (
                email, password_hash, name, paternal_surname, maternal_surname,
                active, created_at, created_by, updated_at, updated_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(&account.paternal_surname)
        .bind(&account.maternal_surname)
        .bind(account.active)
        .bind(&now)
        .bind(account.created_by)
        .bind(&now)
        .bind(account.created_by)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;

        let id = result.last_insert_rowid();
        tracing::info!(account_id = id, "Account created");

        self.get(id).await
    }
}

fn map_write_error(err: sqlx::Error) -> AppError {
    if db::is_unique_violation(&err) {
        AppError::Conflict("account already exists".to_string())
    } else if db::is_foreign_key_violation(&err) {
        AppError::validation("acting account does not exist")
    } else {
        AppError::Database(err)
    }
}

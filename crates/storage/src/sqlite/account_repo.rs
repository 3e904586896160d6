use exam_core::model::{Account, Email};

use super::SqliteRepository;
use super::mapping::{account_id_from_i64, map_account_row};
use crate::repository::{AccountRecord, AccountRepository, NewAccountRecord, StorageError};

#[async_trait::async_trait]
impl AccountRepository for SqliteRepository {
    async fn find_account(&self, email: &Email) -> Result<Option<AccountRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, email, role, password_hash, created_at
            FROM accounts
            WHERE email = ?1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_account_row).transpose()
    }

    async fn insert_account(&self, account: NewAccountRecord) -> Result<Account, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO accounts (email, role, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(account.email.as_str())
        .bind(account.role.as_str())
        .bind(&account.password_hash)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                StorageError::Conflict
            } else {
                StorageError::Connection(e.to_string())
            }
        })?;

        Ok(Account::new(
            account_id_from_i64(res.last_insert_rowid())?,
            account.email,
            account.role,
            account.created_at,
        ))
    }
}

//! Ledger store: checkout transactions and fines
//!
//! Append-mostly. Transactions are inserted by checkout and closed by return;
//! fines are inserted once at return time and never recomputed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{Fine, Transaction},
    repository::PgTx,
};

#[derive(Clone)]
pub struct LedgerRepository {
    pool: Pool<Postgres>,
}

impl LedgerRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a transaction by ID
    pub async fn get_transaction(&self, id: i32) -> AppResult<Transaction> {
        sqlx::query_as::<_, Transaction>(
            "SELECT id, user_id, copy_id, checkout_date, due_date, return_date, status
             FROM transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Transaction with id {} not found", id)))
    }

    /// Insert a new ACTIVE transaction inside an open atomic unit
    pub async fn create_transaction(
        &self,
        tx: &mut PgTx<'_>,
        user_id: i32,
        copy_id: i32,
        checkout_date: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> AppResult<Transaction> {
        let txn = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, copy_id, checkout_date, due_date, status)
            VALUES ($1, $2, $3, $4, 'ACTIVE')
            RETURNING id, user_id, copy_id, checkout_date, due_date, return_date, status
            "#,
        )
        .bind(user_id)
        .bind(copy_id)
        .bind(checkout_date)
        .bind(due_date)
        .fetch_one(&mut **tx)
        .await?;
        Ok(txn)
    }

    /// Find the open transaction for a copy, locking it for the rest of the
    /// atomic unit. If the one-active-per-copy invariant were ever violated,
    /// the most recently opened transaction wins.
    pub async fn find_active_by_copy_for_update(
        &self,
        tx: &mut PgTx<'_>,
        copy_id: i32,
    ) -> AppResult<Option<Transaction>> {
        let txn = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, user_id, copy_id, checkout_date, due_date, return_date, status
            FROM transactions
            WHERE copy_id = $1 AND status = 'ACTIVE'
            ORDER BY checkout_date DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(copy_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(txn)
    }

    /// Close an ACTIVE transaction with the given return date
    pub async fn close_transaction(
        &self,
        tx: &mut PgTx<'_>,
        transaction_id: i32,
        return_date: DateTime<Utc>,
    ) -> AppResult<Transaction> {
        let txn = sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions
            SET return_date = $1, status = 'RETURNED'
            WHERE id = $2
            RETURNING id, user_id, copy_id, checkout_date, due_date, return_date, status
            "#,
        )
        .bind(return_date)
        .bind(transaction_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(txn)
    }

    /// Insert a fine for a late return inside the same atomic unit
    pub async fn create_fine(
        &self,
        tx: &mut PgTx<'_>,
        transaction_id: i32,
        user_id: i32,
        amount: Decimal,
    ) -> AppResult<Fine> {
        let fine = sqlx::query_as::<_, Fine>(
            r#"
            INSERT INTO fines (transaction_id, user_id, amount)
            VALUES ($1, $2, $3)
            RETURNING id, transaction_id, user_id, amount, paid, created_at
            "#,
        )
        .bind(transaction_id)
        .bind(user_id)
        .bind(amount)
        .fetch_one(&mut **tx)
        .await?;
        Ok(fine)
    }

    /// Count active checkouts
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE status = 'ACTIVE'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count active checkouts past their due date
    pub async fn count_overdue(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transactions WHERE status = 'ACTIVE' AND due_date < NOW()",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}

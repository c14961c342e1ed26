//! Reporting and query service
//!
//! Read-only aggregations over the catalog, ledger, and request stores.
//! Never mutates; overdueness is derived from due dates at query time.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Row;

use crate::{
    api::reports::LibraryStats,
    error::AppResult,
    models::{fine::FineDetails, transaction::CheckoutDetails, user::MemberDashboard},
    repository::Repository,
};

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
}

impl ReportsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Library-wide counters for the librarian dashboard
    pub async fn library_stats(&self) -> AppResult<LibraryStats> {
        let total_books = self.repository.catalog.count_books().await?;
        let total_copies = self.repository.catalog.count_copies().await?;
        let available_copies = self.repository.catalog.count_available().await?;
        let active_checkouts = self.repository.ledger.count_active().await?;
        let overdue_checkouts = self.repository.ledger.count_overdue().await?;

        let total_members: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'MEMBER'")
                .fetch_one(&self.repository.pool)
                .await?;

        Ok(LibraryStats {
            total_books,
            total_copies,
            available_copies,
            active_checkouts,
            total_members,
            overdue_checkouts,
        })
    }

    /// All active checkouts with borrower and title details, soonest due
    /// first
    pub async fn active_checkouts(&self) -> AppResult<Vec<CheckoutDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.user_id, t.copy_id, t.checkout_date, t.due_date,
                   t.return_date, t.status,
                   u.email, u.first_name, u.last_name,
                   b.title, b.author, c.barcode
            FROM transactions t
            JOIN users u ON t.user_id = u.id
            JOIN book_copies c ON t.copy_id = c.id
            JOIN books b ON c.book_id = b.id
            WHERE t.status = 'ACTIVE'
            ORDER BY t.due_date ASC
            "#,
        )
        .fetch_all(&self.repository.pool)
        .await?;

        Ok(rows.into_iter().map(Self::checkout_row).collect())
    }

    /// A member's currently borrowed copies, most recent first
    pub async fn member_checkouts(&self, user_id: i32) -> AppResult<Vec<CheckoutDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.user_id, t.copy_id, t.checkout_date, t.due_date,
                   t.return_date, t.status,
                   u.email, u.first_name, u.last_name,
                   b.title, b.author, c.barcode
            FROM transactions t
            JOIN users u ON t.user_id = u.id
            JOIN book_copies c ON t.copy_id = c.id
            JOIN books b ON c.book_id = b.id
            WHERE t.user_id = $1 AND t.status = 'ACTIVE'
            ORDER BY t.checkout_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.repository.pool)
        .await?;

        Ok(rows.into_iter().map(Self::checkout_row).collect())
    }

    /// A member's checkout history, most recent first, capped at 50 entries
    pub async fn member_history(&self, user_id: i32) -> AppResult<Vec<CheckoutDetails>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.user_id, t.copy_id, t.checkout_date, t.due_date,
                   t.return_date, t.status,
                   u.email, u.first_name, u.last_name,
                   b.title, b.author, c.barcode
            FROM transactions t
            JOIN users u ON t.user_id = u.id
            JOIN book_copies c ON t.copy_id = c.id
            JOIN books b ON c.book_id = b.id
            WHERE t.user_id = $1
            ORDER BY t.checkout_date DESC
            LIMIT 50
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.repository.pool)
        .await?;

        Ok(rows.into_iter().map(Self::checkout_row).collect())
    }

    /// A member's fines with the titles they were incurred on, plus the
    /// unpaid total
    pub async fn member_fines(&self, user_id: i32) -> AppResult<(Vec<FineDetails>, Decimal)> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.transaction_id, f.amount, f.paid, f.created_at,
                   b.title, b.author
            FROM fines f
            JOIN transactions t ON f.transaction_id = t.id
            JOIN book_copies c ON t.copy_id = c.id
            JOIN books b ON c.book_id = b.id
            WHERE f.user_id = $1
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.repository.pool)
        .await?;

        let fines: Vec<FineDetails> = rows
            .into_iter()
            .map(|row| FineDetails {
                id: row.get("id"),
                transaction_id: row.get("transaction_id"),
                amount: row.get("amount"),
                paid: row.get("paid"),
                created_at: row.get("created_at"),
                title: row.get("title"),
                author: row.get("author"),
            })
            .collect();

        let total_unpaid = fines
            .iter()
            .filter(|f| !f.paid)
            .map(|f| f.amount)
            .sum::<Decimal>();

        Ok((fines, total_unpaid))
    }

    /// Per-member dashboard counters
    pub async fn member_dashboard(&self, user_id: i32) -> AppResult<MemberDashboard> {
        let active_books: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transactions WHERE user_id = $1 AND status = 'ACTIVE'",
        )
        .bind(user_id)
        .fetch_one(&self.repository.pool)
        .await?;

        let overdue_books: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM transactions
             WHERE user_id = $1 AND status = 'ACTIVE' AND due_date < NOW()",
        )
        .bind(user_id)
        .fetch_one(&self.repository.pool)
        .await?;

        let total_fines: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM fines WHERE user_id = $1 AND paid = false",
        )
        .bind(user_id)
        .fetch_one(&self.repository.pool)
        .await?;

        Ok(MemberDashboard {
            active_books,
            overdue_books,
            total_fines,
        })
    }

    fn checkout_row(row: sqlx::postgres::PgRow) -> CheckoutDetails {
        let now = Utc::now();
        let status: crate::models::TransactionStatus = row.get("status");
        let due_date: chrono::DateTime<Utc> = row.get("due_date");
        let first_name: String = row.get("first_name");
        let last_name: String = row.get("last_name");

        CheckoutDetails {
            id: row.get("id"),
            user_id: row.get("user_id"),
            copy_id: row.get("copy_id"),
            checkout_date: row.get("checkout_date"),
            due_date,
            return_date: row.get("return_date"),
            status,
            borrower_email: row.get("email"),
            borrower_name: format!("{} {}", first_name, last_name),
            title: row.get("title"),
            author: row.get("author"),
            barcode: row.get("barcode"),
            is_overdue: status == crate::models::TransactionStatus::Active && due_date < now,
        }
    }
}

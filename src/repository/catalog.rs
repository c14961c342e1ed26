//! Catalog store: book copies and their owning titles
//!
//! The circulation engine is the only writer of copy status; reads that
//! precede a status write go through the `*_for_update` methods so the row
//! stays locked for the rest of the atomic unit.

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, BookCopy, CopyStatus},
    repository::PgTx,
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: Pool<Postgres>,
}

impl CatalogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a book by ID (unlocked read)
    pub async fn get_book(&self, book_id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>("SELECT id, title, author, isbn FROM books WHERE id = $1")
            .bind(book_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    /// Get a copy by ID (unlocked read, for reporting)
    pub async fn get_copy(&self, copy_id: i32) -> AppResult<Option<BookCopy>> {
        let copy = sqlx::query_as::<_, BookCopy>(
            "SELECT id, book_id, barcode, location, status FROM book_copies WHERE id = $1",
        )
        .bind(copy_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(copy)
    }

    /// Fetch a copy and lock its row for the rest of the transaction
    pub async fn get_copy_for_update(
        &self,
        tx: &mut PgTx<'_>,
        copy_id: i32,
    ) -> AppResult<Option<BookCopy>> {
        let copy = sqlx::query_as::<_, BookCopy>(
            "SELECT id, book_id, barcode, location, status FROM book_copies WHERE id = $1 FOR UPDATE",
        )
        .bind(copy_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(copy)
    }

    /// Pick one AVAILABLE copy of a book and lock it.
    ///
    /// `SKIP LOCKED` steps over rows another transaction already holds, so
    /// concurrent approvals of the same title each claim a different copy
    /// instead of queueing on the lowest id. An empty result means every
    /// AVAILABLE copy is either gone or claimed by an in-flight approval;
    /// a race for the last copy still resolves to one winner.
    pub async fn find_available_copy_for_update(
        &self,
        tx: &mut PgTx<'_>,
        book_id: i32,
    ) -> AppResult<Option<BookCopy>> {
        let copy = sqlx::query_as::<_, BookCopy>(
            r#"
            SELECT id, book_id, barcode, location, status
            FROM book_copies
            WHERE book_id = $1 AND status = 'AVAILABLE'
            ORDER BY id
            LIMIT 1
            FOR UPDATE SKIP LOCKED
            "#,
        )
        .bind(book_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(copy)
    }

    /// Set the status of a copy inside an open transaction
    pub async fn set_copy_status(
        &self,
        tx: &mut PgTx<'_>,
        copy_id: i32,
        status: CopyStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE book_copies SET status = $1 WHERE id = $2")
            .bind(status)
            .bind(copy_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Count all registered copies
    pub async fn count_copies(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_copies")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Count copies currently available for checkout
    pub async fn count_available(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_copies WHERE status = 'AVAILABLE'")
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Count catalog titles
    pub async fn count_books(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

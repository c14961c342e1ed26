//! Request store: book request lifecycle rows

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::AppResult,
    models::{BookRequest, BookRequestDetails, RequestStatus},
    repository::PgTx,
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new PENDING request with no copy bound
    pub async fn create(&self, user_id: i32, book_id: i32) -> AppResult<BookRequest> {
        let request = sqlx::query_as::<_, BookRequest>(
            r#"
            INSERT INTO book_requests (user_id, book_id, status)
            VALUES ($1, $2, 'PENDING')
            RETURNING id, user_id, book_id, copy_id, status, created_at
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(request)
    }

    /// Fetch a request and lock its row for the rest of the transaction
    pub async fn get_for_update(
        &self,
        tx: &mut PgTx<'_>,
        request_id: i32,
    ) -> AppResult<Option<BookRequest>> {
        let request = sqlx::query_as::<_, BookRequest>(
            "SELECT id, user_id, book_id, copy_id, status, created_at
             FROM book_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(request_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(request)
    }

    /// Resolve a request to a terminal status inside an open transaction
    pub async fn set_status(
        &self,
        tx: &mut PgTx<'_>,
        request_id: i32,
        status: RequestStatus,
    ) -> AppResult<BookRequest> {
        let request = sqlx::query_as::<_, BookRequest>(
            r#"
            UPDATE book_requests SET status = $1 WHERE id = $2
            RETURNING id, user_id, book_id, copy_id, status, created_at
            "#,
        )
        .bind(status)
        .bind(request_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(request)
    }

    /// Approve a request, binding it to the copy checked out to satisfy it
    pub async fn mark_approved(
        &self,
        tx: &mut PgTx<'_>,
        request_id: i32,
        copy_id: i32,
    ) -> AppResult<BookRequest> {
        let request = sqlx::query_as::<_, BookRequest>(
            r#"
            UPDATE book_requests SET status = 'APPROVED', copy_id = $1 WHERE id = $2
            RETURNING id, user_id, book_id, copy_id, status, created_at
            "#,
        )
        .bind(copy_id)
        .bind(request_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(request)
    }

    /// Joined request queue for librarians, newest first; `search` narrows by
    /// title or requester email
    pub async fn list(&self, limit: i64, search: Option<&str>) -> AppResult<Vec<BookRequestDetails>> {
        let pattern = search.map(|q| format!("%{}%", q));
        let rows = sqlx::query(
            r#"
            SELECT r.id, r.user_id, r.book_id, r.copy_id, r.status, r.created_at,
                   u.email, u.first_name, u.last_name, b.title, b.author
            FROM book_requests r
            JOIN users u ON r.user_id = u.id
            JOIN books b ON r.book_id = b.id
            WHERE $2::text IS NULL OR b.title ILIKE $2 OR u.email ILIKE $2
            ORDER BY r.created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        let requests = rows
            .into_iter()
            .map(|row| {
                let first_name: String = row.get("first_name");
                let last_name: String = row.get("last_name");
                BookRequestDetails {
                    id: row.get("id"),
                    user_id: row.get("user_id"),
                    book_id: row.get("book_id"),
                    copy_id: row.get("copy_id"),
                    status: row.get("status"),
                    created_at: row.get("created_at"),
                    requester_email: row.get("email"),
                    requester_name: format!("{} {}", first_name, last_name),
                    title: row.get("title"),
                    author: row.get("author"),
                }
            })
            .collect();

        Ok(requests)
    }
}

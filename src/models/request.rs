//! Book request model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::enums::RequestStatus;

/// A member's expressed desire to borrow a title (not a specific copy).
///
/// `copy_id` stays null until approval binds the request to the copy that was
/// checked out to satisfy it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookRequest {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub copy_id: Option<i32>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

/// Request with joined requester and title details, for the librarian queue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookRequestDetails {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub copy_id: Option<i32>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub requester_email: String,
    pub requester_name: String,
    pub title: String,
    pub author: String,
}

/// Create request payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookRequest {
    /// Desired book (title), not a specific copy
    #[validate(range(min = 1, message = "book_id is required"))]
    pub book_id: i32,
}

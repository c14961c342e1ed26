//! User model
//!
//! Account management and authentication are external collaborators; the
//! circulation core only needs the projection it joins into reporting rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::Role;

/// Library user record (reporting projection)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Per-member dashboard numbers
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MemberDashboard {
    /// Currently borrowed copies
    pub active_books: i64,
    /// Active checkouts past their due date
    pub overdue_books: i64,
    /// Sum of unpaid fines
    #[schema(value_type = f64)]
    pub total_fines: rust_decimal::Decimal,
}

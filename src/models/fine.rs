//! Fine (overdue penalty) model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Monetary penalty created once at return time when a copy comes back late.
///
/// `amount` is immutable after creation; `paid` is a flag consumed by an
/// external payment collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Fine {
    pub id: i32,
    pub transaction_id: i32,
    pub user_id: i32,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

/// Fine with the joined title it was incurred on, for member views
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FineDetails {
    pub id: i32,
    pub transaction_id: i32,
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub title: String,
    pub author: String,
}

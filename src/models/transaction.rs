//! Checkout transaction model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::TransactionStatus;

/// Checkout record from the ledger.
///
/// At most one ACTIVE transaction exists per copy; rows are never deleted,
/// a return closes them with `returned_date` and `Returned` status.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transaction {
    pub id: i32,
    pub user_id: i32,
    pub copy_id: i32,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
}

/// Active checkout with joined borrower and title details, for display
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutDetails {
    pub id: i32,
    pub user_id: i32,
    pub copy_id: i32,
    pub checkout_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub return_date: Option<DateTime<Utc>>,
    pub status: TransactionStatus,
    pub borrower_email: String,
    pub borrower_name: String,
    pub title: String,
    pub author: String,
    pub barcode: String,
    pub is_overdue: bool,
}

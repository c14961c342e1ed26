//! Book copy (physical instance) model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::enums::CopyStatus;

/// A physical, barcoded instance of a book.
///
/// `status == CheckedOut` iff an ACTIVE transaction references this copy;
/// the circulation engine is the only writer of `Available`/`CheckedOut`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    pub id: i32,
    pub book_id: i32,
    pub barcode: String,
    pub location: Option<String>,
    pub status: CopyStatus,
}

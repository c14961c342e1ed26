//! Book (catalog title) model
//!
//! Catalog CRUD and search live outside this server; books appear here only
//! as the owning title of copies and requests, and in joined reporting rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book catalog record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
}

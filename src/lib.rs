//! Library Circulation Management Server
//!
//! Tracks the lifecycle of physical book copies: checkouts, returns, overdue
//! fines, and the member request queue that librarians resolve into
//! checkouts. Catalog management and authentication live in external
//! services; this server owns the circulation ledger.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: sqlx::PgPool,
    pub services: Arc<services::Services>,
}

//! Repository layer for database operations
//!
//! Each store owns its tables: the catalog store owns book copies, the ledger
//! store owns transactions and fines, the request store owns book requests.
//! Methods named `*_for_update` take the caller's open transaction and lock
//! the row with `SELECT ... FOR UPDATE`; every mutation of a contended row
//! goes through one of them so callers share a single serialization
//! discipline instead of hand-rolling lock acquisition.

pub mod catalog;
pub mod ledger;
pub mod requests;

use sqlx::{Pool, Postgres};

/// An open database transaction, the unit of atomicity for every circulation
/// operation
pub type PgTx<'a> = sqlx::Transaction<'a, Postgres>;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub catalog: catalog::CatalogRepository,
    pub ledger: ledger::LedgerRepository,
    pub requests: requests::RequestsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            catalog: catalog::CatalogRepository::new(pool.clone()),
            ledger: ledger::LedgerRepository::new(pool.clone()),
            requests: requests::RequestsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin an atomic unit of work
    pub async fn begin(&self) -> Result<PgTx<'static>, sqlx::Error> {
        self.pool.begin().await
    }
}

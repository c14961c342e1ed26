//! Circulation engine: the copy lifecycle state machine
//!
//! Checkout and return each run as one atomic unit: lock the targeted copy
//! row, validate its state, mutate the catalog and the ledger, commit. If any
//! step fails the whole unit rolls back, so no partial state (a checked-out
//! copy without an open transaction, or the reverse) is ever observable.

use chrono::{Duration, Utc};

use crate::{
    config::CirculationConfig,
    error::{AppError, AppResult},
    models::{CopyStatus, Fine, Transaction},
    repository::{PgTx, Repository},
    services::fines,
};

/// Result of returning a copy: the closed transaction and the fine, if the
/// return was late
#[derive(Debug)]
pub struct ReturnOutcome {
    pub transaction: Transaction,
    pub fine: Option<Fine>,
}

#[derive(Clone)]
pub struct CirculationEngine {
    repository: Repository,
    config: CirculationConfig,
}

impl CirculationEngine {
    pub fn new(repository: Repository, config: CirculationConfig) -> Self {
        Self { repository, config }
    }

    /// Check a copy out to a user.
    ///
    /// Fails `NotFound` if the copy does not exist and `InvalidState` if it is
    /// not AVAILABLE; on success the copy is CHECKED_OUT and a new ACTIVE
    /// transaction with the configured loan period is returned.
    pub async fn checkout(&self, user_id: i32, copy_id: i32) -> AppResult<Transaction> {
        let mut tx = self.repository.begin().await?;
        let transaction = self.checkout_in_tx(&mut tx, user_id, copy_id).await?;
        tx.commit().await?;

        tracing::info!(
            user_id,
            copy_id,
            transaction_id = transaction.id,
            due_date = %transaction.due_date,
            "copy checked out"
        );
        Ok(transaction)
    }

    /// Checkout body, running inside the caller's open transaction.
    ///
    /// This is the single implementation of the checkout state transition;
    /// the request-approval workflow shares it so approval and direct
    /// checkout cannot drift apart. The copy row is locked here even if the
    /// caller already holds the lock (re-locking within one transaction is a
    /// no-op).
    pub(crate) async fn checkout_in_tx(
        &self,
        tx: &mut PgTx<'_>,
        user_id: i32,
        copy_id: i32,
    ) -> AppResult<Transaction> {
        let copy = self
            .repository
            .catalog
            .get_copy_for_update(tx, copy_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book item not found".to_string()))?;

        if copy.status != CopyStatus::Available {
            return Err(AppError::InvalidState(
                "Book is not available for checkout".to_string(),
            ));
        }

        self.repository
            .catalog
            .set_copy_status(tx, copy_id, CopyStatus::CheckedOut)
            .await?;

        let now = Utc::now();
        let due_date = now + Duration::days(self.config.loan_period_days);

        self.repository
            .ledger
            .create_transaction(tx, user_id, copy_id, now, due_date)
            .await
    }

    /// Return a checked-out copy.
    ///
    /// Locates the open transaction for the copy (failing `NotFound` if there
    /// is none), closes it, puts the copy back to AVAILABLE, and creates a
    /// fine when the return is past the due date. One atomic unit.
    pub async fn return_copy(&self, copy_id: i32) -> AppResult<ReturnOutcome> {
        let mut tx = self.repository.begin().await?;

        // Lock the copy row first; checkout and approval take the same lock
        // first, which keeps the lock order canonical across operations. A
        // missing copy falls through to the active-transaction lookup below.
        let _ = self
            .repository
            .catalog
            .get_copy_for_update(&mut tx, copy_id)
            .await?;

        let active = self
            .repository
            .ledger
            .find_active_by_copy_for_update(&mut tx, copy_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("No active checkout found for this book".to_string())
            })?;

        let return_date = Utc::now();
        let transaction = self
            .repository
            .ledger
            .close_transaction(&mut tx, active.id, return_date)
            .await?;

        self.repository
            .catalog
            .set_copy_status(&mut tx, copy_id, CopyStatus::Available)
            .await?;

        let amount = fines::compute_fine(active.due_date, return_date, self.config.fine_per_day);
        let fine = if amount > rust_decimal::Decimal::ZERO {
            let fine = self
                .repository
                .ledger
                .create_fine(&mut tx, active.id, active.user_id, amount)
                .await?;
            Some(fine)
        } else {
            None
        };

        tx.commit().await?;

        match &fine {
            Some(f) => tracing::info!(
                copy_id,
                transaction_id = transaction.id,
                amount = %f.amount,
                "copy returned late, fine created"
            ),
            None => tracing::info!(copy_id, transaction_id = transaction.id, "copy returned"),
        }

        Ok(ReturnOutcome { transaction, fine })
    }
}

//! Request fulfillment workflow
//!
//! Owns the BookRequest lifecycle (PENDING -> APPROVED | DENIED | CANCELLED).
//! Approval is the one place this workflow and the circulation engine share a
//! transactional boundary: selecting a copy, checking it out, and binding it
//! to the request happen in a single atomic unit, so a request can never end
//! up APPROVED without a copy and an open transaction behind it.

use crate::{
    error::{AppError, AppResult},
    models::{BookRequest, BookRequestDetails, RequestDecision, RequestStatus, Transaction},
    repository::Repository,
    services::circulation::CirculationEngine,
};

/// Result of deciding a request; approval also carries the transaction it
/// created
#[derive(Debug)]
pub struct DecisionOutcome {
    pub request: BookRequest,
    pub transaction: Option<Transaction>,
}

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
    engine: CirculationEngine,
}

impl RequestsService {
    pub fn new(repository: Repository, engine: CirculationEngine) -> Self {
        Self { repository, engine }
    }

    /// Record a member's request for a title.
    ///
    /// No availability check happens here: the request represents a want, not
    /// a reservation, and may be created while no copy is available.
    pub async fn create_request(&self, user_id: i32, book_id: i32) -> AppResult<BookRequest> {
        self.repository
            .catalog
            .get_book(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let request = self.repository.requests.create(user_id, book_id).await?;
        tracing::info!(request_id = request.id, user_id, book_id, "request created");
        Ok(request)
    }

    /// Resolve a pending request.
    ///
    /// DENIED and CANCELLED just move the request to its terminal status.
    /// APPROVED additionally finds an available copy of the requested title
    /// and checks it out to the requester through the engine's shared
    /// checkout path, all within one atomic unit; if no copy is available the
    /// whole unit rolls back and the request stays PENDING.
    pub async fn decide_request(
        &self,
        request_id: i32,
        decision: RequestDecision,
    ) -> AppResult<DecisionOutcome> {
        match decision {
            RequestDecision::Approved => self.approve(request_id).await,
            RequestDecision::Denied | RequestDecision::Cancelled => {
                self.resolve(request_id, decision.target_status()).await
            }
        }
    }

    async fn approve(&self, request_id: i32) -> AppResult<DecisionOutcome> {
        let mut tx = self.repository.begin().await?;

        let request = self
            .repository
            .requests
            .get_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

        if request.status != RequestStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Request has already been resolved to {}",
                request.status
            )));
        }

        let copy = self
            .repository
            .catalog
            .find_available_copy_for_update(&mut tx, request.book_id)
            .await?
            .ok_or_else(|| {
                AppError::InsufficientAvailability(
                    "No available copies to fulfill the request".to_string(),
                )
            })?;

        let transaction = self
            .engine
            .checkout_in_tx(&mut tx, request.user_id, copy.id)
            .await?;

        let request = self
            .repository
            .requests
            .mark_approved(&mut tx, request_id, copy.id)
            .await?;

        tx.commit().await?;

        tracing::info!(
            request_id,
            copy_id = copy.id,
            transaction_id = transaction.id,
            "request approved and fulfilled"
        );

        Ok(DecisionOutcome {
            request,
            transaction: Some(transaction),
        })
    }

    async fn resolve(&self, request_id: i32, status: RequestStatus) -> AppResult<DecisionOutcome> {
        let mut tx = self.repository.begin().await?;

        let request = self
            .repository
            .requests
            .get_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Request not found".to_string()))?;

        if request.status != RequestStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Request has already been resolved to {}",
                request.status
            )));
        }

        let request = self
            .repository
            .requests
            .set_status(&mut tx, request_id, status)
            .await?;

        tx.commit().await?;

        tracing::info!(request_id, status = %status, "request resolved");

        Ok(DecisionOutcome {
            request,
            transaction: None,
        })
    }

    /// Request queue for librarians, newest first, optionally filtered by
    /// title or requester email
    pub async fn list_requests(&self, search: Option<&str>) -> AppResult<Vec<BookRequestDetails>> {
        let search = search.map(str::trim).filter(|q| !q.is_empty());
        self.repository.requests.list(200, search).await
    }
}

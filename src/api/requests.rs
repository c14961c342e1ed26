//! Book request endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{BookRequest, BookRequestDetails, CreateBookRequest, RequestDecision, Transaction},
};

use super::Principal;

/// Create request response
#[derive(Serialize, ToSchema)]
pub struct RequestResponse {
    /// The request record
    pub request: BookRequest,
}

/// Decision payload; `PENDING` is not a valid decision and is rejected at
/// deserialization
#[derive(Deserialize, ToSchema)]
pub struct DecideRequest {
    /// Target status: APPROVED, DENIED or CANCELLED
    pub status: RequestDecision,
}

/// Decision response
#[derive(Serialize, ToSchema)]
pub struct DecisionResponse {
    /// The resolved request
    pub request: BookRequest,
    /// The transaction created by an approval, absent for deny/cancel
    pub transaction: Option<Transaction>,
}

/// Request list response
#[derive(Serialize, ToSchema)]
pub struct RequestListResponse {
    /// Requests, newest first
    pub requests: Vec<BookRequestDetails>,
}

/// Filters for the request queue
#[derive(Deserialize, IntoParams)]
pub struct ListRequestsQuery {
    /// Case-insensitive substring match on book title or requester email
    pub q: Option<String>,
}

/// Request a title for borrowing
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateBookRequest,
    responses(
        (status = 201, description = "Request created", body = RequestResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    principal: Principal,
    Json(request): Json<CreateBookRequest>,
) -> AppResult<(StatusCode, Json<RequestResponse>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let request = state
        .services
        .requests
        .create_request(principal.user_id, request.book_id)
        .await?;

    Ok((StatusCode::CREATED, Json(RequestResponse { request })))
}

/// List pending and resolved requests (librarian queue)
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(ListRequestsQuery),
    responses(
        (status = 200, description = "Request queue", body = RequestListResponse),
        (status = 403, description = "Librarian role required")
    )
)]
pub async fn list_requests(
    State(state): State<crate::AppState>,
    principal: Principal,
    Query(query): Query<ListRequestsQuery>,
) -> AppResult<Json<RequestListResponse>> {
    principal.require_librarian()?;

    let requests = state
        .services
        .requests
        .list_requests(query.q.as_deref())
        .await?;
    Ok(Json(RequestListResponse { requests }))
}

/// Decide a pending request.
///
/// Approval atomically selects an available copy, checks it out to the
/// requester, and binds the copy to the request; when no copy is available
/// the request stays PENDING and 422 is returned.
#[utoipa::path(
    put,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i32, Path, description = "Request ID")
    ),
    request_body = DecideRequest,
    responses(
        (status = 200, description = "Request resolved", body = DecisionResponse),
        (status = 400, description = "Invalid decision"),
        (status = 404, description = "Request not found"),
        (status = 409, description = "Request already resolved"),
        (status = 422, description = "No available copies to fulfill the request")
    )
)]
pub async fn decide_request(
    State(state): State<crate::AppState>,
    principal: Principal,
    Path(request_id): Path<i32>,
    Json(decision): Json<DecideRequest>,
) -> AppResult<Json<DecisionResponse>> {
    principal.require_librarian()?;

    let outcome = state
        .services
        .requests
        .decide_request(request_id, decision.status)
        .await?;

    Ok(Json(DecisionResponse {
        request: outcome.request,
        transaction: outcome.transaction,
    }))
}

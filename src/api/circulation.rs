//! Circulation endpoints: checkout and return

use axum::{extract::State, http::StatusCode, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::Transaction,
};

use super::Principal;

/// Checkout request
#[derive(Deserialize, Validate, ToSchema)]
pub struct CheckoutRequest {
    /// Borrower user ID
    #[validate(range(min = 1, message = "user_id is required"))]
    pub user_id: i32,
    /// Physical copy to check out
    #[validate(range(min = 1, message = "copy_id is required"))]
    pub copy_id: i32,
}

/// Checkout response
#[derive(Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Status message
    pub message: String,
    /// The created transaction
    pub transaction: Transaction,
}

/// Return request
#[derive(Deserialize, Validate, ToSchema)]
pub struct ReturnRequest {
    /// Physical copy being returned
    #[validate(range(min = 1, message = "copy_id is required"))]
    pub copy_id: i32,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Status message
    pub message: String,
    /// The closed transaction
    pub transaction: Transaction,
    /// Fine amount, present only when the return was late
    #[schema(value_type = Option<f64>)]
    pub fine: Option<Decimal>,
}

/// Check a copy out to a user
#[utoipa::path(
    post,
    path = "/circulation/checkout",
    tag = "circulation",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Copy checked out", body = CheckoutResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy not available for checkout")
    )
)]
pub async fn checkout(
    State(state): State<crate::AppState>,
    principal: Principal,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<CheckoutResponse>)> {
    principal.require_librarian()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let transaction = state
        .services
        .circulation
        .checkout(request.user_id, request.copy_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            message: "Book checked out successfully".to_string(),
            transaction,
        }),
    ))
}

/// Return a checked-out copy
#[utoipa::path(
    post,
    path = "/circulation/return",
    tag = "circulation",
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Copy returned", body = ReturnResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "No active checkout for this copy")
    )
)]
pub async fn return_copy(
    State(state): State<crate::AppState>,
    principal: Principal,
    Json(request): Json<ReturnRequest>,
) -> AppResult<Json<ReturnResponse>> {
    principal.require_librarian()?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let outcome = state
        .services
        .circulation
        .return_copy(request.copy_id)
        .await?;

    Ok(Json(ReturnResponse {
        message: "Book returned successfully".to_string(),
        transaction: outcome.transaction,
        fine: outcome.fine.map(|f| f.amount),
    }))
}

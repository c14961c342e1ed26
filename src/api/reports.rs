//! Reporting endpoints: statistics, checkout lists, member views

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{fine::FineDetails, transaction::CheckoutDetails, user::MemberDashboard},
};

use super::Principal;

/// Library-wide counters
#[derive(Serialize, ToSchema)]
pub struct LibraryStats {
    /// Catalog titles
    pub total_books: i64,
    /// Registered physical copies
    pub total_copies: i64,
    /// Copies currently available for checkout
    pub available_copies: i64,
    /// Open transactions
    pub active_checkouts: i64,
    /// Users with the MEMBER role
    pub total_members: i64,
    /// Active checkouts past their due date
    pub overdue_checkouts: i64,
}

/// Checkout list response
#[derive(Serialize, ToSchema)]
pub struct CheckoutListResponse {
    /// Checkouts with borrower and title details
    pub checkouts: Vec<CheckoutDetails>,
}

/// Member fines response
#[derive(Serialize, ToSchema)]
pub struct FineListResponse {
    /// Fines, newest first
    pub fines: Vec<FineDetails>,
    /// Sum of unpaid fine amounts
    #[schema(value_type = f64)]
    pub total_unpaid: Decimal,
}

/// Library statistics (librarian dashboard)
#[utoipa::path(
    get,
    path = "/stats",
    tag = "reports",
    responses(
        (status = 200, description = "Library statistics", body = LibraryStats),
        (status = 403, description = "Librarian role required")
    )
)]
pub async fn library_stats(
    State(state): State<crate::AppState>,
    principal: Principal,
) -> AppResult<Json<LibraryStats>> {
    principal.require_librarian()?;

    let stats = state.services.reports.library_stats().await?;
    Ok(Json(stats))
}

/// All active checkouts, soonest due first
#[utoipa::path(
    get,
    path = "/circulation/checkouts",
    tag = "reports",
    responses(
        (status = 200, description = "Active checkouts", body = CheckoutListResponse),
        (status = 403, description = "Librarian role required")
    )
)]
pub async fn active_checkouts(
    State(state): State<crate::AppState>,
    principal: Principal,
) -> AppResult<Json<CheckoutListResponse>> {
    principal.require_librarian()?;

    let checkouts = state.services.reports.active_checkouts().await?;
    Ok(Json(CheckoutListResponse { checkouts }))
}

/// The calling member's currently borrowed copies
#[utoipa::path(
    get,
    path = "/me/books",
    tag = "reports",
    responses(
        (status = 200, description = "Active checkouts for the caller", body = CheckoutListResponse)
    )
)]
pub async fn my_books(
    State(state): State<crate::AppState>,
    principal: Principal,
) -> AppResult<Json<CheckoutListResponse>> {
    let checkouts = state
        .services
        .reports
        .member_checkouts(principal.user_id)
        .await?;
    Ok(Json(CheckoutListResponse { checkouts }))
}

/// The calling member's checkout history
#[utoipa::path(
    get,
    path = "/me/history",
    tag = "reports",
    responses(
        (status = 200, description = "Checkout history for the caller", body = CheckoutListResponse)
    )
)]
pub async fn my_history(
    State(state): State<crate::AppState>,
    principal: Principal,
) -> AppResult<Json<CheckoutListResponse>> {
    let checkouts = state
        .services
        .reports
        .member_history(principal.user_id)
        .await?;
    Ok(Json(CheckoutListResponse { checkouts }))
}

/// The calling member's fines
#[utoipa::path(
    get,
    path = "/me/fines",
    tag = "reports",
    responses(
        (status = 200, description = "Fines for the caller", body = FineListResponse)
    )
)]
pub async fn my_fines(
    State(state): State<crate::AppState>,
    principal: Principal,
) -> AppResult<Json<FineListResponse>> {
    let (fines, total_unpaid) = state
        .services
        .reports
        .member_fines(principal.user_id)
        .await?;
    Ok(Json(FineListResponse { fines, total_unpaid }))
}

/// The calling member's dashboard counters
#[utoipa::path(
    get,
    path = "/me/dashboard",
    tag = "reports",
    responses(
        (status = 200, description = "Dashboard counters for the caller", body = MemberDashboard)
    )
)]
pub async fn my_dashboard(
    State(state): State<crate::AppState>,
    principal: Principal,
) -> AppResult<Json<MemberDashboard>> {
    let dashboard = state
        .services
        .reports
        .member_dashboard(principal.user_id)
        .await?;
    Ok(Json(dashboard))
}

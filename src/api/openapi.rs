//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{circulation, health, reports, requests};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Circulation API",
        version = "0.1.0",
        description = "Library circulation management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Circulation
        circulation::checkout,
        circulation::return_copy,
        // Requests
        requests::create_request,
        requests::list_requests,
        requests::decide_request,
        // Reports
        reports::library_stats,
        reports::active_checkouts,
        reports::my_books,
        reports::my_history,
        reports::my_fines,
        reports::my_dashboard,
    ),
    components(
        schemas(
            // Health
            health::HealthResponse,
            // Circulation
            circulation::CheckoutRequest,
            circulation::CheckoutResponse,
            circulation::ReturnRequest,
            circulation::ReturnResponse,
            // Requests
            requests::DecideRequest,
            requests::RequestResponse,
            requests::DecisionResponse,
            requests::RequestListResponse,
            // Reports
            reports::LibraryStats,
            reports::CheckoutListResponse,
            reports::FineListResponse,
            // Models
            crate::models::Book,
            crate::models::BookCopy,
            crate::models::Transaction,
            crate::models::transaction::CheckoutDetails,
            crate::models::Fine,
            crate::models::FineDetails,
            crate::models::BookRequest,
            crate::models::BookRequestDetails,
            crate::models::CreateBookRequest,
            crate::models::User,
            crate::models::user::MemberDashboard,
            crate::models::CopyStatus,
            crate::models::TransactionStatus,
            crate::models::RequestStatus,
            crate::models::RequestDecision,
            crate::models::Role,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "circulation", description = "Checkout and return operations"),
        (name = "requests", description = "Book request fulfillment"),
        (name = "reports", description = "Read-only statistics and member views")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router serving the OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

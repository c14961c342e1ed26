//! API handlers for the circulation REST endpoints

pub mod circulation;
pub mod health;
pub mod openapi;
pub mod reports;
pub mod requests;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::{error::AppError, models::Role, AppState};

/// Opaque authenticated principal, issued by the external auth collaborator.
///
/// Authentication happens upstream; the gateway forwards the established
/// identity in the `x-user-id` and `x-user-role` headers and this server
/// only consumes it.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: i32,
    pub role: Role,
}

impl Principal {
    /// Guard for librarian-only operations
    pub fn require_librarian(&self) -> Result<(), AppError> {
        if self.role != Role::Librarian {
            return Err(AppError::Authorization(
                "Access denied. Librarian role required.".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i32>().ok())
            .ok_or_else(|| AppError::Authentication("Missing user identity".to_string()))?;

        let role = parts
            .headers
            .get("x-user-role")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Role>().ok())
            .ok_or_else(|| AppError::Authentication("Missing user role".to_string()))?;

        Ok(Principal { user_id, role })
    }
}

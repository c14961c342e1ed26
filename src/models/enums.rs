//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// CopyStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a physical book copy.
///
/// `CheckedOut` is written exclusively by the circulation engine; `Damaged`
/// and `Lost` are terminal values set by an administrative action outside the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "copy_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CopyStatus {
    Available,
    CheckedOut,
    Reserved,
    Damaged,
    Lost,
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CopyStatus::Available => "AVAILABLE",
            CopyStatus::CheckedOut => "CHECKED_OUT",
            CopyStatus::Reserved => "RESERVED",
            CopyStatus::Damaged => "DAMAGED",
            CopyStatus::Lost => "LOST",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// TransactionStatus
// ---------------------------------------------------------------------------

/// Status of a checkout transaction.
///
/// Overdueness is derived at query time from `due_date`, never stored, so
/// there is no third value to keep in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Active,
    Returned,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TransactionStatus::Active => "ACTIVE",
            TransactionStatus::Returned => "RETURNED",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Status of a book request. `Pending` is initial; the other three are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Approved,
    Denied,
    Cancelled,
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Denied => "DENIED",
            RequestStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// RequestDecision
// ---------------------------------------------------------------------------

/// A librarian's decision on a pending request.
///
/// `PENDING` is deliberately not a member: re-affirming a request is not a
/// decision, and a payload carrying it fails deserialization before the
/// workflow runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestDecision {
    Approved,
    Denied,
    Cancelled,
}

impl RequestDecision {
    /// The terminal status this decision resolves the request to
    pub fn target_status(self) -> RequestStatus {
        match self {
            RequestDecision::Approved => RequestStatus::Approved,
            RequestDecision::Denied => RequestStatus::Denied,
            RequestDecision::Cancelled => RequestStatus::Cancelled,
        }
    }
}

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role attached to an authenticated principal by the external auth layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Member,
    Librarian,
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MEMBER" => Ok(Role::Member),
            "LIBRARIAN" => Ok(Role::Librarian),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_not_a_valid_decision() {
        let err = serde_json::from_str::<RequestDecision>("\"PENDING\"");
        assert!(err.is_err());
    }

    #[test]
    fn decisions_resolve_to_terminal_statuses() {
        assert_eq!(
            RequestDecision::Approved.target_status(),
            RequestStatus::Approved
        );
        assert_eq!(
            RequestDecision::Denied.target_status(),
            RequestStatus::Denied
        );
        assert_eq!(
            RequestDecision::Cancelled.target_status(),
            RequestStatus::Cancelled
        );
    }

    #[test]
    fn statuses_serialize_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&CopyStatus::CheckedOut).unwrap(),
            "\"CHECKED_OUT\""
        );
        assert_eq!(
            serde_json::to_string(&RequestStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }
}

//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction so every role-admin endpoint
//! returns the same `{ code, message, request_id }` shape.
//!
//! # Key invariants and assumptions
//! - Error responses carry a stable `code` and a human-readable `message`.
//! - Status codes align with the error category.
//! - Internal and directory failures are logged server-side; clients get a
//!   generic message.
use crate::api::types::ErrorResponse;
use crate::directory::DirectoryError;
use crate::session::SessionError;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use scopegrant_authz::ScopeError;

/// Structured API error returned by handlers.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use roleadmin::api::error::ApiError;
/// use roleadmin::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::NOT_FOUND,
///     body: ErrorResponse {
///         code: "not_found".to_string(),
///         message: "missing".to_string(),
///         request_id: None,
///     },
/// };
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// Build a 404 Not Found error.
pub fn api_not_found(message: &str) -> ApiError {
    api_error(StatusCode::NOT_FOUND, "not_found", message)
}

/// Build a 409 Conflict error with a caller-provided code.
pub fn api_conflict(code: &str, message: &str) -> ApiError {
    api_error(StatusCode::CONFLICT, code, message)
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Build a 503 error for a directory that could not be loaded in full.
///
/// Editing is refused rather than served from a partial tree.
pub fn api_unavailable(err: &DirectoryError) -> ApiError {
    tracing::warn!(error = %err, "scope tree load failed");
    api_error(
        StatusCode::SERVICE_UNAVAILABLE,
        "editing_unavailable",
        "assignment editing unavailable",
    )
}

/// Build a 500 Internal Server Error from a store error.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    // Log internal details server-side for debugging; return generic message.
    tracing::error!(error = ?err, "roleadmin storage error");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Build a 500 Internal Server Error without a store error.
pub fn api_internal_message(message: &str) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Map a scope error from a request-supplied node or record.
///
/// Unknown nodes are 404; malformed records are validation errors.
pub fn api_scope_error(err: &ScopeError) -> ApiError {
    match err {
        ScopeError::NotFound { .. } => api_not_found(&err.to_string()),
        ScopeError::InvalidRecord(_) => api_validation_error(&err.to_string()),
        ScopeError::DuplicateNode { .. }
        | ScopeError::OrphanNode { .. }
        | ScopeError::MisplacedNode { .. } => {
            tracing::error!(error = %err, "scope tree invariant broken");
            api_internal_message("scope tree is inconsistent")
        }
    }
}

pub fn api_session_error(message: &str, err: &SessionError) -> ApiError {
    match err {
        SessionError::Scope(err) => api_scope_error(err),
        SessionError::InvalidRole(_) | SessionError::NotExpandable(_) => {
            api_validation_error(&err.to_string())
        }
        SessionError::Store(StoreError::Conflict(_)) => {
            api_conflict("already_exists", "role name already exists")
        }
        SessionError::Store(StoreError::NotFound(_)) => api_not_found("role not found"),
        SessionError::Store(err) => api_internal(message, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scopegrant_authz::ScopeLevel;

    #[test]
    fn api_error_helpers_build_expected_codes() {
        let not_found = api_not_found("missing");
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.body.code, "not_found");

        let conflict = api_conflict("already_exists", "conflict");
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.body.code, "already_exists");

        let validation = api_validation_error("bad");
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);
        assert_eq!(validation.body.code, "validation_error");

        let internal = api_internal_message("oops");
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.body.code, "internal");
    }

    #[test]
    fn directory_failure_is_service_unavailable() {
        let err = api_unavailable(&DirectoryError::Unavailable("timeout".to_string()));
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.body.code, "editing_unavailable");
        assert_eq!(err.body.message, "assignment editing unavailable");
    }

    #[test]
    fn scope_errors_map_by_kind() {
        let missing = api_scope_error(&ScopeError::NotFound {
            level: ScopeLevel::Portfolio,
            id: 4,
        });
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.body.message, "PORTFOLIO 4 not found in scope tree");

        let malformed = api_scope_error(&ScopeError::InvalidRecord("missing tenantId".into()));
        assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn session_errors_map_store_failures() {
        let invalid = api_session_error(
            "save",
            &SessionError::InvalidRole(vec!["name must not be empty"]),
        );
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
        assert_eq!(invalid.body.message, "invalid role: name must not be empty");

        let conflict = api_session_error(
            "save",
            &SessionError::Store(StoreError::Conflict("role name".to_string())),
        );
        assert_eq!(conflict.status, StatusCode::CONFLICT);

        let internal = api_session_error(
            "failed to save role",
            &SessionError::Store(StoreError::Unexpected(anyhow::anyhow!("boom"))),
        );
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.body.message, "failed to save role");
    }
}

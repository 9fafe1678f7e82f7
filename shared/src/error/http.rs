//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::TaskNotFound
            | Self::AssigneeNotFound
            | Self::ShiftNotFound
            | Self::EmployeeNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::ConcurrentModification
            | Self::CompanyAdminExists
            | Self::EmployeeEmailExists
            | Self::EmployeeHasOpenShift => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied
            | Self::AdminRequired
            | Self::EmployeeRequired
            | Self::CrossCompanyAccess
            | Self::NotResourceOwner
            | Self::CannotDeleteSelf => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request: validation, task status rules, shift open/closed state
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ErrorCode::Success.http_status(), StatusCode::OK);
        assert_eq!(ErrorCode::TaskNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::AssigneeNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::CompanyAdminExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::CrossCompanyAccess.http_status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::DatabaseError.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_state_rule_violations_are_bad_request() {
        assert_eq!(ErrorCode::InvalidStatusTransition.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InvalidTaskStatus.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ShiftAlreadyOpen.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ShiftAlreadyClosed.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::WorkSummaryRequired.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::ValidationFailed.http_status(), StatusCode::BAD_REQUEST);
    }
}

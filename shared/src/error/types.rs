//! AppError and the JSON error body

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use crate::models::{Role, TaskStatus};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Error returned by every StaffHub operation.
///
/// `code` decides the HTTP status, `details` carries machine-readable
/// context (offending field, statuses of a rejected transition, ...).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ---- input ----

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// `<field> is required`
    pub fn required_field(field: &str) -> Self {
        Self::with_message(ErrorCode::RequiredField, format!("{field} is required"))
            .with_detail("field", field)
    }

    // ---- identity ----

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    // ---- authorization ----

    /// The caller lacks the role an operation needs
    pub fn role_required(role: Role) -> Self {
        let code = match role {
            Role::Admin => ErrorCode::AdminRequired,
            Role::Employee => ErrorCode::EmployeeRequired,
        };
        Self::with_message(code, format!("Access denied: {role} role required"))
            .with_detail("required_role", role.as_str())
    }

    /// The caller is not the assignee / creator / owner the rule names
    pub fn not_owner(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotResourceOwner, msg)
    }

    pub fn cross_company(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::CrossCompanyAccess, msg)
    }

    // ---- tasks ----

    /// Requested status text does not name a task status
    pub fn invalid_status(requested: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidTaskStatus).with_detail("status", requested.into())
    }

    /// Rejected edge of the task transition table
    pub fn invalid_transition(from: TaskStatus, to: TaskStatus) -> Self {
        Self::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Cannot change status from \"{from}\" to \"{to}\"."),
        )
        .with_detail("from", from.as_str())
        .with_detail("to", to.as_str())
    }

    // ---- shifts ----

    pub fn shift_already_open() -> Self {
        Self::new(ErrorCode::ShiftAlreadyOpen)
    }

    pub fn shift_already_closed() -> Self {
        Self::new(ErrorCode::ShiftAlreadyClosed)
    }

    // ---- storage ----

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::AlreadyExists, msg)
    }

    /// A compare-and-swap write lost against another request
    pub fn concurrent_modification(resource: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConcurrentModification).with_detail("resource", resource.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

/// JSON body for errors and message-carrying successes:
/// `{code, message, data?, details?}`, `code` 0 on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: Some(0),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        let mut body = ApiResponse::<()>::error(&self);

        // 系统错误只记录日志，客户端只看到通用消息
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
            body.message = self.code.message().to_string();
            body.details = None;
        }

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_message_comes_from_code() {
        let err = AppError::new(ErrorCode::TaskNotFound);
        assert_eq!(err.message, ErrorCode::TaskNotFound.message());
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert!(err.details.is_none());
    }

    #[test]
    fn transition_error_names_both_statuses() {
        let err = AppError::invalid_transition(TaskStatus::Assigned, TaskStatus::Completed);
        assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
        assert_eq!(err.message, "Cannot change status from \"assigned\" to \"completed\".");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        let details = err.details.unwrap();
        assert_eq!(details["from"], "assigned");
        assert_eq!(details["to"], "completed");
    }

    #[test]
    fn role_required_picks_code_by_role() {
        let err = AppError::role_required(Role::Admin);
        assert_eq!(err.code, ErrorCode::AdminRequired);
        assert_eq!(err.message, "Access denied: admin role required");
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);

        let err = AppError::role_required(Role::Employee);
        assert_eq!(err.code, ErrorCode::EmployeeRequired);
        assert_eq!(err.details.unwrap()["required_role"], "employee");
    }

    #[test]
    fn shift_state_errors_are_bad_requests() {
        assert_eq!(AppError::shift_already_open().http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::shift_already_closed().message,
            ErrorCode::ShiftAlreadyClosed.message()
        );
    }

    #[test]
    fn required_field_and_invalid_status_carry_the_input() {
        let err = AppError::required_field("due_date");
        assert_eq!(err.message, "due_date is required");
        assert_eq!(err.details.unwrap()["field"], "due_date");

        let err = AppError::invalid_status("done");
        assert_eq!(err.message, "Invalid status provided.");
        assert_eq!(err.details.unwrap()["status"], "done");
    }

    #[test]
    fn lost_write_is_a_conflict() {
        let err = AppError::concurrent_modification("task");
        assert_eq!(err.http_status(), StatusCode::CONFLICT);
        assert_eq!(err.details.unwrap()["resource"], "task");
    }

    #[test]
    fn error_body_skips_missing_fields() {
        let err = AppError::cross_company("Cross-company assignment not allowed");
        let json = serde_json::to_value(ApiResponse::<()>::error(&err)).unwrap();
        assert_eq!(json["code"], ErrorCode::CrossCompanyAccess.code());
        assert_eq!(json["message"], "Cross-company assignment not allowed");
        assert!(json.get("data").is_none());
        assert!(json.get("details").is_none());
    }

    #[test]
    fn success_body_carries_message_and_data() {
        let body = ApiResponse::success_with_message("Task status updated successfully", 7);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["data"], 7);

        let back: ApiResponse<i32> = serde_json::from_value(json).unwrap();
        assert_eq!(back.data, Some(7));
    }
}

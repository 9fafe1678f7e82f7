//! Unified error system for StaffHub
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ApiResponse`]: Unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Company errors
//! - 4xxx: Task errors
//! - 5xxx: Shift errors
//! - 6xxx: Employee errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//! use shared::models::TaskStatus;
//!
//! let err = AppError::invalid_transition(TaskStatus::Assigned, TaskStatus::Completed);
//! assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
//!
//! let err = AppError::required_field("due_date");
//! let body = ApiResponse::<()>::error(&err);
//! assert_eq!(body.message, "due_date is required");
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};

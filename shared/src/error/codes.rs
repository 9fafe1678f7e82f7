//! Unified error codes
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Company errors
//! - 4xxx: Task errors
//! - 5xxx: Shift errors
//! - 6xxx: Employee errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the dashboard can switch
/// on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Record changed by a concurrent request
    ConcurrentModification = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,
    /// Employee role required
    EmployeeRequired = 2004,
    /// Target belongs to another company
    CrossCompanyAccess = 2005,
    /// Caller does not own the resource
    NotResourceOwner = 2006,
    /// Admin cannot delete their own account
    CannotDeleteSelf = 2007,

    // ==================== 3xxx: Company ====================
    /// Company already has an admin
    CompanyAdminExists = 3001,

    // ==================== 4xxx: Task ====================
    /// Task not found
    TaskNotFound = 4001,
    /// Unknown task status
    InvalidTaskStatus = 4002,
    /// Status change not permitted
    InvalidStatusTransition = 4003,
    /// Assigned employee not found
    AssigneeNotFound = 4004,

    // ==================== 5xxx: Shift ====================
    /// Shift not found
    ShiftNotFound = 5001,
    /// Employee already has an open shift
    ShiftAlreadyOpen = 5002,
    /// Shift has already ended
    ShiftAlreadyClosed = 5003,
    /// Work summary is required to end a shift
    WorkSummaryRequired = 5004,

    // ==================== 6xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 6001,
    /// Email already registered
    EmployeeEmailExists = 6002,
    /// Employee has an open shift
    EmployeeHasOpenShift = 6003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric error code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ConcurrentModification => "Record was modified concurrently, retry",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::EmployeeRequired => "Employee role is required",
            ErrorCode::CrossCompanyAccess => "Cross-company access not allowed",
            ErrorCode::NotResourceOwner => "You do not own this resource",
            ErrorCode::CannotDeleteSelf => "Cannot delete your own account",

            // Company
            ErrorCode::CompanyAdminExists => "Admin already exists for this company",

            // Task
            ErrorCode::TaskNotFound => "Task not found",
            ErrorCode::InvalidTaskStatus => "Invalid status provided.",
            ErrorCode::InvalidStatusTransition => "Status change not permitted",
            ErrorCode::AssigneeNotFound => "Assigned employee not found",

            // Shift
            ErrorCode::ShiftNotFound => "Shift not found",
            ErrorCode::ShiftAlreadyOpen => "Shift already in progress",
            ErrorCode::ShiftAlreadyClosed => "Shift already ended",
            ErrorCode::WorkSummaryRequired => "Work summary is required",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeEmailExists => "Email already registered",
            ErrorCode::EmployeeHasOpenShift => "Employee has a shift in progress",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::ConcurrentModification),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2004 => Ok(ErrorCode::EmployeeRequired),
            2005 => Ok(ErrorCode::CrossCompanyAccess),
            2006 => Ok(ErrorCode::NotResourceOwner),
            2007 => Ok(ErrorCode::CannotDeleteSelf),

            // Company
            3001 => Ok(ErrorCode::CompanyAdminExists),

            // Task
            4001 => Ok(ErrorCode::TaskNotFound),
            4002 => Ok(ErrorCode::InvalidTaskStatus),
            4003 => Ok(ErrorCode::InvalidStatusTransition),
            4004 => Ok(ErrorCode::AssigneeNotFound),

            // Shift
            5001 => Ok(ErrorCode::ShiftNotFound),
            5002 => Ok(ErrorCode::ShiftAlreadyOpen),
            5003 => Ok(ErrorCode::ShiftAlreadyClosed),
            5004 => Ok(ErrorCode::WorkSummaryRequired),

            // Employee
            6001 => Ok(ErrorCode::EmployeeNotFound),
            6002 => Ok(ErrorCode::EmployeeEmailExists),
            6003 => Ok(ErrorCode::EmployeeHasOpenShift),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

//! Data models
//!
//! Shared between the server and the dashboard (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps Unix millis.

pub mod employee;
pub mod shift;
pub mod task;

// Re-exports
pub use employee::*;
pub use shift::*;
pub use task::*;

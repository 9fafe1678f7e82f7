//! Task Model

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::EmployeeSummary;

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "kebab-case"))]
pub enum TaskStatus {
    /// Scheduled, waiting for the activation sweep
    Pending,
    Assigned,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Assigned => "assigned",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a status string is not one of the four known values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTaskStatus(pub String);

impl fmt::Display for UnknownTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown task status: {}", self.0)
    }
}

impl std::error::Error for UnknownTaskStatus {}

impl FromStr for TaskStatus {
    type Err = UnknownTaskStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "assigned" => Ok(TaskStatus::Assigned),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(UnknownTaskStatus(other.to_string())),
        }
    }
}

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Employee the task is assigned to
    pub assigned_to: i64,
    /// Admin who created the task
    pub assigned_by: i64,
    pub due_date: i64,
    /// Future activation date; kept after activation as history
    pub scheduled_for: Option<i64>,
    /// True only between creation and activation by the sweep
    pub is_scheduled: bool,
    pub status: TaskStatus,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Task row as listed to admins, with who it is for and who created it.
/// Either side is `None` if that employee is outside the caller's company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub assignee: Option<EmployeeSummary>,
    pub assigner: Option<EmployeeSummary>,
}

/// Assign task payload. Missing fields are reported by validation, not by
/// the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskAssign {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub assigned_to: Option<i64>,
    pub due_date: Option<i64>,
    pub scheduled_for: Option<i64>,
}

/// Status update payload. Kept as free text so unknown values surface as
/// "Invalid status provided." instead of a body rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    #[serde(default, deserialize_with = "status_text")]
    pub status: Option<String>,
}

/// Any JSON scalar is accepted and kept as text (`5` becomes `"5"`)
fn status_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_matches_wire_format() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::Assigned,
            TaskStatus::InProgress,
            TaskStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(
            "done".parse::<TaskStatus>(),
            Err(UnknownTaskStatus("done".to_string()))
        );
        assert!("In-Progress".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn status_update_keeps_non_string_values_as_text() {
        let update: TaskStatusUpdate = serde_json::from_str(r#"{"status":5}"#).unwrap();
        assert_eq!(update.status.as_deref(), Some("5"));
        let update: TaskStatusUpdate = serde_json::from_str(r#"{"status":"completed"}"#).unwrap();
        assert_eq!(update.status.as_deref(), Some("completed"));
        let update: TaskStatusUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.status.is_none());
    }

    #[test]
    fn task_detail_flattens_the_task() {
        let detail = TaskDetail {
            task: Task {
                id: 7,
                title: "Restock".into(),
                description: String::new(),
                assigned_to: 2,
                assigned_by: 1,
                due_date: 0,
                scheduled_for: None,
                is_scheduled: false,
                status: TaskStatus::Assigned,
                started_at: None,
                completed_at: None,
                created_at: 0,
                updated_at: 0,
            },
            assignee: Some(EmployeeSummary {
                id: 2,
                username: "bob".into(),
                email: "bob@acme.test".into(),
            }),
            assigner: None,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["assigned_to"], 2);
        assert_eq!(json["assignee"]["username"], "bob");
        assert!(json["assigner"].is_null());
    }
}

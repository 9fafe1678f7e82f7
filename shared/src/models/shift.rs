//! Shift Model

use serde::{Deserialize, Serialize};

/// A single work session. `end_time == None` means the shift is open.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Shift {
    pub id: i64,
    pub employee_id: i64,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub work_summary: Option<String>,
    /// Hours between start and end, two decimals; set on close
    pub total_hours: Option<f64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

/// End shift payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftEnd {
    pub work_summary: Option<String>,
}

/// Work summary update payload (while the shift is still open)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShiftWorkSummary {
    pub work_summary: Option<String>,
}

/// Elapsed hours between two millisecond timestamps, rounded to two decimals
pub fn elapsed_hours(start_ms: i64, end_ms: i64) -> f64 {
    let hours = (end_ms - start_ms) as f64 / 3_600_000.0;
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_hours_rounds_to_two_decimals() {
        assert_eq!(elapsed_hours(0, 3_600_000), 1.0);
        assert_eq!(elapsed_hours(0, 5_400_000), 1.5);
        assert_eq!(elapsed_hours(0, 1_000), 0.0);
        // 8h 20m
        assert_eq!(elapsed_hours(1_000, 1_000 + 30_000_000), 8.33);
    }
}

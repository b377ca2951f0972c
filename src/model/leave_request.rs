use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Lifecycle states of a leave request.
///
/// Only transitions into or out of `Approved` move leave balances; Rejected
/// and Cancelled are terminal bookkeeping states.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Server-computed scheduled workdays in [start_date, end_date];
    /// client-supplied values are ignored.
    pub total_days: f64,
    pub status: String,
    pub reason: Option<String>,
    pub notes: Option<String>,
    pub requested_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<u64>,
}

impl LeaveRequest {
    /// Parse the stored status string; legacy rows with unknown statuses are
    /// treated as Pending so they can never hold an allocation.
    pub fn parsed_status(&self) -> LeaveStatus {
        LeaveStatus::from_str(&self.status).unwrap_or(LeaveStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_db_strings() {
        for status in [
            LeaveStatus::Pending,
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
        ] {
            let stored = status.to_string();
            assert_eq!(LeaveStatus::from_str(&stored).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_parses_as_pending() {
        let req = LeaveRequest {
            id: 1,
            employee_id: 1,
            leave_type_id: 1,
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            total_days: 1.0,
            status: "Denied".to_string(),
            reason: None,
            notes: None,
            requested_at: None,
            approved_at: None,
            approved_by: None,
        };
        assert_eq!(req.parsed_status(), LeaveStatus::Pending);
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Discriminant column values for `leave_calendar.applies_to_type`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum ScopeType {
    All,
    Department,
    JobTitle,
    Employee,
}

/// Who a holiday/closure entry applies to.
///
/// An employee matches the union of applicable entries; there is no
/// precedence between scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolidayScope {
    All,
    Department(u64),
    JobTitle(u64),
    Employee(u64),
}

impl HolidayScope {
    /// Build a scope from the stored discriminant pair. Returns None for an
    /// unknown type string or a scoped type missing its id.
    pub fn from_parts(applies_to_type: &str, applies_to_id: Option<u64>) -> Option<Self> {
        match ScopeType::from_str(applies_to_type).ok()? {
            ScopeType::All => Some(HolidayScope::All),
            ScopeType::Department => applies_to_id.map(HolidayScope::Department),
            ScopeType::JobTitle => applies_to_id.map(HolidayScope::JobTitle),
            ScopeType::Employee => applies_to_id.map(HolidayScope::Employee),
        }
    }

    pub fn applies_to(&self, employee_id: u64, department_id: u64, job_title_id: u64) -> bool {
        match self {
            HolidayScope::All => true,
            HolidayScope::Department(id) => *id == department_id,
            HolidayScope::JobTitle(id) => *id == job_title_id,
            HolidayScope::Employee(id) => *id == employee_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 3,
        "date": "2025-12-25",
        "is_holiday": true,
        "applies_to_type": "All",
        "applies_to_id": null
    })
)]
pub struct CalendarEntry {
    #[schema(example = 3)]
    pub id: u64,

    #[schema(example = "2025-12-25", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = true)]
    pub is_holiday: bool,

    #[schema(example = "All")]
    pub applies_to_type: String,

    #[schema(example = 10, nullable = true)]
    pub applies_to_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_scope_without_id() {
        assert_eq!(HolidayScope::from_parts("All", None), Some(HolidayScope::All));
        assert_eq!(
            HolidayScope::from_parts("All", Some(9)),
            Some(HolidayScope::All)
        );
    }

    #[test]
    fn scoped_types_require_an_id() {
        assert_eq!(
            HolidayScope::from_parts("Department", Some(10)),
            Some(HolidayScope::Department(10))
        );
        assert_eq!(HolidayScope::from_parts("Department", None), None);
        assert_eq!(HolidayScope::from_parts("JobTitle", None), None);
        assert_eq!(HolidayScope::from_parts("Employee", None), None);
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert_eq!(HolidayScope::from_parts("Team", Some(1)), None);
    }

    #[test]
    fn applicability_matrix() {
        let employee_id = 1000;
        let department_id = 10;
        let job_title_id = 3;

        assert!(HolidayScope::All.applies_to(employee_id, department_id, job_title_id));

        assert!(HolidayScope::Department(10).applies_to(employee_id, department_id, job_title_id));
        assert!(!HolidayScope::Department(11).applies_to(employee_id, department_id, job_title_id));

        assert!(HolidayScope::JobTitle(3).applies_to(employee_id, department_id, job_title_id));
        assert!(!HolidayScope::JobTitle(4).applies_to(employee_id, department_id, job_title_id));

        assert!(HolidayScope::Employee(1000).applies_to(employee_id, department_id, job_title_id));
        assert!(!HolidayScope::Employee(1001).applies_to(employee_id, department_id, job_title_id));
    }
}

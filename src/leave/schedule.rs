use chrono::{NaiveDate, Weekday};
use sqlx::MySqlPool;
use sqlx::types::Json;
use std::collections::HashSet;

use crate::error::LeaveError;
use crate::model::calendar::HolidayScope;

/// An employee's resolved schedule plus the organizational attributes needed
/// for holiday scope matching.
#[derive(Debug, Clone)]
pub struct EmployeeSchedule {
    /// Weekday name strings from the assigned work schedule; empty when the
    /// employee has no schedule assigned.
    pub days_of_week: Vec<String>,
    pub department_id: u64,
    pub job_title_id: u64,
}

/// Map weekday name strings to `chrono::Weekday`. Unknown names are ignored
/// and duplicates collapse.
pub fn day_names_to_weekdays(names: &[String]) -> HashSet<Weekday> {
    names
        .iter()
        .filter_map(|name| match name.as_str() {
            "Sunday" => Some(Weekday::Sun),
            "Monday" => Some(Weekday::Mon),
            "Tuesday" => Some(Weekday::Tue),
            "Wednesday" => Some(Weekday::Wed),
            "Thursday" => Some(Weekday::Thu),
            "Friday" => Some(Weekday::Fri),
            "Saturday" => Some(Weekday::Sat),
            _ => None,
        })
        .collect()
}

/// Load the employee's assigned work schedule and org attributes.
///
/// A missing employee is `EmployeeNotFound`; a missing schedule assignment is
/// an empty weekday list, which callers must surface as "cannot compute"
/// rather than zero workdays.
pub async fn get_employee_schedule(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<EmployeeSchedule, LeaveError> {
    let row = sqlx::query_as::<_, (Option<Json<Vec<String>>>, u64, u64)>(
        r#"
        SELECT ws.days_of_week, e.department_id, e.job_title_id
        FROM employees e
        LEFT JOIN work_schedules ws ON e.work_schedule_id = ws.id
        WHERE e.id = ?
        "#,
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((days_of_week, department_id, job_title_id)) => Ok(EmployeeSchedule {
            days_of_week: days_of_week.map(|d| d.0).unwrap_or_default(),
            department_id,
            job_title_id,
        }),
        None => Err(LeaveError::EmployeeNotFound(employee_id)),
    }
}

/// Holiday/closure dates in [start, end] that apply to the employee.
///
/// Applicability is the union over matching scopes (All, the employee's
/// department, their job title, or the employee specifically); there is no
/// precedence between entries. Scope matching happens here in one place
/// rather than in query predicates.
pub async fn get_applicable_holidays(
    pool: &MySqlPool,
    employee_id: u64,
    department_id: u64,
    job_title_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HashSet<NaiveDate>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (NaiveDate, String, Option<u64>)>(
        r#"
        SELECT date, applies_to_type, applies_to_id
        FROM leave_calendar
        WHERE is_holiday = TRUE
          AND date >= ? AND date <= ?
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    let mut holidays = HashSet::new();
    for (date, applies_to_type, applies_to_id) in rows {
        match HolidayScope::from_parts(&applies_to_type, applies_to_id) {
            Some(scope) => {
                if scope.applies_to(employee_id, department_id, job_title_id) {
                    holidays.insert(date);
                }
            }
            None => {
                tracing::warn!(
                    %date,
                    scope = %applies_to_type,
                    "Skipping calendar entry with malformed scope"
                );
            }
        }
    }
    Ok(holidays)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn maps_all_seven_day_names() {
        let set = day_names_to_weekdays(&names(&[
            "Sunday",
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
        ]));
        assert_eq!(set.len(), 7);
        assert!(set.contains(&Weekday::Sun));
        assert!(set.contains(&Weekday::Sat));
    }

    #[test]
    fn unknown_names_are_ignored() {
        let set = day_names_to_weekdays(&names(&["Monday", "Funday", ""]));
        assert_eq!(set, HashSet::from([Weekday::Mon]));
    }

    #[test]
    fn duplicates_collapse() {
        let set = day_names_to_weekdays(&names(&["Friday", "Friday", "Friday"]));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn empty_input_is_empty_set() {
        assert!(day_names_to_weekdays(&[]).is_empty());
    }
}

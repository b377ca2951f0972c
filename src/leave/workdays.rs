use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use sqlx::MySqlPool;
use std::collections::{BTreeMap, HashSet};
use utoipa::ToSchema;

use crate::error::LeaveError;
use crate::leave::schedule::{self, day_names_to_weekdays};
use crate::utils::schedule_cache;

/// Result of counting scheduled workdays over a date range.
///
/// Dates are calendar days (`NaiveDate`) with no time-of-day or timezone
/// component, so a date's weekday can never shift across zone boundaries.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkdayComputation {
    #[schema(example = 5)]
    pub total_workdays: u32,

    /// Day counts bucketed by calendar year; entries exist only for years
    /// with at least one counted day.
    #[schema(value_type = Object, example = json!({"2024": 2, "2025": 3}))]
    pub workdays_by_year: BTreeMap<i32, u32>,

    #[schema(value_type = Vec<String>, example = json!(["2025-01-06", "2025-01-07"]))]
    pub dates_counted: Vec<NaiveDate>,

    /// Scheduled workdays that fell on an applicable holiday/closure.
    #[schema(value_type = Vec<String>, example = json!(["2025-01-08"]))]
    pub dates_excluded_as_holidays: Vec<NaiveDate>,

    #[schema(example = json!(["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]))]
    pub schedule_days: Vec<String>,

    /// False when the employee has no workdays defined at all; callers must
    /// treat that as "cannot compute", not "zero workdays".
    #[schema(example = true)]
    pub has_schedule: bool,
}

impl WorkdayComputation {
    fn empty(schedule_days: Vec<String>) -> Self {
        WorkdayComputation {
            total_workdays: 0,
            workdays_by_year: BTreeMap::new(),
            dates_counted: Vec::new(),
            dates_excluded_as_holidays: Vec::new(),
            schedule_days,
            has_schedule: false,
        }
    }

    /// Gate for mutating endpoints: a missing schedule or a range with no
    /// countable days must reject the operation before any store write.
    pub fn require_countable(&self) -> Result<(), LeaveError> {
        if !self.has_schedule {
            return Err(LeaveError::NoScheduleAssigned);
        }
        if self.total_workdays == 0 {
            return Err(LeaveError::ZeroWorkdaysInRange);
        }
        Ok(())
    }

    /// Per-year day counts as signed-allocation quantities.
    pub fn allocation_by_year(&self) -> BTreeMap<i32, f64> {
        self.workdays_by_year
            .iter()
            .map(|(&year, &days)| (year, days as f64))
            .collect()
    }
}

/// Count scheduled workdays in [start, end] inclusive, one pass over the
/// calendar dates.
///
/// A date whose weekday is in `workday_set` is either counted or, if present
/// in `holidays`, recorded as excluded; dates off the schedule are skipped
/// silently. `end < start` is an error, not an empty result.
pub fn count_workdays(
    start: NaiveDate,
    end: NaiveDate,
    workday_set: &HashSet<Weekday>,
    holidays: &HashSet<NaiveDate>,
) -> Result<WorkdayComputation, LeaveError> {
    if end < start {
        return Err(LeaveError::InvalidRange);
    }

    let mut workdays_by_year: BTreeMap<i32, u32> = BTreeMap::new();
    let mut dates_counted = Vec::new();
    let mut dates_excluded_as_holidays = Vec::new();

    let mut current = start;
    while current <= end {
        if workday_set.contains(&current.weekday()) {
            if holidays.contains(&current) {
                dates_excluded_as_holidays.push(current);
            } else {
                *workdays_by_year.entry(current.year()).or_insert(0) += 1;
                dates_counted.push(current);
            }
        }
        current = match current.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(WorkdayComputation {
        total_workdays: dates_counted.len() as u32,
        workdays_by_year,
        dates_counted,
        dates_excluded_as_holidays,
        schedule_days: Vec::new(),
        has_schedule: !workday_set.is_empty(),
    })
}

/// Optional overrides for [`calculate_scheduled_workdays`], used by callers
/// that already hold a resolved schedule (preview) or want raw counts without
/// holiday exclusion.
#[derive(Debug, Clone, Default)]
pub struct CalcOptions {
    pub days_of_week: Option<Vec<String>>,
    pub department_id: Option<u64>,
    pub job_title_id: Option<u64>,
    pub include_holidays: bool,
}

/// Resolver → counter pipeline for one employee and date range.
///
/// Fails with `EmployeeNotFound` / `InvalidRange`. An employee without a
/// schedule yields a zero result with `has_schedule = false`; converting that
/// into a rejection is the caller's job via
/// [`WorkdayComputation::require_countable`].
pub async fn calculate_scheduled_workdays(
    pool: &MySqlPool,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
    options: CalcOptions,
) -> Result<WorkdayComputation, LeaveError> {
    if end < start {
        return Err(LeaveError::InvalidRange);
    }

    let (days_of_week, department_id, job_title_id) = match options.days_of_week {
        Some(days) => (
            days,
            options.department_id.unwrap_or(0),
            options.job_title_id.unwrap_or(0),
        ),
        None => {
            let resolved = schedule::get_employee_schedule(pool, employee_id).await?;
            (
                resolved.days_of_week,
                resolved.department_id,
                resolved.job_title_id,
            )
        }
    };

    let workday_set = day_names_to_weekdays(&days_of_week);
    if workday_set.is_empty() {
        return Ok(WorkdayComputation::empty(days_of_week));
    }

    let holidays = if options.include_holidays {
        HashSet::new()
    } else {
        schedule::get_applicable_holidays(pool, employee_id, department_id, job_title_id, start, end)
            .await?
    };

    let mut computation = count_workdays(start, end, &workday_set, &holidays)?;
    computation.schedule_days = days_of_week;
    computation.has_schedule = true;
    Ok(computation)
}

/// UI preview payload; computation failures land in `error` instead of
/// propagating.
#[derive(Debug, Serialize, ToSchema)]
pub struct WorkdayPreview {
    #[schema(example = 5)]
    pub workdays: u32,

    #[schema(value_type = Object, example = json!({"2025": 5}))]
    pub workdays_by_year: BTreeMap<i32, u32>,

    #[schema(example = true)]
    pub has_schedule: bool,

    #[schema(example = json!(["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]))]
    pub schedule_days: Vec<String>,

    #[schema(example = 1)]
    pub holidays_excluded: u32,

    #[schema(example = json!(null), nullable = true)]
    pub error: Option<String>,
}

impl WorkdayPreview {
    fn failed(message: String) -> Self {
        WorkdayPreview {
            workdays: 0,
            workdays_by_year: BTreeMap::new(),
            has_schedule: false,
            schedule_days: Vec::new(),
            holidays_excluded: 0,
            error: Some(message),
        }
    }
}

/// Never-failing preview of a prospective leave request.
///
/// Reads the schedule through the TTL cache; mutating endpoints resolve
/// schedules directly from the store instead.
pub async fn preview_leave_workdays(
    pool: &MySqlPool,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> WorkdayPreview {
    let resolved = match schedule_cache::get(pool, employee_id).await {
        Ok(resolved) => resolved,
        Err(e) => return WorkdayPreview::failed(e.to_string()),
    };

    let options = CalcOptions {
        days_of_week: Some(resolved.days_of_week),
        department_id: Some(resolved.department_id),
        job_title_id: Some(resolved.job_title_id),
        include_holidays: false,
    };

    match calculate_scheduled_workdays(pool, employee_id, start, end, options).await {
        Ok(computation) => WorkdayPreview {
            workdays: computation.total_workdays,
            workdays_by_year: computation.workdays_by_year,
            has_schedule: computation.has_schedule,
            holidays_excluded: computation.dates_excluded_as_holidays.len() as u32,
            error: if computation.has_schedule {
                None
            } else {
                Some("Employee has no work schedule assigned".to_string())
            },
            schedule_days: computation.schedule_days,
        },
        Err(e) => WorkdayPreview::failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mon_fri() -> HashSet<Weekday> {
        HashSet::from([
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ])
    }

    fn weekend() -> HashSet<Weekday> {
        HashSet::from([Weekday::Sat, Weekday::Sun])
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn full_mon_fri_week_counts_five() {
        // 2025-01-06 .. 2025-01-10 is Monday through Friday
        let result =
            count_workdays(date(2025, 1, 6), date(2025, 1, 10), &mon_fri(), &HashSet::new())
                .unwrap();
        assert_eq!(result.total_workdays, 5);
        assert_eq!(result.workdays_by_year.get(&2025), Some(&5));
        assert_eq!(result.dates_counted.len(), 5);
    }

    #[test]
    fn weekend_range_counts_zero_for_mon_fri() {
        // 2025-01-04 .. 2025-01-05 is Sat-Sun
        let result =
            count_workdays(date(2025, 1, 4), date(2025, 1, 5), &mon_fri(), &HashSet::new())
                .unwrap();
        assert_eq!(result.total_workdays, 0);
        assert!(result.workdays_by_year.is_empty());
    }

    #[test]
    fn thu_to_tue_spanning_weekend_counts_four() {
        // Thu Jan 2, Fri Jan 3, (Sat, Sun skipped), Mon Jan 6, Tue Jan 7
        let result =
            count_workdays(date(2025, 1, 2), date(2025, 1, 7), &mon_fri(), &HashSet::new())
                .unwrap();
        assert_eq!(result.total_workdays, 4);
    }

    #[test]
    fn holiday_on_workday_is_excluded_not_counted() {
        let holidays = HashSet::from([date(2025, 1, 6)]);
        let result =
            count_workdays(date(2025, 1, 6), date(2025, 1, 10), &mon_fri(), &holidays).unwrap();
        assert_eq!(result.total_workdays, 4);
        assert_eq!(result.dates_excluded_as_holidays, vec![date(2025, 1, 6)]);
        assert!(!result.dates_counted.contains(&date(2025, 1, 6)));
    }

    #[test]
    fn holiday_on_non_workday_is_silently_skipped() {
        // Saturday holiday with a Mon-Fri schedule lands in neither list
        let holidays = HashSet::from([date(2025, 1, 4)]);
        let result =
            count_workdays(date(2025, 1, 3), date(2025, 1, 6), &mon_fri(), &holidays).unwrap();
        assert_eq!(result.total_workdays, 2);
        assert!(result.dates_excluded_as_holidays.is_empty());
    }

    #[test]
    fn year_boundary_splits_into_per_year_buckets() {
        // Mon 2024-12-30, Tue 2024-12-31 | Wed 2025-01-01 .. Fri 2025-01-03
        let result =
            count_workdays(date(2024, 12, 30), date(2025, 1, 3), &mon_fri(), &HashSet::new())
                .unwrap();
        assert_eq!(result.total_workdays, 5);
        assert_eq!(result.workdays_by_year.get(&2024), Some(&2));
        assert_eq!(result.workdays_by_year.get(&2025), Some(&3));
    }

    #[test]
    fn total_equals_sum_of_year_buckets() {
        let holidays = HashSet::from([date(2024, 12, 31), date(2025, 1, 2)]);
        let result =
            count_workdays(date(2024, 12, 23), date(2025, 1, 17), &mon_fri(), &holidays).unwrap();
        let bucket_sum: u32 = result.workdays_by_year.values().sum();
        assert_eq!(result.total_workdays, bucket_sum);
        assert_eq!(result.total_workdays, result.dates_counted.len() as u32);
    }

    #[test]
    fn weekend_schedule_counts_only_weekend_days() {
        // 2025-01-04 (Sat) .. 2025-01-10 (Fri): Sat + Sun = 2
        let result =
            count_workdays(date(2025, 1, 4), date(2025, 1, 10), &weekend(), &HashSet::new())
                .unwrap();
        assert_eq!(result.total_workdays, 2);
    }

    #[test]
    fn weekend_schedule_over_weekday_range_counts_zero() {
        let result =
            count_workdays(date(2025, 1, 6), date(2025, 1, 10), &weekend(), &HashSet::new())
                .unwrap();
        assert_eq!(result.total_workdays, 0);
    }

    #[test]
    fn empty_schedule_counts_zero_and_has_no_schedule() {
        let result = count_workdays(
            date(2025, 1, 1),
            date(2025, 12, 31),
            &HashSet::new(),
            &HashSet::new(),
        )
        .unwrap();
        assert_eq!(result.total_workdays, 0);
        assert!(result.workdays_by_year.is_empty());
        assert!(!result.has_schedule);
    }

    #[test]
    fn single_day_range_is_valid() {
        let monday =
            count_workdays(date(2025, 1, 6), date(2025, 1, 6), &mon_fri(), &HashSet::new())
                .unwrap();
        assert_eq!(monday.total_workdays, 1);

        let saturday =
            count_workdays(date(2025, 1, 4), date(2025, 1, 4), &mon_fri(), &HashSet::new())
                .unwrap();
        assert_eq!(saturday.total_workdays, 0);
    }

    #[test]
    fn reversed_range_is_an_error() {
        let result = count_workdays(
            date(2025, 1, 10),
            date(2025, 1, 6),
            &mon_fri(),
            &HashSet::new(),
        );
        assert!(matches!(result, Err(LeaveError::InvalidRange)));
    }

    #[test]
    fn require_countable_rejects_missing_schedule_and_zero_days() {
        let no_schedule = count_workdays(
            date(2025, 1, 6),
            date(2025, 1, 10),
            &HashSet::new(),
            &HashSet::new(),
        )
        .unwrap();
        assert!(matches!(
            no_schedule.require_countable(),
            Err(LeaveError::NoScheduleAssigned)
        ));

        let zero_days =
            count_workdays(date(2025, 1, 4), date(2025, 1, 5), &mon_fri(), &HashSet::new())
                .unwrap();
        assert!(matches!(
            zero_days.require_countable(),
            Err(LeaveError::ZeroWorkdaysInRange)
        ));

        let fine =
            count_workdays(date(2025, 1, 6), date(2025, 1, 10), &mon_fri(), &HashSet::new())
                .unwrap();
        assert!(fine.require_countable().is_ok());
    }

    #[test]
    fn allocation_by_year_mirrors_counts() {
        let result =
            count_workdays(date(2024, 12, 30), date(2025, 1, 3), &mon_fri(), &HashSet::new())
                .unwrap();
        let allocation = result.allocation_by_year();
        assert_eq!(allocation.get(&2024), Some(&2.0));
        assert_eq!(allocation.get(&2025), Some(&3.0));
    }
}

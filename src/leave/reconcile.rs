use chrono::Datelike;
use sqlx::{MySql, MySqlPool, Transaction};
use std::collections::BTreeMap;

use crate::error::LeaveError;
use crate::leave::workdays::{self, CalcOptions};
use crate::model::leave_request::LeaveRequest;

/// Sign of a balance adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Add,
    Subtract,
}

/// New `used_days` after applying `days` in `direction`. Subtraction clamps
/// at zero; a balance can never go negative.
fn next_used_days(current: f64, days: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Add => current + days,
        Direction::Subtract => (current - days).max(0.0),
    }
}

/// Attribute a request's stored total to its start date's year. Used when
/// recomputing workdays from the current schedule is impossible (schedule or
/// employee since removed); lossy for multi-year ranges but preserved as the
/// system's established fallback.
fn fallback_by_year(request: &LeaveRequest) -> BTreeMap<i32, f64> {
    BTreeMap::from([(request.start_date.year(), request.total_days)])
}

/// Apply a signed per-year workday map to the employee's balance rows.
///
/// Rows are locked, then created lazily on Add (entitlement defaulted from
/// the leave type) or updated in place. Subtract against a missing row is a
/// no-op; there is nothing to subtract from.
pub async fn apply_workday_allocation(
    tx: &mut Transaction<'_, MySql>,
    employee_id: u64,
    leave_type_id: u64,
    workdays_by_year: &BTreeMap<i32, f64>,
    direction: Direction,
) -> Result<(), sqlx::Error> {
    for (&year, &days) in workdays_by_year {
        if days <= 0.0 {
            continue;
        }

        let existing = sqlx::query_as::<_, (u64, f64)>(
            r#"
            SELECT id, used_days
            FROM leave_balances
            WHERE employee_id = ? AND leave_type_id = ? AND year = ?
            FOR UPDATE
            "#,
        )
        .bind(employee_id)
        .bind(leave_type_id)
        .bind(year)
        .fetch_optional(&mut **tx)
        .await?;

        match existing {
            Some((id, used_days)) => {
                sqlx::query("UPDATE leave_balances SET used_days = ? WHERE id = ?")
                    .bind(next_used_days(used_days, days, direction))
                    .bind(id)
                    .execute(&mut **tx)
                    .await?;
            }
            None => {
                if direction == Direction::Subtract {
                    continue;
                }

                let entitled_days = sqlx::query_scalar::<_, f64>(
                    "SELECT default_days FROM leave_types WHERE id = ?",
                )
                .bind(leave_type_id)
                .fetch_optional(&mut **tx)
                .await?
                .unwrap_or(0.0);

                sqlx::query(
                    r#"
                    INSERT INTO leave_balances
                        (employee_id, leave_type_id, year, entitled_days, used_days, carried_over_days)
                    VALUES (?, ?, ?, ?, ?, 0)
                    "#,
                )
                .bind(employee_id)
                .bind(leave_type_id)
                .bind(year)
                .bind(entitled_days)
                .bind(days)
                .execute(&mut **tx)
                .await?;
            }
        }
    }
    Ok(())
}

/// Mirror an allocated request into the legacy `leaves` table.
///
/// The legacy row stores the leave type *name*; insert-or-ignore keeps the
/// write idempotent across repeated approvals of the same range.
pub async fn sync_legacy_leave(
    tx: &mut Transaction<'_, MySql>,
    request: &LeaveRequest,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT IGNORE INTO leaves
            (employee_id, leave_type, start_date, end_date, approved_by, notes)
        SELECT ?, name, ?, ?, ?, ?
        FROM leave_types
        WHERE id = ?
        "#,
    )
    .bind(request.employee_id)
    .bind(request.start_date)
    .bind(request.end_date)
    .bind(request.approved_by)
    .bind(&request.notes)
    .bind(request.leave_type_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Delete the legacy mirror row matching a reversed request.
pub async fn remove_legacy_leave(
    tx: &mut Transaction<'_, MySql>,
    request: &LeaveRequest,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        DELETE FROM leaves
        WHERE employee_id = ?
          AND start_date = ?
          AND end_date = ?
          AND leave_type = (SELECT name FROM leave_types WHERE id = ?)
        "#,
    )
    .bind(request.employee_id)
    .bind(request.start_date)
    .bind(request.end_date)
    .bind(request.leave_type_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Reverse a previously Approved request's balance contribution.
///
/// The employee's schedule may have changed since approval, so the days are
/// recomputed fresh from the stored range rather than re-read from the stale
/// `total_days`. If recomputation is impossible the stored total is
/// attributed to the start date's year. Store failures abort the transaction.
pub async fn reverse_allocation(
    pool: &MySqlPool,
    tx: &mut Transaction<'_, MySql>,
    request: &LeaveRequest,
) -> Result<(), LeaveError> {
    let by_year = match workdays::calculate_scheduled_workdays(
        pool,
        request.employee_id,
        request.start_date,
        request.end_date,
        CalcOptions::default(),
    )
    .await
    {
        Ok(computation) if computation.has_schedule => computation.allocation_by_year(),
        Ok(_) => fallback_by_year(request),
        Err(LeaveError::Database(e)) => return Err(LeaveError::Database(e)),
        Err(_) => fallback_by_year(request),
    };

    apply_workday_allocation(
        tx,
        request.employee_id,
        request.leave_type_id,
        &by_year,
        Direction::Subtract,
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(start: NaiveDate, end: NaiveDate, total_days: f64) -> LeaveRequest {
        LeaveRequest {
            id: 1,
            employee_id: 1000,
            leave_type_id: 1,
            start_date: start,
            end_date: end,
            total_days,
            status: "Approved".to_string(),
            reason: None,
            notes: None,
            requested_at: None,
            approved_at: None,
            approved_by: Some(5),
        }
    }

    #[test]
    fn add_increments_used_days() {
        assert_eq!(next_used_days(4.0, 3.0, Direction::Add), 7.0);
        assert_eq!(next_used_days(0.0, 2.0, Direction::Add), 2.0);
    }

    #[test]
    fn subtract_clamps_at_zero() {
        assert_eq!(next_used_days(4.0, 3.0, Direction::Subtract), 1.0);
        assert_eq!(next_used_days(2.0, 5.0, Direction::Subtract), 0.0);
        assert_eq!(next_used_days(0.0, 1.0, Direction::Subtract), 0.0);
    }

    #[test]
    fn add_then_subtract_restores_prior_value() {
        let before = 6.5;
        let days = 4.0;
        let after_add = next_used_days(before, days, Direction::Add);
        assert_eq!(next_used_days(after_add, days, Direction::Subtract), before);
    }

    #[test]
    fn fallback_attributes_whole_total_to_start_year() {
        let req = request(
            NaiveDate::from_ymd_opt(2024, 12, 30).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 3).unwrap(),
            5.0,
        );
        let by_year = fallback_by_year(&req);
        assert_eq!(by_year.len(), 1);
        assert_eq!(by_year.get(&2024), Some(&5.0));
    }
}

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use sqlx::MySqlPool;
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::error::LeaveError;
use crate::leave::workdays::{self, CalcOptions};
use crate::model::leave_request::LeaveRequest;

/// Stored totals drifting further than this from a fresh computation get
/// corrected in place during recalculation.
const TOTAL_DAYS_TOLERANCE: f64 = 0.001;

#[derive(Debug, Serialize, ToSchema)]
pub struct RecalcSummary {
    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = 42)]
    pub requests_processed: u32,

    /// Requests whose workdays could not be recomputed and fell back to the
    /// stored total attributed to their start year.
    #[schema(example = 1)]
    pub fallbacks: u32,

    #[schema(example = 3)]
    pub totals_corrected: u32,

    #[schema(example = 17)]
    pub balances_updated: u32,

    #[schema(example = 2)]
    pub balances_created: u32,
}

/// Rebuild `used_days` for every (employee, leave type) pair in `year` from
/// scratch, in one all-or-nothing transaction.
///
/// Every Approved request overlapping the year is recomputed against the
/// current schedules; stored `total_days` drift beyond the tolerance is
/// normalized. Balance rows are overwritten to the fresh sums, including
/// overwriting to zero, and rows are created for pairs that had overlapping
/// requests but no balance row yet.
pub async fn recalculate_year(pool: &MySqlPool, year: i32) -> Result<RecalcSummary, LeaveError> {
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or(LeaveError::InvalidRange)?;
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or(LeaveError::InvalidRange)?;

    let mut tx = pool.begin().await?;

    let requests = sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, employee_id, leave_type_id, start_date, end_date, total_days,
               status, reason, notes, requested_at, approved_at, approved_by
        FROM leave_requests
        WHERE status = 'Approved'
          AND start_date <= ? AND end_date >= ?
        FOR UPDATE
        "#,
    )
    .bind(year_end)
    .bind(year_start)
    .fetch_all(&mut *tx)
    .await?;

    let mut usage: BTreeMap<(u64, u64), f64> = BTreeMap::new();
    let mut fallbacks = 0u32;
    let mut totals_corrected = 0u32;

    for request in &requests {
        let pair = (request.employee_id, request.leave_type_id);
        match workdays::calculate_scheduled_workdays(
            pool,
            request.employee_id,
            request.start_date,
            request.end_date,
            CalcOptions::default(),
        )
        .await
        {
            Ok(computation) if computation.has_schedule => {
                let fresh_total = computation.total_workdays as f64;
                if (fresh_total - request.total_days).abs() > TOTAL_DAYS_TOLERANCE {
                    sqlx::query("UPDATE leave_requests SET total_days = ? WHERE id = ?")
                        .bind(fresh_total)
                        .bind(request.id)
                        .execute(&mut *tx)
                        .await?;
                    totals_corrected += 1;
                }

                let days_in_year = computation
                    .workdays_by_year
                    .get(&year)
                    .copied()
                    .unwrap_or(0) as f64;
                *usage.entry(pair).or_insert(0.0) += days_in_year;
            }
            Ok(_) | Err(LeaveError::EmployeeNotFound(_)) => {
                fallbacks += 1;
                let entry = usage.entry(pair).or_insert(0.0);
                if request.start_date.year() == year {
                    *entry += request.total_days;
                }
            }
            Err(e) => return Err(e),
        }
    }

    let existing = sqlx::query_as::<_, (u64, u64, u64)>(
        r#"
        SELECT id, employee_id, leave_type_id
        FROM leave_balances
        WHERE year = ?
        FOR UPDATE
        "#,
    )
    .bind(year)
    .fetch_all(&mut *tx)
    .await?;

    let mut balances_updated = 0u32;
    for (id, employee_id, leave_type_id) in existing {
        let fresh = usage.remove(&(employee_id, leave_type_id)).unwrap_or(0.0);
        sqlx::query("UPDATE leave_balances SET used_days = ? WHERE id = ?")
            .bind(fresh)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        balances_updated += 1;
    }

    let mut balances_created = 0u32;
    for ((employee_id, leave_type_id), fresh) in usage {
        let entitled_days =
            sqlx::query_scalar::<_, f64>("SELECT default_days FROM leave_types WHERE id = ?")
                .bind(leave_type_id)
                .fetch_optional(&mut *tx)
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
        .bind(fresh)
        .execute(&mut *tx)
        .await?;
        balances_created += 1;
    }

    tx.commit().await?;

    tracing::info!(
        year,
        requests = requests.len(),
        fallbacks,
        totals_corrected,
        balances_updated,
        balances_created,
        "Year recalculation complete"
    );

    Ok(RecalcSummary {
        year,
        requests_processed: requests.len() as u32,
        fallbacks,
        totals_corrected,
        balances_updated,
        balances_created,
    })
}

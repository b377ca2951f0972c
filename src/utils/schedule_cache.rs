use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use sqlx::types::Json;
use std::time::Duration;

use crate::error::LeaveError;
use crate::leave::schedule::{self, EmployeeSchedule};

/// Resolved schedules for the preview endpoint. Staleness is bounded by the
/// TTL; mutating endpoints always resolve from the store directly.
static SCHEDULE_CACHE: Lazy<Cache<u64, EmployeeSchedule>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(100_000)
        .time_to_live(Duration::from_secs(300)) // 5 min TTL
        .build()
});

/// Cached schedule lookup; falls through to the store on miss.
pub async fn get(pool: &MySqlPool, employee_id: u64) -> Result<EmployeeSchedule, LeaveError> {
    if let Some(hit) = SCHEDULE_CACHE.get(&employee_id).await {
        return Ok(hit);
    }

    let resolved = schedule::get_employee_schedule(pool, employee_id).await?;
    SCHEDULE_CACHE.insert(employee_id, resolved.clone()).await;
    Ok(resolved)
}

/// Drop a cached schedule after an employee mutation.
pub async fn invalidate(employee_id: u64) {
    SCHEDULE_CACHE.invalidate(&employee_id).await;
}

/// Batch insert resolved schedules
async fn batch_insert(entries: Vec<(u64, EmployeeSchedule)>) {
    let futures: Vec<_> = entries
        .into_iter()
        .map(|(employee_id, resolved)| SCHEDULE_CACHE.insert(employee_id, resolved))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load active employees' schedules into the in-memory cache (batched)
pub async fn warmup_schedule_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (u64, Option<Json<Vec<String>>>, u64, u64)>(
        r#"
        SELECT e.id, ws.days_of_week, e.department_id, e.job_title_id
        FROM employees e
        LEFT JOIN work_schedules ws ON e.work_schedule_id = ws.id
        WHERE e.status = 'active'
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let (employee_id, days_of_week, department_id, job_title_id) = row?;
        batch.push((
            employee_id,
            EmployeeSchedule {
                days_of_week: days_of_week.map(|d| d.0).unwrap_or_default(),
                department_id,
                job_title_id,
            },
        ));
        total_count += 1;

        if batch.len() >= batch_size {
            batch_insert(std::mem::take(&mut batch)).await;
        }
    }

    // Insert any remaining schedules
    if !batch.is_empty() {
        batch_insert(batch).await;
    }

    log::info!(
        "Schedule cache warmup complete: {} active employees",
        total_count
    );

    Ok(())
}

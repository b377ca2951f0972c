use crate::auth::auth::AuthUser;
use crate::error::LeaveError;
use crate::leave::reconcile::{self, Direction};
use crate::leave::workdays::{self, CalcOptions, WorkdayPreview};
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::leave_type::LeaveType;
use crate::model::role::Role;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

const REQUEST_COLUMNS: &str = "id, employee_id, leave_type_id, start_date, end_date, total_days, \
                               status, reason, notes, requested_at, approved_at, approved_by";

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    /// Target employee; HR/Admin only. Employees always create for themselves.
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family trip", nullable = true)]
    pub reason: Option<String>,
    #[schema(nullable = true)]
    pub notes: Option<String>,
    /// HR/Admin may create directly Approved; defaults to Pending.
    pub status: Option<LeaveStatus>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateLeave {
    #[schema(example = "2026-01-06", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = 2)]
    pub leave_type_id: Option<u64>,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DecisionNotes {
    #[schema(example = "Coverage confirmed", nullable = true)]
    pub notes: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 123)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = "Pending")]
    /// Filter by leave status
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>, // 1-based
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>, // items per page
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PreviewQuery {
    /// Defaults to the caller's own employee profile.
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: NaiveDate,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveResponse {
    #[schema(example = 1)]
    /// leave request id
    pub id: u64,
    /// employee id for whom the leave is requested
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-09", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// server-computed scheduled workdays in the range
    #[schema(example = 5.0)]
    pub total_days: f64,
    #[schema(example = "Pending", value_type = String)]
    pub status: Option<String>,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub requested_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

fn is_manager(auth: &AuthUser) -> bool {
    matches!(auth.role, Role::Admin | Role::Hr)
}

async fn fetch_request_for_update(
    tx: &mut sqlx::Transaction<'_, sqlx::MySql>,
    leave_id: u64,
) -> Result<Option<LeaveRequest>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM leave_requests WHERE id = ? FOR UPDATE",
        REQUEST_COLUMNS
    );
    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(leave_id)
        .fetch_optional(&mut **tx)
        .await
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload; total_days is always computed server-side",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request created",
         body = Object,
         example = json!({
            "message": "Leave request submitted",
            "id": 17,
            "status": "Pending",
            "total_days": 5.0,
            "workdays_by_year": {"2026": 5},
            "holidays_excluded": 0
         })
        ),
        (status = 400, description = "Invalid range, no schedule, or no workdays in range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = match payload.employee_id {
        Some(id) if is_manager(&auth) => id,
        Some(id) if auth.employee_id == Some(id) => id,
        Some(_) => {
            return Err(actix_web::error::ErrorForbidden(
                "Cannot create leave for another employee",
            ));
        }
        None => auth
            .employee_id
            .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?,
    };

    let status = match payload.status.unwrap_or(LeaveStatus::Pending) {
        LeaveStatus::Pending => LeaveStatus::Pending,
        LeaveStatus::Approved if is_manager(&auth) => LeaveStatus::Approved,
        LeaveStatus::Approved => {
            return Err(actix_web::error::ErrorForbidden(
                "Only HR/Admin may create approved leave",
            ));
        }
        _ => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "New requests must be Pending or Approved"
            })));
        }
    };

    // Workday computation doubles as validation: invalid range, missing
    // employee, missing schedule and zero-workday ranges all reject here,
    // before anything is written.
    let computation = workdays::calculate_scheduled_workdays(
        pool.get_ref(),
        employee_id,
        payload.start_date,
        payload.end_date,
        CalcOptions::default(),
    )
    .await?;
    computation.require_countable()?;

    let total_days = computation.total_workdays as f64;
    let (approved_at, approved_by) = if status == LeaveStatus::Approved {
        (Some(Utc::now()), Some(auth.user_id))
    } else {
        (None, None)
    };

    let mut tx = pool.begin().await.map_err(LeaveError::from)?;

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, leave_type_id, start_date, end_date, total_days,
             status, reason, notes, requested_at, approved_at, approved_by)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, NOW(), ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(payload.leave_type_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(total_days)
    .bind(status.to_string())
    .bind(&payload.reason)
    .bind(&payload.notes)
    .bind(approved_at)
    .bind(approved_by)
    .execute(&mut *tx)
    .await
    .map_err(LeaveError::from)?;

    let leave_id = result.last_insert_id();

    if status == LeaveStatus::Approved {
        reconcile::apply_workday_allocation(
            &mut tx,
            employee_id,
            payload.leave_type_id,
            &computation.allocation_by_year(),
            Direction::Add,
        )
        .await
        .map_err(LeaveError::from)?;

        let request = LeaveRequest {
            id: leave_id,
            employee_id,
            leave_type_id: payload.leave_type_id,
            start_date: payload.start_date,
            end_date: payload.end_date,
            total_days,
            status: status.to_string(),
            reason: payload.reason.clone(),
            notes: payload.notes.clone(),
            requested_at: None,
            approved_at,
            approved_by,
        };
        reconcile::sync_legacy_leave(&mut tx, &request)
            .await
            .map_err(LeaveError::from)?;
    }

    tx.commit().await.map_err(LeaveError::from)?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Leave request submitted",
        "id": leave_id,
        "status": status,
        "total_days": total_days,
        "workdays_by_year": computation.workdays_by_year,
        "holidays_excluded": computation.dates_excluded_as_holidays.len()
    })))
}

/* =========================
Status transitions
========================= */
/// Shared state machine for approve/reject/cancel.
///
/// Only transitions into or out of Approved move balances; everything runs in
/// one transaction so a failed allocation leaves the request untouched.
async fn transition_status(
    pool: &MySqlPool,
    auth: &AuthUser,
    leave_id: u64,
    new_status: LeaveStatus,
    notes: Option<String>,
    allow_owner: bool,
) -> actix_web::Result<HttpResponse> {
    let mut tx = pool.begin().await.map_err(LeaveError::from)?;

    let request = fetch_request_for_update(&mut tx, leave_id)
        .await
        .map_err(LeaveError::from)?;

    let Some(request) = request else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        })));
    };

    let owns_request = auth.employee_id == Some(request.employee_id);
    if !is_manager(auth) && !(allow_owner && owns_request) {
        return Err(actix_web::error::ErrorForbidden("HR/Admin only"));
    }

    let old_status = request.parsed_status();
    if old_status == new_status {
        return Ok(HttpResponse::Ok().json(serde_json::json!({
            "message": "Status unchanged"
        })));
    }

    if new_status == LeaveStatus::Approved {
        // Approval recomputes from the current schedule; failure here is
        // fatal rather than falling back to the stored total.
        let computation = workdays::calculate_scheduled_workdays(
            pool,
            request.employee_id,
            request.start_date,
            request.end_date,
            CalcOptions::default(),
        )
        .await?;
        computation.require_countable()?;
        let total_days = computation.total_workdays as f64;

        sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, total_days = ?, approved_at = NOW(), approved_by = ?,
                notes = COALESCE(?, notes)
            WHERE id = ?
            "#,
        )
        .bind(new_status.to_string())
        .bind(total_days)
        .bind(auth.user_id)
        .bind(&notes)
        .bind(leave_id)
        .execute(&mut *tx)
        .await
        .map_err(LeaveError::from)?;

        reconcile::apply_workday_allocation(
            &mut tx,
            request.employee_id,
            request.leave_type_id,
            &computation.allocation_by_year(),
            Direction::Add,
        )
        .await
        .map_err(LeaveError::from)?;

        let approved = LeaveRequest {
            status: new_status.to_string(),
            total_days,
            approved_by: Some(auth.user_id),
            ..request
        };
        reconcile::sync_legacy_leave(&mut tx, &approved)
            .await
            .map_err(LeaveError::from)?;
    } else {
        if old_status == LeaveStatus::Approved {
            reconcile::reverse_allocation(pool, &mut tx, &request).await?;
            reconcile::remove_legacy_leave(&mut tx, &request)
                .await
                .map_err(LeaveError::from)?;
        }

        sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, notes = COALESCE(?, notes)
            WHERE id = ?
            "#,
        )
        .bind(new_status.to_string())
        .bind(&notes)
        .bind(leave_id)
        .execute(&mut *tx)
        .await
        .map_err(LeaveError::from)?;
    }

    tx.commit().await.map_err(LeaveError::from)?;

    tracing::info!(leave_id, from = %old_status, to = %new_status, "Leave status changed");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Leave request {}", new_status.to_string().to_lowercase())
    })))
}

/// Swagger doc for approve_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    request_body(content = DecisionNotes, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave approved and balance allocated", body = Object, example = json!({
            "message": "Leave request approved"
        })),
        (status = 400, description = "Schedule missing or no workdays in range"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DecisionNotes>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    transition_status(
        pool.get_ref(),
        &auth,
        path.into_inner(),
        LeaveStatus::Approved,
        payload.into_inner().notes,
        false,
    )
    .await
}

/// Swagger doc for reject_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body(content = DecisionNotes, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave rejected; any prior allocation reversed", body = Object, example = json!({
            "message": "Leave request rejected"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DecisionNotes>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;
    transition_status(
        pool.get_ref(),
        &auth,
        path.into_inner(),
        LeaveStatus::Rejected,
        payload.into_inner().notes,
        false,
    )
    .await
}

/// Swagger doc for cancel_leave endpoint
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    request_body(content = DecisionNotes, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave cancelled; any prior allocation reversed", body = Object, example = json!({
            "message": "Leave request cancelled"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<DecisionNotes>,
) -> actix_web::Result<impl Responder> {
    // Employees may cancel their own requests; HR/Admin may cancel any.
    transition_status(
        pool.get_ref(),
        &auth,
        path.into_inner(),
        LeaveStatus::Cancelled,
        payload.into_inner().notes,
        true,
    )
    .await
}

/* =========================
Edit a leave request
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to edit")
    ),
    request_body = UpdateLeave,
    responses(
        (status = 200, description = "Leave request updated", body = Object, example = json!({
            "message": "Leave request updated",
            "total_days": 4.0
        })),
        (status = 400, description = "Invalid range or no countable workdays"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn update_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateLeave>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();
    let payload = payload.into_inner();

    let mut tx = pool.begin().await.map_err(LeaveError::from)?;

    let request = fetch_request_for_update(&mut tx, leave_id)
        .await
        .map_err(LeaveError::from)?;

    let Some(request) = request else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        })));
    };

    let old_status = request.parsed_status();
    if !is_manager(&auth) {
        if auth.employee_id != Some(request.employee_id) {
            return Err(actix_web::error::ErrorForbidden(
                "Cannot edit another employee's leave",
            ));
        }
        if old_status != LeaveStatus::Pending {
            return Err(actix_web::error::ErrorForbidden(
                "Only pending requests can be edited",
            ));
        }
    }

    let new_start = payload.start_date.unwrap_or(request.start_date);
    let new_end = payload.end_date.unwrap_or(request.end_date);
    let new_type = payload.leave_type_id.unwrap_or(request.leave_type_id);
    if new_end < new_start {
        return Err(LeaveError::InvalidRange.into());
    }

    let range_changed = new_start != request.start_date
        || new_end != request.end_date
        || new_type != request.leave_type_id;

    let mut total_days = request.total_days;

    if range_changed {
        if old_status == LeaveStatus::Approved {
            // Old range out first, new range in second; a single edit is
            // balance-neutral except for the delta.
            reconcile::reverse_allocation(pool.get_ref(), &mut tx, &request).await?;
            reconcile::remove_legacy_leave(&mut tx, &request)
                .await
                .map_err(LeaveError::from)?;
        }

        let computation = workdays::calculate_scheduled_workdays(
            pool.get_ref(),
            request.employee_id,
            new_start,
            new_end,
            CalcOptions::default(),
        )
        .await?;
        computation.require_countable()?;
        total_days = computation.total_workdays as f64;

        if old_status == LeaveStatus::Approved {
            reconcile::apply_workday_allocation(
                &mut tx,
                request.employee_id,
                new_type,
                &computation.allocation_by_year(),
                Direction::Add,
            )
            .await
            .map_err(LeaveError::from)?;

            let edited = LeaveRequest {
                leave_type_id: new_type,
                start_date: new_start,
                end_date: new_end,
                total_days,
                notes: payload.notes.clone().or_else(|| request.notes.clone()),
                ..request
            };
            reconcile::sync_legacy_leave(&mut tx, &edited)
                .await
                .map_err(LeaveError::from)?;
        }
    }

    sqlx::query(
        r#"
        UPDATE leave_requests
        SET start_date = ?, end_date = ?, leave_type_id = ?, total_days = ?,
            reason = COALESCE(?, reason), notes = COALESCE(?, notes)
        WHERE id = ?
        "#,
    )
    .bind(new_start)
    .bind(new_end)
    .bind(new_type)
    .bind(total_days)
    .bind(&payload.reason)
    .bind(&payload.notes)
    .bind(leave_id)
    .execute(&mut *tx)
    .await
    .map_err(LeaveError::from)?;

    tx.commit().await.map_err(LeaveError::from)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request updated",
        "total_days": total_days
    })))
}

/* =========================
Delete a leave request
========================= */
#[utoipa::path(
    delete,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to delete")
    ),
    responses(
        (status = 200, description = "Leave request deleted; any allocation reversed", body = Object, example = json!({
            "message": "Leave request deleted"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(LeaveError::from)?;

    let request = fetch_request_for_update(&mut tx, leave_id)
        .await
        .map_err(LeaveError::from)?;

    let Some(request) = request else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        })));
    };

    let old_status = request.parsed_status();
    if !is_manager(&auth) {
        if auth.employee_id != Some(request.employee_id) {
            return Err(actix_web::error::ErrorForbidden(
                "Cannot delete another employee's leave",
            ));
        }
        if old_status != LeaveStatus::Pending {
            return Err(actix_web::error::ErrorForbidden(
                "Only pending requests can be deleted",
            ));
        }
    }

    if old_status == LeaveStatus::Approved {
        // Reverse the balance contribution before the row disappears.
        reconcile::reverse_allocation(pool.get_ref(), &mut tx, &request).await?;
        reconcile::remove_legacy_leave(&mut tx, &request)
            .await
            .map_err(LeaveError::from)?;
    }

    sqlx::query("DELETE FROM leave_requests WHERE id = ?")
        .bind(leave_id)
        .execute(&mut *tx)
        .await
        .map_err(LeaveError::from)?;

    tx.commit().await.map_err(LeaveError::from)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Leave request deleted"
    })))
}

/* =========================
Workday preview
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/leave/preview",
    params(PreviewQuery),
    responses(
        (status = 200, description = "Workday preview; failures are reported in the error field", body = WorkdayPreview),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn preview_workdays(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<PreviewQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = match query.employee_id {
        Some(id) if is_manager(&auth) || auth.employee_id == Some(id) => id,
        Some(_) => {
            return Err(actix_web::error::ErrorForbidden(
                "Cannot preview another employee's workdays",
            ));
        }
        None => auth
            .employee_id
            .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?,
    };

    let preview: WorkdayPreview = workdays::preview_leave_workdays(
        pool.get_ref(),
        employee_id,
        query.start_date,
        query.end_date,
    )
    .await;

    Ok(HttpResponse::Ok().json(preview))
}

/// for listing leave types endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/types",
    responses(
        (status = 200, description = "Leave types", body = Vec<LeaveType>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn list_leave_types(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let types = sqlx::query_as::<_, LeaveType>(
        "SELECT id, name, default_days FROM leave_types ORDER BY name",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch leave types");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(types))
}

/// for getting a leave request details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = sqlx::query_as::<_, LeaveResponse>(
        r#"
        SELECT
            id,
            employee_id,
            leave_type_id,
            start_date,
            end_date,
            total_days,
            status,
            requested_at
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match leave {
        Some(data) => {
            if !is_manager(&auth) && auth.employee_id != Some(data.employee_id) {
                return Err(actix_web::error::ErrorForbidden("HR/Admin only"));
            }
            Ok(HttpResponse::Ok().json(data))
        }
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Leave request not found"
        }))),
    }
}

/// for getting leave requests endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error=%e, "Failed to count leave requests");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, leave_type_id, start_date, end_date, total_days, status, requested_at
        FROM leave_requests
        {}
        ORDER BY requested_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error=%e, "Failed to fetch leave list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    // -------------------------
    // Response
    // -------------------------
    let response = LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}

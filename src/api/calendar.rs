use crate::auth::auth::AuthUser;
use crate::model::calendar::{CalendarEntry, HolidayScope, ScopeType};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct CalendarFilter {
    #[schema(example = "2025-01-01", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2025-12-31", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateCalendarEntry {
    #[schema(example = "2025-12-25", format = "date", value_type = String)]
    pub date: NaiveDate,
    /// Defaults to true; false entries are informational and never excluded.
    #[schema(example = true)]
    pub is_holiday: Option<bool>,
    #[schema(example = "All")]
    pub applies_to_type: ScopeType,
    #[schema(example = 10, nullable = true)]
    pub applies_to_id: Option<u64>,
}

/// for listing holiday/closure calendar entries endpoint
#[utoipa::path(
    get,
    path = "/api/v1/calendar",
    params(CalendarFilter),
    responses(
        (status = 200, description = "Calendar entries", body = Vec<CalendarEntry>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn list_calendar(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<CalendarFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let mut sql = String::from(
        "SELECT id, date, is_holiday, applies_to_type, applies_to_id FROM leave_calendar WHERE 1=1",
    );
    if query.start_date.is_some() {
        sql.push_str(" AND date >= ?");
    }
    if query.end_date.is_some() {
        sql.push_str(" AND date <= ?");
    }
    sql.push_str(" ORDER BY date");

    let mut q = sqlx::query_as::<_, CalendarEntry>(&sql);
    if let Some(start) = query.start_date {
        q = q.bind(start);
    }
    if let Some(end) = query.end_date {
        q = q.bind(end);
    }

    let entries = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch calendar entries");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(entries))
}

/* =========================
Create calendar entry (HR/Admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/calendar",
    request_body = CreateCalendarEntry,
    responses(
        (status = 201, description = "Calendar entry created", body = Object, example = json!({
            "message": "Calendar entry created",
            "id": 3
        })),
        (status = 400, description = "Scoped entry missing its target id", body = Object, example = json!({
            "message": "applies_to_id is required for Department, JobTitle and Employee scopes"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn create_calendar_entry(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateCalendarEntry>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    // Validate the scope pair through the same sum type the resolver uses.
    let scope = HolidayScope::from_parts(&payload.applies_to_type.to_string(), payload.applies_to_id);
    if scope.is_none() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "applies_to_id is required for Department, JobTitle and Employee scopes"
        })));
    }

    let applies_to_id = match payload.applies_to_type {
        ScopeType::All => None, // an id on an All entry is meaningless; drop it
        _ => payload.applies_to_id,
    };

    let result = sqlx::query(
        r#"
        INSERT INTO leave_calendar (date, is_holiday, applies_to_type, applies_to_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(payload.date)
    .bind(payload.is_holiday.unwrap_or(true))
    .bind(payload.applies_to_type.to_string())
    .bind(applies_to_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, date = %payload.date, "Failed to create calendar entry");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Calendar entry created",
        "id": result.last_insert_id()
    })))
}

/// Delete calendar entry
#[utoipa::path(
    delete,
    path = "/api/v1/calendar/{entry_id}",
    params(
        ("entry_id" = u64, Path, description = "ID of the calendar entry to delete")
    ),
    responses(
        (status = 200, description = "Calendar entry deleted", body = Object, example = json!({
            "message": "Calendar entry deleted"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Calendar entry not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn delete_calendar_entry(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let entry_id = path.into_inner();

    let result = sqlx::query("DELETE FROM leave_calendar WHERE id = ?")
        .bind(entry_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, entry_id, "Failed to delete calendar entry");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Calendar entry not found"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Calendar entry deleted"
    })))
}

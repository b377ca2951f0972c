use crate::auth::auth::AuthUser;
use crate::model::work_schedule::{WEEKDAY_NAMES, WorkSchedule};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use sqlx::types::Json;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateWorkSchedule {
    #[schema(example = "Standard Mon-Fri")]
    pub name: String,
    #[schema(example = json!(["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]))]
    pub days_of_week: Vec<String>,
}

/// Validate weekday names and drop duplicates, preserving first occurrence
/// order. Errors name the offending value.
fn normalize_days(days: &[String]) -> Result<Vec<String>, String> {
    let mut seen = Vec::new();
    for day in days {
        if !WEEKDAY_NAMES.contains(&day.as_str()) {
            return Err(format!("Invalid weekday name: {}", day));
        }
        if !seen.contains(day) {
            seen.push(day.clone());
        }
    }
    Ok(seen)
}

/// for listing work schedules endpoint
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    responses(
        (status = 200, description = "Work schedules", body = Vec<WorkSchedule>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn list_schedules(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let schedules = sqlx::query_as::<_, WorkSchedule>(
        "SELECT id, name, days_of_week FROM work_schedules ORDER BY name",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch work schedules");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(schedules))
}

/// Get work schedule by ID
#[utoipa::path(
    get,
    path = "/api/v1/schedules/{schedule_id}",
    params(
        ("schedule_id" = u64, Path, description = "Work schedule ID")
    ),
    responses(
        (status = 200, description = "Work schedule found", body = WorkSchedule),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Work schedule not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn get_schedule(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let schedule_id = path.into_inner();

    let schedule = sqlx::query_as::<_, WorkSchedule>(
        "SELECT id, name, days_of_week FROM work_schedules WHERE id = ?",
    )
    .bind(schedule_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, schedule_id, "Failed to fetch work schedule");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match schedule {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Work schedule not found"
        }))),
    }
}

/* =========================
Create work schedule (HR/Admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    request_body = CreateWorkSchedule,
    responses(
        (status = 201, description = "Work schedule created", body = Object, example = json!({
            "message": "Work schedule created",
            "id": 2
        })),
        (status = 400, description = "Invalid weekday name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Schedule"
)]
pub async fn create_schedule(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateWorkSchedule>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let days = match normalize_days(&payload.days_of_week) {
        Ok(days) => days,
        Err(message) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": message
            })));
        }
    };

    let result = sqlx::query("INSERT INTO work_schedules (name, days_of_week) VALUES (?, ?)")
        .bind(&payload.name)
        .bind(Json(days))
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, name = %payload.name, "Failed to create work schedule");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "message": "Work schedule created",
        "id": result.last_insert_id()
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepts_valid_days_and_keeps_order() {
        let days = normalize_days(&names(&["Friday", "Monday"])).unwrap();
        assert_eq!(days, names(&["Friday", "Monday"]));
    }

    #[test]
    fn drops_duplicates() {
        let days = normalize_days(&names(&["Monday", "Monday", "Tuesday"])).unwrap();
        assert_eq!(days, names(&["Monday", "Tuesday"]));
    }

    #[test]
    fn rejects_unknown_names() {
        assert!(normalize_days(&names(&["Mon"])).is_err());
        assert!(normalize_days(&names(&["monday"])).is_err());
    }

    #[test]
    fn empty_schedule_is_allowed() {
        assert_eq!(normalize_days(&[]).unwrap(), Vec::<String>::new());
    }
}

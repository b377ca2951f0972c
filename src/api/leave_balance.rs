use crate::auth::auth::AuthUser;
use crate::error::LeaveError;
use crate::leave::recalc;
use crate::model::role::Role;
use actix_web::{HttpResponse, Responder, web};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BalanceFilter {
    #[schema(example = 1000)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = 2025)]
    /// Filter by year; defaults to the current year
    pub year: Option<i32>,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 7)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "Vacation")]
    pub leave_type_name: String,
    #[schema(example = 2025)]
    pub year: i32,
    #[schema(example = 20.0)]
    pub entitled_days: f64,
    #[schema(example = 4.0)]
    pub used_days: f64,
    #[schema(example = 2.5)]
    pub carried_over_days: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateBalance {
    #[schema(example = 22.0)]
    pub entitled_days: Option<f64>,
    #[schema(example = 3.0)]
    pub carried_over_days: Option<f64>,
}

/// for listing leave balances endpoint
#[utoipa::path(
    get,
    path = "/api/v1/balance",
    params(BalanceFilter),
    responses(
        (status = 200, description = "Leave balances", body = Vec<BalanceResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn list_balances(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<BalanceFilter>,
) -> actix_web::Result<impl Responder> {
    let employee_id = match query.employee_id {
        Some(id) if matches!(auth.role, Role::Admin | Role::Hr) => Some(id),
        Some(id) if auth.employee_id == Some(id) => Some(id),
        Some(_) => {
            return Err(actix_web::error::ErrorForbidden(
                "Cannot view another employee's balances",
            ));
        }
        None => {
            if matches!(auth.role, Role::Admin | Role::Hr) {
                None // all employees
            } else {
                Some(
                    auth.employee_id
                        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?,
                )
            }
        }
    };

    let year = query.year.unwrap_or_else(|| chrono::Utc::now().year());

    let mut sql = String::from(
        r#"
        SELECT lb.id, lb.employee_id, lb.leave_type_id, lt.name AS leave_type_name,
               lb.year, lb.entitled_days, lb.used_days, lb.carried_over_days
        FROM leave_balances lb
        JOIN leave_types lt ON lb.leave_type_id = lt.id
        WHERE lb.year = ?
        "#,
    );
    if employee_id.is_some() {
        sql.push_str(" AND lb.employee_id = ?");
    }
    sql.push_str(" ORDER BY lb.employee_id, lt.name");

    let mut q = sqlx::query_as::<_, BalanceResponse>(&sql).bind(year);
    if let Some(id) = employee_id {
        q = q.bind(id);
    }

    let balances = q.fetch_all(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch leave balances");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(balances))
}

/* =========================
Edit a balance (HR/Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/balance/{balance_id}",
    params(
        ("balance_id" = u64, Path, description = "ID of the balance row to edit")
    ),
    request_body = UpdateBalance,
    responses(
        (status = 200, description = "Balance updated", body = Object, example = json!({
            "message": "Balance updated"
        })),
        (status = 400, description = "Entitlement below used days", body = Object, example = json!({
            "message": "entitled_days cannot be below used_days"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Balance not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn update_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateBalance>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let balance_id = path.into_inner();

    let mut tx = pool.begin().await.map_err(LeaveError::from)?;

    let current = sqlx::query_as::<_, (f64, f64, f64)>(
        r#"
        SELECT entitled_days, used_days, carried_over_days
        FROM leave_balances
        WHERE id = ?
        FOR UPDATE
        "#,
    )
    .bind(balance_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(LeaveError::from)?;

    let Some((entitled, used, carried)) = current else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Balance not found"
        })));
    };

    let entitled_days = payload.entitled_days.unwrap_or(entitled);
    let carried_over_days = payload.carried_over_days.unwrap_or(carried);

    if entitled_days < used {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "entitled_days cannot be below used_days"
        })));
    }

    sqlx::query("UPDATE leave_balances SET entitled_days = ?, carried_over_days = ? WHERE id = ?")
        .bind(entitled_days)
        .bind(carried_over_days)
        .bind(balance_id)
        .execute(&mut *tx)
        .await
        .map_err(LeaveError::from)?;

    tx.commit().await.map_err(LeaveError::from)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Balance updated"
    })))
}

/* =========================
Recalculate a year (Admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/balance/recalculate/{year}",
    params(
        ("year" = i32, Path, description = "Calendar year to rebuild")
    ),
    responses(
        (status = 200, description = "Recalculation summary", body = crate::leave::recalc::RecalcSummary),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn recalculate_year(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<i32>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let year = path.into_inner();
    let summary = recalc::recalculate_year(pool.get_ref(), year).await?;

    Ok(HttpResponse::Ok().json(summary))
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-(employee, leave type, year) balance row.
///
/// Created lazily by the reconciler, mutated on every transition into or out
/// of Approved, never deleted. `used_days` never goes below zero.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 7,
        "employee_id": 1000,
        "leave_type_id": 1,
        "year": 2025,
        "entitled_days": 20.0,
        "used_days": 4.0,
        "carried_over_days": 2.5
    })
)]
pub struct LeaveBalance {
    #[schema(example = 7)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = 1)]
    pub leave_type_id: u64,

    #[schema(example = 2025)]
    pub year: i32,

    #[schema(example = 20.0)]
    pub entitled_days: f64,

    #[schema(example = 4.0)]
    pub used_days: f64,

    #[schema(example = 2.5)]
    pub carried_over_days: f64,
}

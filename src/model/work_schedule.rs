use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;

/// Canonical weekday names accepted in `days_of_week`, in calendar order.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Standard Mon-Fri",
        "days_of_week": ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
    })
)]
pub struct WorkSchedule {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Standard Mon-Fri")]
    pub name: String,

    /// Weekday name strings; may be empty (no workdays defined).
    #[schema(value_type = Vec<String>, example = json!(["Monday", "Friday"]))]
    pub days_of_week: Json<Vec<String>>,
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reference data; only ever read by this service.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveType {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Vacation")]
    pub name: String,

    /// Default annual entitlement in days, used when a balance row is
    /// created lazily.
    #[schema(example = 20.0)]
    pub default_days: f64,
}

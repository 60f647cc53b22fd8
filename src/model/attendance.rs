use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One appended row in the attendance event log. Rows are never updated
/// or deleted.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "check-in")]
    pub kind: String,
    pub location_id: String,
    pub location_name: String,
    #[schema(example = "2026-01-01T08:30:00Z", format = "date-time", value_type = String)]
    pub timestamp: DateTime<Utc>,
}

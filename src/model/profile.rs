use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row per user; holds the attendance status snapshot the scan
/// endpoint classifies against, plus display fields.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Profile {
    pub user_id: u64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub avatar_url: Option<String>,
    #[schema(example = "2026-01-01T08:30:00Z", format = "date-time", value_type = String)]
    pub last_check_in: Option<DateTime<Utc>>,
    #[schema(example = "2026-01-01T17:30:00Z", format = "date-time", value_type = String)]
    pub last_check_out: Option<DateTime<Utc>>,
    pub days_present: u32,
    pub times_late: u32,
}

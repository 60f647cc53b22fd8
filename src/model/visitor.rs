use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString, ToSchema,
)]
pub enum VisitorStatus {
    #[serde(rename = "scheduled")]
    #[strum(serialize = "scheduled")]
    Scheduled,
    #[serde(rename = "checked-in")]
    #[strum(serialize = "checked-in")]
    CheckedIn,
    #[serde(rename = "checked-out")]
    #[strum(serialize = "checked-out")]
    CheckedOut,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Visitor {
    pub id: u64,
    pub visitor_name: String,
    pub company: Option<String>,
    pub host_name: Option<String>,
    #[schema(example = "2026-01-01T10:00:00Z", format = "date-time", value_type = String)]
    pub date: DateTime<Utc>,
    #[schema(example = "scheduled")]
    pub status: String,
}

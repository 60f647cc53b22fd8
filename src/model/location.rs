use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registered scan point. The `id` is what gets encoded into the
/// location's QR code.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

use crate::auth::auth::AuthUser;
use crate::model::attendance::Attendance;
use crate::scan::AttendanceAction;
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Filter by event kind
    #[schema(example = "check-in", value_type = String)]
    pub kind: Option<AttendanceAction>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, ToSchema)]
pub struct HistoryListResponse {
    #[schema(example = json!([{
        "id": 1,
        "user_id": 7,
        "kind": "check-in",
        "location_id": "loc-hq-1",
        "location_name": "Head Office",
        "timestamp": "2026-01-01T08:30:00Z"
    }]))]
    pub data: Vec<Attendance>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Attendance history for the caller, newest first
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("kind", Query, description = "Filter by event kind: check-in or check-out")
    ),
    responses(
        (status = 200, description = "Paginated attendance history", body = HistoryListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HistoryQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = vec!["user_id = ?"];
    let mut bindings = vec![FilterValue::U64(auth.user_id)];

    if let Some(kind) = query.kind.as_ref() {
        conditions.push("kind = ?");
        bindings.push(FilterValue::Str(kind.as_ref()));
    }

    let where_clause = format!("WHERE {}", conditions.join(" AND "));

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM attendance {}", where_clause);
    debug!(sql = %count_sql, "Counting attendance events");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = match b {
            FilterValue::U64(v) => count_query.bind(*v),
            FilterValue::Str(s) => count_query.bind(*s),
        };
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count attendance events");
        ErrorInternalServerError("Database error")
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM attendance {} ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, page, per_page, offset, "Fetching attendance events");

    let mut data_query = sqlx::query_as::<_, Attendance>(&data_sql);
    for b in &bindings {
        data_query = match b {
            FilterValue::U64(v) => data_query.bind(*v),
            FilterValue::Str(s) => data_query.bind(*s),
        };
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let events = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch attendance events");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(HistoryListResponse {
        data: events,
        page,
        per_page,
        total,
    }))
}

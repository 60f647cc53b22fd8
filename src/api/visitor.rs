use crate::auth::auth::AuthUser;
use crate::model::visitor::{Visitor, VisitorStatus};
use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateVisitor {
    #[schema(example = "Jane Visitor")]
    pub visitor_name: String,
    #[schema(example = "Acme Corp")]
    pub company: Option<String>,
    #[schema(example = "John Host")]
    pub host_name: Option<String>,
    #[schema(example = "2026-01-01T10:00:00Z", format = "date-time", value_type = String)]
    pub date: DateTime<Utc>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateVisitorStatus {
    #[schema(example = "checked-in")]
    pub status: VisitorStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VisitorQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Filter by visitor status
    #[schema(example = "scheduled")]
    pub status: Option<VisitorStatus>,
}

#[derive(Serialize, ToSchema)]
pub struct VisitorListResponse {
    #[schema(example = json!([{
        "id": 1,
        "visitor_name": "Jane Visitor",
        "company": "Acme Corp",
        "host_name": "John Host",
        "date": "2026-01-01T10:00:00Z",
        "status": "scheduled"
    }]))]
    pub data: Vec<Visitor>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 3)]
    pub total: i64,
}

/// Visitor list, newest first
#[utoipa::path(
    get,
    path = "/api/v1/visitors",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("status", Query, description = "Filter by status: scheduled, checked-in or checked-out")
    ),
    responses(
        (status = 200, description = "Paginated visitor list", body = VisitorListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Visitors"
)]
pub async fn list_visitors(
    pool: web::Data<MySqlPool>,
    query: web::Query<VisitorQuery>,
) -> actix_web::Result<impl Responder> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    let mut conditions: Vec<&str> = Vec::new();
    let mut bindings: Vec<&str> = Vec::new();

    if let Some(status) = query.status.as_ref() {
        conditions.push("status = ?");
        bindings.push(status.as_ref());
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) as total FROM visitors {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting visitors");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(*b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count visitors");
        ErrorInternalServerError("Database error")
    })?;

    let data_sql = format!(
        "SELECT * FROM visitors {} ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching visitors");

    let mut data_query = sqlx::query_as::<_, Visitor>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(*b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let visitors = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch visitors");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(VisitorListResponse {
        data: visitors,
        page,
        per_page,
        total,
    }))
}

/// Schedule a visitor
#[utoipa::path(
    post,
    path = "/api/v1/visitors",
    request_body = CreateVisitor,
    responses(
        (status = 201, description = "Visitor scheduled", body = Object, example = json!({
            "message": "Visitor scheduled"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Visitors"
)]
pub async fn create_visitor(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateVisitor>,
) -> actix_web::Result<impl Responder> {
    auth.require_reception_or_admin()?;

    let result = sqlx::query(
        r#"
        INSERT INTO visitors (visitor_name, company, host_name, date, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&payload.visitor_name)
    .bind(&payload.company)
    .bind(&payload.host_name)
    .bind(payload.date)
    .bind(VisitorStatus::Scheduled.as_ref())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(json!({
            "message": "Visitor scheduled"
        }))),
        Err(e) => {
            error!(error = %e, "Failed to schedule visitor");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// Advance a visitor's status
#[utoipa::path(
    put,
    path = "/api/v1/visitors/{id}/status",
    params(
        ("id", Path, description = "Visitor ID")
    ),
    request_body = UpdateVisitorStatus,
    responses(
        (status = 200, description = "Status updated", body = Object, example = json!({
            "message": "Visitor status updated"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Visitor not found", body = Object, example = json!({
            "message": "Visitor not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Visitors"
)]
pub async fn update_visitor_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<UpdateVisitorStatus>,
) -> actix_web::Result<impl Responder> {
    auth.require_reception_or_admin()?;

    let visitor_id = path.into_inner();

    let result = sqlx::query("UPDATE visitors SET status = ? WHERE id = ?")
        .bind(body.status.as_ref())
        .bind(visitor_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, visitor_id, "Failed to update visitor status");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Visitor not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Visitor status updated"
    })))
}

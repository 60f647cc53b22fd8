use crate::auth::auth::AuthUser;
use crate::model::profile::Profile;
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

/// Columns a user may change about themselves. The status timestamps are
/// owned by the scan endpoint and are not client-writable.
const UPDATABLE: &[&str] = &[
    "first_name",
    "last_name",
    "department",
    "position",
    "avatar_url",
];

#[derive(Deserialize, ToSchema)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub avatar_url: Option<String>,
}

/// Get own profile
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile found", body = Profile),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No profile row for this user", body = Object, example = json!({
            "message": "Profile not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let profile = sqlx::query_as::<_, Profile>(
        r#"
        SELECT user_id, first_name, last_name, department, position, avatar_url,
               last_check_in, last_check_out, days_present, times_late
        FROM profiles
        WHERE user_id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, user_id = auth.user_id, "Failed to fetch profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match profile {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Profile not found"
        }))),
    }
}

/// Update own profile
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated successfully", body = Object, example = json!({
            "message": "Profile updated successfully"
        })),
        (status = 400, description = "No fields provided"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No profile row for this user"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Json<UpdateProfile>,
) -> actix_web::Result<impl Responder> {
    let mut fields = Map::new();

    if let Some(v) = &body.first_name {
        fields.insert("first_name".into(), Value::String(v.clone()));
    }
    if let Some(v) = &body.last_name {
        fields.insert("last_name".into(), Value::String(v.clone()));
    }
    if let Some(v) = &body.department {
        fields.insert("department".into(), Value::String(v.clone()));
    }
    if let Some(v) = &body.position {
        fields.insert("position".into(), Value::String(v.clone()));
    }
    if let Some(v) = &body.avatar_url {
        fields.insert("avatar_url".into(), Value::String(v.clone()));
    }

    let update = build_update_sql(
        "profiles",
        &Value::Object(fields),
        UPDATABLE,
        "user_id",
        auth.user_id,
    )?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().body("Profile not found"));
    }

    Ok(HttpResponse::Ok().body("Profile updated successfully"))
}

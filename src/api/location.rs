use crate::auth::auth::AuthUser;
use crate::model::location::Location;
use crate::utils::location_cache;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Deserialize, ToSchema)]
pub struct CreateLocation {
    /// Generated when omitted
    #[schema(example = "loc-hq-1")]
    pub id: Option<String>,
    #[schema(example = "Head Office")]
    pub name: String,
}

/// Register a location
///
/// The returned `qr_payload` is the exact string to encode into the
/// location's QR code.
#[utoipa::path(
    post,
    path = "/api/v1/locations",
    request_body = CreateLocation,
    responses(
        (status = 201, description = "Location registered", body = Object, example = json!({
            "id": "loc-hq-1",
            "qr_payload": "{\"id\":\"loc-hq-1\",\"name\":\"Head Office\"}"
        })),
        (status = 400, description = "Empty name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Location id already registered", body = Object, example = json!({
            "message": "Location id already registered"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Locations"
)]
pub async fn create_location(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLocation>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Location name must not be empty"
        })));
    }

    let id = payload
        .id
        .clone()
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let result = sqlx::query("INSERT INTO locations (id, name) VALUES (?, ?)")
        .bind(&id)
        .bind(name)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => {
            location_cache::mark_known(&id, name).await;

            Ok(HttpResponse::Created().json(json!({
                "id": id,
                "qr_payload": json!({ "id": id, "name": name }).to_string()
            })))
        }
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "message": "Location id already registered"
                    })));
                }
            }

            error!(error = %e, location_id = %id, "Failed to register location");
            Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            })))
        }
    }
}

/// List registered locations
#[utoipa::path(
    get,
    path = "/api/v1/locations",
    responses(
        (status = 200, description = "Registered locations", body = [Location]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Locations"
)]
pub async fn list_locations(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let locations = sqlx::query_as::<_, Location>(
        "SELECT id, name, created_at FROM locations ORDER BY created_at DESC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch locations");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(locations))
}

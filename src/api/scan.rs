use crate::auth::auth::AuthUser;
use crate::scan::{
    AttendanceAction, AttendanceEvent, AttendanceStatus, ScanError, StoreKind, UNKNOWN_LOCATION,
    process,
};
use crate::utils::{location_cache, scan_guard};
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, warn};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct ScanReq {
    /// Raw string delivered by the code scanner, one per scan event
    #[schema(example = r#"{"id":"loc-hq-1","name":"Head Office"}"#)]
    pub data: String,
}

/// Scan ingestion endpoint
///
/// Classifies the scan as a check-in or check-out against the caller's
/// current status and records it. Writes are applied in a fixed order:
/// the event log append first, the profile patch second, so a failure in
/// between leaves the log complete and the status recomputable.
#[utoipa::path(
    post,
    path = "/api/v1/scan",
    request_body = ScanReq,
    responses(
        (status = 200, description = "Scan recorded", body = Object, example = json!({
            "action": "check-in",
            "location": "Head Office",
            "timestamp": "2026-01-01T08:30:00Z"
        })),
        (status = 400, description = "Scanned code carries no usable location id", body = Object, example = json!({
            "message": "Invalid code, please rescan"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A scan for this user is already being processed", body = Object, example = json!({
            "message": "A scan is already being processed"
        })),
        (status = 500, description = "Store write failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Scan"
)]
pub async fn scan(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Json<ScanReq>,
) -> actix_web::Result<impl Responder> {
    let user_id = auth.user_id;

    // One in-flight scan per user: a rapid double-scan reading the same
    // stale snapshot would classify both scans as check-in.
    let _permit = match scan_guard::acquire(user_id) {
        Some(p) => p,
        None => {
            return Ok(HttpResponse::Conflict().json(json!({
                "message": "A scan is already being processed"
            })));
        }
    };

    let status = match read_status(pool.get_ref(), user_id).await {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, user_id, "Failed to read attendance status");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Could not read attendance status"
            })));
        }
    };

    let outcome = match process(&body.data, Some(user_id), &status, Utc::now()) {
        Ok(o) => o,
        Err(ScanError::InvalidPayload) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Invalid code, please rescan"
            })));
        }
        Err(ScanError::NotAuthenticated) => {
            return Ok(HttpResponse::Unauthorized().json(json!({
                "message": ScanError::NotAuthenticated.to_string()
            })));
        }
        Err(e) => {
            error!(error = %e, user_id, "Unexpected scan failure");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "message": "Failed to process scan"
            })));
        }
    };

    let mut event = outcome.event;

    // Prefer the registered display name when the code itself carried none.
    if event.location_name == UNKNOWN_LOCATION {
        if let Some(name) = location_cache::name_of(&event.location_id).await {
            event.location_name = name;
        }
    }

    // Event log first: a crash after this point leaves an audit-complete
    // log with a stale status, which read_status can recover from. The
    // reverse order would lose the scan from history.
    if let Err(e) = append_event(pool.get_ref(), &event).await {
        return Ok(HttpResponse::InternalServerError().json(json!({
            "message": e.to_string()
        })));
    }

    if let Err(e) = apply_status_patch(pool.get_ref(), user_id, &outcome.status_patch).await {
        // The event is already durable; the next read_status call
        // recovers the snapshot from the log.
        return Ok(HttpResponse::InternalServerError().json(json!({
            "message": e.to_string()
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "action": outcome.action.as_ref(),
        "location": event.location_name,
        "timestamp": event.timestamp,
    })))
}

/// Current snapshot from the profile row, falling back to the event log
/// when no row exists yet (fresh account, or a crash between the two
/// outcome writes).
async fn read_status(pool: &MySqlPool, user_id: u64) -> Result<AttendanceStatus, sqlx::Error> {
    let status = sqlx::query_as::<_, AttendanceStatus>(
        "SELECT last_check_in, last_check_out FROM profiles WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    match status {
        Some(s) => Ok(s),
        None => recover_status_from_log(pool, user_id).await,
    }
}

/// Rebuild the snapshot the way the patch rules would have left it: the
/// newest event decides the state, and a check-out keeps its session's
/// check-in as the anchor.
async fn recover_status_from_log(
    pool: &MySqlPool,
    user_id: u64,
) -> Result<AttendanceStatus, sqlx::Error> {
    let newest = sqlx::query_as::<_, (String, DateTime<Utc>)>(
        "SELECT kind, timestamp FROM attendance WHERE user_id = ? ORDER BY timestamp DESC, id DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let (kind, ts) = match newest {
        Some(row) => row,
        None => return Ok(AttendanceStatus::default()),
    };

    if kind == AttendanceAction::CheckIn.as_ref() {
        return Ok(AttendanceStatus {
            last_check_in: Some(ts),
            last_check_out: None,
        });
    }

    let anchor = sqlx::query_scalar::<_, DateTime<Utc>>(
        "SELECT timestamp FROM attendance WHERE user_id = ? AND kind = ? AND timestamp <= ? ORDER BY timestamp DESC, id DESC LIMIT 1",
    )
    .bind(user_id)
    .bind(AttendanceAction::CheckIn.as_ref())
    .bind(ts)
    .fetch_optional(pool)
    .await?;

    Ok(AttendanceStatus {
        last_check_in: anchor,
        last_check_out: Some(ts),
    })
}

async fn append_event(pool: &MySqlPool, event: &AttendanceEvent) -> Result<(), ScanError> {
    sqlx::query(
        r#"
        INSERT INTO attendance (user_id, kind, location_id, location_name, timestamp)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(event.user_id)
    .bind(event.kind.as_ref())
    .bind(&event.location_id)
    .bind(&event.location_name)
    .bind(event.timestamp)
    .execute(pool)
    .await
    .map_err(|e| {
        error!(error = %e, user_id = event.user_id, "Failed to append attendance event");
        ScanError::StoreWriteFailed(StoreKind::EventLog)
    })?;

    Ok(())
}

/// Upsert so the patch also repairs a missing profile row.
async fn apply_status_patch(
    pool: &MySqlPool,
    user_id: u64,
    patch: &AttendanceStatus,
) -> Result<(), ScanError> {
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, last_check_in, last_check_out)
        VALUES (?, ?, ?)
        ON DUPLICATE KEY UPDATE
            last_check_in = VALUES(last_check_in),
            last_check_out = VALUES(last_check_out)
        "#,
    )
    .bind(user_id)
    .bind(patch.last_check_in)
    .bind(patch.last_check_out)
    .execute(pool)
    .await
    .map_err(|e| {
        warn!(error = %e, user_id, "Event appended but status patch failed");
        ScanError::StoreWriteFailed(StoreKind::Profile)
    })?;

    Ok(())
}

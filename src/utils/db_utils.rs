use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug)]
pub enum SqlValue {
    String(String),
    I64(i64),
    U64(u64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
/// Only columns named in `allowed` may appear in the payload; anything
/// else is rejected rather than silently dropped.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    allowed: &[&str],
    id_column: &str,
    id_value: u64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    if let Some(key) = obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ErrorBadRequest(format!("Field not updatable: {}", key)));
    }

    // Build SET clause
    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);

    // Convert JSON values -> SqlValue
    for value in obj.values() {
        match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    values.push(SqlValue::Date(d));
                } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    values.push(SqlValue::DateTime(dt));
                } else {
                    values.push(SqlValue::String(s.clone()));
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    // WHERE id = ?
    values.push(SqlValue::U64(id_value));

    Ok(SqlUpdate { sql, values })
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALLOWED: &[&str] = &["first_name", "department"];

    #[test]
    fn builds_set_clause_from_payload_keys() {
        let update = build_update_sql(
            "profiles",
            &json!({"department": "Engineering"}),
            ALLOWED,
            "user_id",
            7,
        )
        .unwrap();

        assert_eq!(update.sql, "UPDATE profiles SET department = ? WHERE user_id = ?");
        assert_eq!(update.values.len(), 2);
        assert!(matches!(&update.values[0], SqlValue::String(s) if s == "Engineering"));
        assert!(matches!(update.values[1], SqlValue::U64(7)));
    }

    #[test]
    fn rejects_columns_outside_the_allowlist() {
        let result = build_update_sql(
            "profiles",
            &json!({"last_check_in": "2026-01-01T08:00:00"}),
            ALLOWED,
            "user_id",
            7,
        );

        assert!(result.is_err());
    }

    #[test]
    fn rejects_empty_and_non_object_payloads() {
        assert!(build_update_sql("profiles", &json!({}), ALLOWED, "user_id", 7).is_err());
        assert!(build_update_sql("profiles", &json!([1, 2]), ALLOWED, "user_id", 7).is_err());
    }

    #[test]
    fn date_strings_become_typed_values() {
        let update = build_update_sql(
            "visitors",
            &json!({"date": "2026-03-01"}),
            &["date"],
            "id",
            1,
        )
        .unwrap();

        assert!(matches!(update.values[0], SqlValue::Date(_)));
    }
}

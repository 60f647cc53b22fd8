use serde_json::Value;

use crate::scan::error::ScanError;

/// Display name used when a scanned code carries no location name.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendancePayload {
    pub location_id: String,
    pub location_name: String,
}

/// How the payload was established from the raw scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedPayload {
    /// The raw string parsed as a structured `{id, name}` record.
    Structured(AttendancePayload),
    /// The raw string was not a structured record and is used as the
    /// location id verbatim.
    RawFallback(AttendancePayload),
}

impl DecodedPayload {
    pub fn into_payload(self) -> AttendancePayload {
        match self {
            DecodedPayload::Structured(p) | DecodedPayload::RawFallback(p) => p,
        }
    }
}

/// QR generators are not all careful about types; accept a numeric id too.
fn field_as_string(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode a raw scanned string into an attendance payload.
///
/// Two-step attempt: parse as a structured record first, fall back to
/// treating the whole string as a location id. A record that parses but
/// carries no usable id is a bad code, not a raw id, and is rejected
/// rather than falling through.
pub fn decode_payload(raw: &str) -> Result<DecodedPayload, ScanError> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => {
            let location_id = field_as_string(&value, "id").ok_or(ScanError::InvalidPayload)?;
            let location_name =
                field_as_string(&value, "name").unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

            Ok(DecodedPayload::Structured(AttendancePayload {
                location_id,
                location_name,
            }))
        }
        Err(_) => {
            if raw.is_empty() {
                return Err(ScanError::InvalidPayload);
            }

            Ok(DecodedPayload::RawFallback(AttendancePayload {
                location_id: raw.to_string(),
                location_name: UNKNOWN_LOCATION.to_string(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_record_round_trips() {
        let decoded = decode_payload(r#"{"id":"loc1","name":"Lobby"}"#).unwrap();

        assert!(matches!(decoded, DecodedPayload::Structured(_)));
        assert_eq!(
            decoded.into_payload(),
            AttendancePayload {
                location_id: "loc1".to_string(),
                location_name: "Lobby".to_string(),
            }
        );
    }

    #[test]
    fn structured_record_without_name_gets_sentinel() {
        let payload = decode_payload(r#"{"id":"loc1"}"#).unwrap().into_payload();

        assert_eq!(payload.location_id, "loc1");
        assert_eq!(payload.location_name, UNKNOWN_LOCATION);
    }

    #[test]
    fn numeric_id_is_coerced() {
        let payload = decode_payload(r#"{"id":42,"name":"Gate"}"#)
            .unwrap()
            .into_payload();

        assert_eq!(payload.location_id, "42");
    }

    #[test]
    fn non_structured_string_falls_back_to_raw_id() {
        let decoded = decode_payload("room-42").unwrap();

        assert!(matches!(decoded, DecodedPayload::RawFallback(_)));
        assert_eq!(
            decoded.into_payload(),
            AttendancePayload {
                location_id: "room-42".to_string(),
                location_name: UNKNOWN_LOCATION.to_string(),
            }
        );
    }

    #[test]
    fn free_text_falls_back_too() {
        let payload = decode_payload("not json").unwrap().into_payload();

        assert_eq!(payload.location_id, "not json");
        assert_eq!(payload.location_name, UNKNOWN_LOCATION);
    }

    #[test]
    fn empty_input_is_invalid() {
        assert_eq!(decode_payload(""), Err(ScanError::InvalidPayload));
    }

    #[test]
    fn parsed_record_with_missing_or_empty_id_is_invalid() {
        // Parse succeeded, so there is no raw-id fallback for these.
        assert_eq!(
            decode_payload(r#"{"name":"Lobby"}"#),
            Err(ScanError::InvalidPayload)
        );
        assert_eq!(
            decode_payload(r#"{"id":"","name":"Lobby"}"#),
            Err(ScanError::InvalidPayload)
        );
        assert_eq!(decode_payload("123"), Err(ScanError::InvalidPayload));
    }
}

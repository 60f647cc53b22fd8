use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::scan::error::ScanError;
use crate::scan::payload::decode_payload;

/// The two attendance actions a scan can record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr, EnumString,
)]
pub enum AttendanceAction {
    #[serde(rename = "check-in")]
    #[strum(serialize = "check-in")]
    CheckIn,
    #[serde(rename = "check-out")]
    #[strum(serialize = "check-out")]
    CheckOut,
}

/// A user's last-known check-in/check-out pair.
///
/// At any instant a user is in exactly one of two states: OUT (no open
/// check-in) or IN (an open check-in with no later check-out).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceStatus {
    pub last_check_in: Option<DateTime<Utc>>,
    pub last_check_out: Option<DateTime<Utc>>,
}

/// An immutable fact appended to the event log on every successful scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceEvent {
    pub user_id: u64,
    pub kind: AttendanceAction,
    pub location_id: String,
    pub location_name: String,
    pub timestamp: DateTime<Utc>,
}

/// The decision plus the two write instructions the caller must apply:
/// append `event` to the log first, then write `status_patch` to the
/// profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    pub action: AttendanceAction,
    pub event: AttendanceEvent,
    pub status_patch: AttendanceStatus,
}

/// Classify the next scan against the current snapshot.
///
/// A missing check-in or a recorded check-out means the previous session,
/// if any, is closed, so the next scan opens a new one. No chronological
/// check between the two timestamps is made.
pub fn classify(status: &AttendanceStatus) -> AttendanceAction {
    if status.last_check_in.is_none() || status.last_check_out.is_some() {
        AttendanceAction::CheckIn
    } else {
        AttendanceAction::CheckOut
    }
}

/// Turn a raw scanned string plus the user's current snapshot into a
/// classified action and the writes required to record it.
///
/// The caller is expected to resolve identity before invoking; an absent
/// `user_id` still fails with `NotAuthenticated` rather than recording
/// an unattributed event.
///
/// Pure: no hidden memory, no side effects. Calling this twice with the
/// same snapshot yields the same outcome; the caller must re-read the
/// updated status before the next scan.
pub fn process(
    raw: &str,
    user_id: Option<u64>,
    status: &AttendanceStatus,
    now: DateTime<Utc>,
) -> Result<ScanOutcome, ScanError> {
    let payload = decode_payload(raw)?.into_payload();
    let user_id = user_id.ok_or(ScanError::NotAuthenticated)?;
    let action = classify(status);

    let status_patch = match action {
        // A new session: the previous check-out is cleared.
        AttendanceAction::CheckIn => AttendanceStatus {
            last_check_in: Some(now),
            last_check_out: None,
        },
        // Closing the open session: the check-in stays as its anchor.
        AttendanceAction::CheckOut => AttendanceStatus {
            last_check_in: status.last_check_in,
            last_check_out: Some(now),
        },
    };

    Ok(ScanOutcome {
        action,
        event: AttendanceEvent {
            user_id,
            kind: action,
            location_id: payload.location_id,
            location_name: payload.location_name,
            timestamp: now,
        },
        status_patch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::payload::UNKNOWN_LOCATION;
    use chrono::TimeZone;

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn status(
        last_check_in: Option<DateTime<Utc>>,
        last_check_out: Option<DateTime<Utc>>,
    ) -> AttendanceStatus {
        AttendanceStatus {
            last_check_in,
            last_check_out,
        }
    }

    #[test]
    fn fresh_user_classifies_as_check_in() {
        assert_eq!(classify(&status(None, None)), AttendanceAction::CheckIn);
    }

    #[test]
    fn open_session_classifies_as_check_out() {
        assert_eq!(
            classify(&status(Some(ts(100)), None)),
            AttendanceAction::CheckOut
        );
    }

    #[test]
    fn closed_session_classifies_as_check_in() {
        assert_eq!(
            classify(&status(Some(ts(100)), Some(ts(200)))),
            AttendanceAction::CheckIn
        );
    }

    #[test]
    fn orphan_check_out_classifies_as_check_in() {
        // The fourth truth-table cell: a check-out with no check-in still
        // means no open session.
        assert_eq!(
            classify(&status(None, Some(ts(200)))),
            AttendanceAction::CheckIn
        );
    }

    #[test]
    fn check_in_outcome_opens_a_session() {
        let now = ts(1_000);
        let outcome = process(
            r#"{"id":"loc1","name":"Lobby"}"#,
            Some(7),
            &status(None, None),
            now,
        )
        .unwrap();

        assert_eq!(outcome.action, AttendanceAction::CheckIn);
        assert_eq!(outcome.event.user_id, 7);
        assert_eq!(outcome.event.kind, AttendanceAction::CheckIn);
        assert_eq!(outcome.event.location_id, "loc1");
        assert_eq!(outcome.event.location_name, "Lobby");
        assert_eq!(outcome.event.timestamp, now);
        assert_eq!(outcome.status_patch, status(Some(now), None));
    }

    #[test]
    fn check_out_outcome_keeps_the_check_in_anchor() {
        let t0 = ts(1_000);
        let now = ts(2_000);
        let outcome = process(
            r#"{"id":"loc1","name":"Lobby"}"#,
            Some(7),
            &status(Some(t0), None),
            now,
        )
        .unwrap();

        assert_eq!(outcome.action, AttendanceAction::CheckOut);
        assert_eq!(outcome.status_patch, status(Some(t0), Some(now)));
    }

    #[test]
    fn raw_fallback_payload_proceeds_normally() {
        let outcome = process("not json", Some(7), &status(None, None), ts(1_000)).unwrap();

        assert_eq!(outcome.action, AttendanceAction::CheckIn);
        assert_eq!(outcome.event.location_id, "not json");
        assert_eq!(outcome.event.location_name, UNKNOWN_LOCATION);
    }

    #[test]
    fn empty_scan_fails_without_any_writes() {
        assert_eq!(
            process("", Some(7), &status(None, None), ts(1_000)),
            Err(ScanError::InvalidPayload)
        );
    }

    #[test]
    fn unresolved_identity_fails_before_any_writes() {
        assert_eq!(
            process("room-42", None, &status(None, None), ts(1_000)),
            Err(ScanError::NotAuthenticated)
        );
    }

    #[test]
    fn invalid_payload_wins_over_unresolved_identity() {
        // Mirrors the check order: decoding is attempted first.
        assert_eq!(
            process("", None, &status(None, None), ts(1_000)),
            Err(ScanError::InvalidPayload)
        );
    }

    #[test]
    fn process_is_deterministic_over_a_stale_snapshot() {
        let snapshot = status(Some(ts(100)), None);
        let now = ts(2_000);

        let first = process("room-42", Some(7), &snapshot, now).unwrap();
        let second = process("room-42", Some(7), &snapshot, now).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn action_wire_strings() {
        assert_eq!(AttendanceAction::CheckIn.as_ref(), "check-in");
        assert_eq!(AttendanceAction::CheckOut.to_string(), "check-out");
        assert_eq!(
            "check-in".parse::<AttendanceAction>().unwrap(),
            AttendanceAction::CheckIn
        );
    }
}

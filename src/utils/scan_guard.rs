use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Mutex;

/// Users with a scan currently being applied. Two scans reading the same
/// stale status snapshot would both classify as check-in, so the whole
/// read-classify-write sequence is a critical section keyed by user id.
static IN_FLIGHT: Lazy<Mutex<HashSet<u64>>> = Lazy::new(|| Mutex::new(HashSet::new()));

/// Held for the duration of one scan's read-classify-write sequence.
/// Dropping it re-arms scanning for the user.
pub struct ScanPermit {
    user_id: u64,
}

/// At most one permit per user at a time. `None` means a scan for this
/// user is already in flight.
pub fn acquire(user_id: u64) -> Option<ScanPermit> {
    let mut in_flight = IN_FLIGHT.lock().expect("scan guard poisoned");

    if in_flight.insert(user_id) {
        Some(ScanPermit { user_id })
    } else {
        None
    }
}

impl Drop for ScanPermit {
    fn drop(&mut self) {
        IN_FLIGHT
            .lock()
            .expect("scan guard poisoned")
            .remove(&self.user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_for_same_user_is_refused() {
        let permit = acquire(9001);
        assert!(permit.is_some());
        assert!(acquire(9001).is_none());
    }

    #[test]
    fn dropping_the_permit_re_arms_the_user() {
        let permit = acquire(9002);
        assert!(permit.is_some());
        drop(permit);
        assert!(acquire(9002).is_some());
    }

    #[test]
    fn users_are_serialized_independently() {
        let _a = acquire(9003).unwrap();
        assert!(acquire(9004).is_some());
    }
}

use chrono::{DateTime, Utc};

/// Current wall-clock time used for snapshot and history timestamps
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Milliseconds elapsed between two timestamps, zero if `later` is earlier
pub fn elapsed_millis(earlier: DateTime<Utc>, later: DateTime<Utc>) -> u64 {
    (later - earlier).num_milliseconds().max(0) as u64
}

//! Correlation identifiers for pending two-factor logins.
//!
//! A correlation id is a UUID v7: time-ordered, unguessable, and carrying
//! its own creation instant, so staleness can be judged from the
//! identifier alone without a separate timestamp column.

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

/// Mint a fresh correlation id stamped with the given instant.
pub fn new_correlation_id(now: DateTime<Utc>) -> Uuid {
    let ts = Timestamp::from_unix(
        NoContext,
        now.timestamp() as u64,
        now.timestamp_subsec_nanos(),
    );
    Uuid::new_v7(ts)
}

/// Extract the creation instant embedded in a correlation id.
///
/// Returns `None` for identifiers that carry no timestamp (wrong version),
/// which callers must treat as invalid rather than fresh.
pub fn issued_at(id: &Uuid) -> Option<DateTime<Utc>> {
    let ts = id.get_timestamp()?;
    let (secs, nanos) = ts.to_unix();
    DateTime::from_timestamp(secs as i64, nanos)
}

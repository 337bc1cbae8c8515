//! Time-partitioned file availability states.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The availability state of a file at a given instant.
///
/// For every non-removed file and every instant exactly one state holds,
/// and states advance monotonically pending → active → expired as time
/// passes `available_from` and then `available_to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// `available_from <= now < available_to`.
    Active,
    /// `now < available_from`.
    Pending,
    /// `now >= available_to`.
    Expired,
}

impl FileStatus {
    /// Compute the status of an availability window at `now`.
    pub fn at(from: DateTime<Utc>, to: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if now < from {
            Self::Pending
        } else if now < to {
            Self::Active
        } else {
            Self::Expired
        }
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status filter accepted by the file listing endpoint.
///
/// An unrecognized value parses to [`StatusFilter::All`] and leaves the
/// listing unfiltered, matching the behavior clients already rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    /// No status filtering.
    #[default]
    All,
    /// Only files currently inside their window.
    Active,
    /// Only files whose window has not opened.
    Pending,
    /// Only files whose window has closed.
    Expired,
}

impl StatusFilter {
    /// Parse a query-string value, falling back to `All` for unknown input.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "active" => Self::Active,
            "pending" => Self::Pending,
            "expired" => Self::Expired,
            _ => Self::All,
        }
    }

    /// The concrete status this filter selects, if any.
    pub fn status(&self) -> Option<FileStatus> {
        match self {
            Self::All => None,
            Self::Active => Some(FileStatus::Active),
            Self::Pending => Some(FileStatus::Pending),
            Self::Expired => Some(FileStatus::Expired),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_status_partitions_time() {
        let from = Utc::now();
        let to = from + Duration::hours(1);

        assert_eq!(
            FileStatus::at(from, to, from - Duration::seconds(1)),
            FileStatus::Pending
        );
        assert_eq!(FileStatus::at(from, to, from), FileStatus::Active);
        assert_eq!(
            FileStatus::at(from, to, to - Duration::seconds(1)),
            FileStatus::Active
        );
        // The upper bound is exclusive for Active.
        assert_eq!(FileStatus::at(from, to, to), FileStatus::Expired);
        assert_eq!(
            FileStatus::at(from, to, to + Duration::hours(5)),
            FileStatus::Expired
        );
    }

    #[test]
    fn test_status_is_monotonic() {
        let from = Utc::now();
        let to = from + Duration::hours(2);
        let instants = [
            from - Duration::hours(1),
            from,
            from + Duration::hours(1),
            to,
            to + Duration::hours(1),
        ];

        let mut seen_active = false;
        let mut seen_expired = false;
        for t in instants {
            match FileStatus::at(from, to, t) {
                FileStatus::Pending => {
                    assert!(!seen_active && !seen_expired);
                }
                FileStatus::Active => {
                    assert!(!seen_expired);
                    seen_active = true;
                }
                FileStatus::Expired => {
                    seen_expired = true;
                }
            }
        }
        assert!(seen_active && seen_expired);
    }

    #[test]
    fn test_unknown_filter_falls_back_to_all() {
        assert_eq!(StatusFilter::parse("active"), StatusFilter::Active);
        assert_eq!(StatusFilter::parse("EXPIRED"), StatusFilter::Expired);
        assert_eq!(StatusFilter::parse("bogus"), StatusFilter::All);
        assert_eq!(StatusFilter::parse(""), StatusFilter::All);
    }
}

//! Sorting types for the file listing endpoint.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Columns a file listing may be sorted by.
///
/// A closed set rather than a free-form column name, so the repository
/// never interpolates caller-controlled strings into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FileSortField {
    /// Sort by creation time.
    #[default]
    CreatedAt,
    /// Sort by display name.
    FileName,
}

impl FileSortField {
    /// Return the column name for this field.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::FileName => "name",
        }
    }
}

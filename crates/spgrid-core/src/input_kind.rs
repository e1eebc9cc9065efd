//! Mapping from SQL data type names to input representations
//!
//! The classification is a case-insensitive substring match checked in a
//! fixed priority order, so `"datetime2"` is a datetime and `"smalldatetime"`
//! is too, while `"date"` alone is a plain date.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator used by the storage format `YYYY-MM-DD HH:MM:SS`.
pub const STORAGE_SEPARATOR: char = ' ';
/// Separator used by the edit-control format `YYYY-MM-DDTHH:MM:SS`.
pub const EDIT_SEPARATOR: char = 'T';

const NUMERIC_MARKERS: [&str; 4] = ["int", "float", "decimal", "numeric"];

/// Input representation chosen for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Number,
    DateTime,
    Date,
    Checkbox,
    Text,
}

impl InputKind {
    /// Classify a SQL-like data type string.
    pub fn classify(sql_type: &str) -> Self {
        let t = sql_type.to_lowercase();
        if NUMERIC_MARKERS.iter().any(|marker| t.contains(marker)) {
            Self::Number
        } else if t.contains("datetime") {
            Self::DateTime
        } else if t.contains("date") {
            Self::Date
        } else if t.contains("bit") {
            Self::Checkbox
        } else {
            Self::Text
        }
    }

    /// Name of the matching HTML input type.
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::DateTime => "datetime-local",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::Text => "text",
        }
    }

    /// Format a stored cell value for display in a read-only cell.
    pub fn display(self, raw: &str) -> String {
        match self {
            Self::DateTime if !raw.is_empty() => to_storage_format(raw),
            _ => raw.to_string(),
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.input_type())
    }
}

/// `YYYY-MM-DD HH:MM:SS` -> `YYYY-MM-DDTHH:MM:SS`.
///
/// Only the first space is replaced.
pub fn to_edit_format(value: &str) -> String {
    value.replacen(STORAGE_SEPARATOR, "T", 1)
}

/// `YYYY-MM-DDTHH:MM:SS` -> `YYYY-MM-DD HH:MM:SS`.
///
/// Only the first `T` is replaced.
pub fn to_storage_format(value: &str) -> String {
    value.replacen(EDIT_SEPARATOR, " ", 1)
}

/// Edit-format timestamp (second precision, UTC) used to prefill new rows.
pub fn edit_format_at(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn now_in_edit_format() -> String {
    edit_format_at(Utc::now())
}

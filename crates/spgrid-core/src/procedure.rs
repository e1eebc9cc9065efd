//! Operation codes and response conventions of the remote procedure

use serde_json::Value;
use serde_repr::{Deserialize_repr, Serialize_repr};

/// Parameter key carrying the operation code inside the envelope.
pub const KIND_PARAM: &str = "@kind";
/// Parameter key for the comma-separated field list.
pub const COLUMNS_PARAM: &str = "columnsToInclude";
/// Parameter key for the target table.
pub const TABLE_PARAM: &str = "tableName";
/// Parameter key for the value list of insert/update.
pub const VALUES_PARAM: &str = "values";
/// Parameter key for the primary key of delete.
pub const ID_PARAM: &str = "Id";

/// Operation branch selected by the `@kind` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ProcedureKind {
    FetchRecords = 1,
    Insert = 2,
    Update = 3,
    Delete = 4,
    FetchSchema = 5,
    FetchOptions = 6,
}

impl ProcedureKind {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::FetchRecords),
            2 => Some(Self::Insert),
            3 => Some(Self::Update),
            4 => Some(Self::Delete),
            5 => Some(Self::FetchSchema),
            6 => Some(Self::FetchOptions),
            _ => None,
        }
    }

    /// Whether the response is judged by [`is_success_response`].
    pub fn is_mutation(self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete)
    }
}

impl std::fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::FetchRecords => "Fetch records",
            Self::Insert => "Insert",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::FetchSchema => "Fetch schema",
            Self::FetchOptions => "Fetch options",
        };
        f.write_str(name)
    }
}

/// Mutation responses succeed only as `[{"success": 1, ...}, ...]`.
///
/// `success` must be the integer 1; `true`, `"1"` or `1.0` are failures.
pub fn is_success_response(response: &Value) -> bool {
    response
        .as_array()
        .and_then(|rows| rows.first())
        .and_then(|first| first.get("success"))
        .and_then(Value::as_i64)
        == Some(1)
}

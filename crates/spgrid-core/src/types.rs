//! Core data model for SPGRID

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::InputKind;

/// Name of the primary key field, matched case-insensitively.
pub const PRIMARY_KEY_FIELD: &str = "id";

/// Whether `field` names the primary key column.
pub fn is_primary_key_field(field: &str) -> bool {
    field.eq_ignore_ascii_case(PRIMARY_KEY_FIELD)
}

/// Column metadata discovered from the schema fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Field name as returned by the server
    pub field: String,
    /// Header label (always the field name)
    pub label: String,
    /// Database type name, e.g. `varchar` or `decimal(18,2)`
    pub sql_type: String,
}

impl ColumnDescriptor {
    pub fn new(field: impl Into<String>, sql_type: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            label: field.clone(),
            field,
            sql_type: sql_type.into(),
        }
    }

    pub fn input_kind(&self) -> InputKind {
        InputKind::classify(&self.sql_type)
    }

    pub fn is_primary_key(&self) -> bool {
        is_primary_key_field(&self.field)
    }

    /// Case-insensitive field comparison.
    pub fn matches(&self, field: &str) -> bool {
        self.field.eq_ignore_ascii_case(field)
    }
}

/// Render a JSON primitive the way a grid cell shows it.
///
/// `null` becomes the empty string; nested values fall back to their JSON text.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Identifier of a record, derived from its primary key value
///
/// Keys compare by their text form, so ids `1` and `"1"` are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(pub String);

impl RecordKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of table data as returned by the record fetch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build a record from a JSON object; any other JSON shape yields `None`.
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Look up a field, preferring an exact name match over a case-insensitive one.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).or_else(|| {
            self.fields
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(field))
                .map(|(_, value)| value)
        })
    }

    /// Display text for a field; missing fields and nulls render empty.
    pub fn text(&self, field: &str) -> String {
        self.get(field).map(value_to_text).unwrap_or_default()
    }

    pub fn primary_key(&self) -> Option<&Value> {
        self.get(PRIMARY_KEY_FIELD).filter(|v| !v.is_null())
    }

    pub fn key(&self) -> Option<RecordKey> {
        self.primary_key().map(|v| RecordKey(value_to_text(v)))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One entry of a drop-down
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }

    /// Option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            text: value.clone(),
            value,
        }
    }
}

/// Loaded drop-down options, keyed by lower-cased field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsTable {
    entries: IndexMap<String, Vec<SelectOption>>,
}

impl OptionsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the options of a field, replacing any earlier list.
    pub fn insert(&mut self, field: &str, options: Vec<SelectOption>) {
        self.entries.insert(field.to_lowercase(), options);
    }

    pub fn get(&self, field: &str) -> Option<&[SelectOption]> {
        self.entries.get(&field.to_lowercase()).map(Vec::as_slice)
    }

    pub fn is_loaded(&self, field: &str) -> bool {
        self.entries.contains_key(&field.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A field name paired with the typed value read from its control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub field: String,
    pub value: Value,
}

impl FieldValue {
    pub fn new(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

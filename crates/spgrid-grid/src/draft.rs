//! Form state of the row being added or edited
//!
//! A draft holds one control per column, in schema order. It is created
//! when an add or edit starts and dropped on save success, cancel, or the
//! next full render.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use spgrid_core::{
    ColumnDescriptor, FieldValue, GridError, GridResult, InputKind, OptionsTable, Record,
    RecordKey, SelectOption, to_edit_format, to_storage_format,
};

use crate::policy::RenderPolicy;

const EDIT_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// What the draft will be saved as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftTarget {
    /// Transient row; saved with an insert.
    New,
    /// Existing record; saved with an update.
    Existing(RecordKey),
}

/// Kind of control rendered for a cell
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    ReadOnly,
    Input(InputKind),
    Select(Vec<SelectOption>),
}

/// Current value held by a control
#[derive(Debug, Clone, PartialEq)]
pub enum ControlValue {
    Text(String),
    Checked(bool),
    /// Read-only value, kept exactly as the record had it.
    Fixed(Value),
}

/// One editable cell
#[derive(Debug, Clone, PartialEq)]
pub struct Control {
    pub field: String,
    pub kind: ControlKind,
    pub value: ControlValue,
}

impl Control {
    fn resolve_kind(column: &ColumnDescriptor, policy: RenderPolicy, options: &OptionsTable) -> ControlKind {
        match policy {
            RenderPolicy::ReadOnlyKey => ControlKind::ReadOnly,
            RenderPolicy::Select => match options.get(&column.field) {
                Some(list) => ControlKind::Select(list.to_vec()),
                None => {
                    tracing::debug!(field = %column.field, "Options not loaded, using a text input");
                    ControlKind::Input(InputKind::Text)
                }
            },
            RenderPolicy::Input(kind) => ControlKind::Input(kind),
        }
    }

    /// Blank control of a new row.
    fn blank(column: &ColumnDescriptor, kind: ControlKind, now: &str) -> Self {
        let value = match &kind {
            ControlKind::ReadOnly => ControlValue::Fixed(Value::Null),
            ControlKind::Input(InputKind::Checkbox) => ControlValue::Checked(false),
            ControlKind::Input(InputKind::DateTime) => ControlValue::Text(now.to_string()),
            ControlKind::Input(_) => ControlValue::Text(String::new()),
            ControlKind::Select(options) => {
                ControlValue::Text(options.first().map(|o| o.value.clone()).unwrap_or_default())
            }
        };
        Self {
            field: column.field.clone(),
            kind,
            value,
        }
    }

    /// Control prefilled from the record's displayed value.
    fn prefilled(column: &ColumnDescriptor, kind: ControlKind, record: &Record) -> Self {
        let shown = column.input_kind().display(&record.text(&column.field));

        let (kind, value) = match kind {
            ControlKind::ReadOnly => {
                let raw = record.get(&column.field).cloned().unwrap_or(Value::Null);
                (ControlKind::ReadOnly, ControlValue::Fixed(raw))
            }
            ControlKind::Input(InputKind::Checkbox) => {
                let checked = shown.eq_ignore_ascii_case("true") || shown == "1";
                (ControlKind::Input(InputKind::Checkbox), ControlValue::Checked(checked))
            }
            ControlKind::Input(InputKind::DateTime) => (
                ControlKind::Input(InputKind::DateTime),
                ControlValue::Text(to_edit_format(&shown)),
            ),
            ControlKind::Input(kind) => (ControlKind::Input(kind), ControlValue::Text(shown)),
            ControlKind::Select(mut options) => {
                let found = options.iter().any(|o| o.value == shown);
                let selected = if found {
                    shown
                } else if !shown.is_empty() {
                    options.push(SelectOption::plain(shown.clone()));
                    shown
                } else {
                    options.first().map(|o| o.value.clone()).unwrap_or_default()
                };
                (ControlKind::Select(options), ControlValue::Text(selected))
            }
        };

        Self {
            field: column.field.clone(),
            kind,
            value,
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(self.kind, ControlKind::ReadOnly)
    }

    /// Text shown inside the control.
    pub fn text(&self) -> String {
        match &self.value {
            ControlValue::Text(text) => text.clone(),
            ControlValue::Checked(checked) => checked.to_string(),
            ControlValue::Fixed(value) => spgrid_core::value_to_text(value),
        }
    }

    /// Value sent to the server.
    ///
    /// Checkboxes give booleans, datetimes go back to storage format, integers
    /// that fit 64 bits become JSON numbers (empty is null), other numbers keep
    /// their exact digits as a string, everything else is the raw string.
    pub fn read(&self) -> Value {
        match (&self.kind, &self.value) {
            (_, ControlValue::Fixed(value)) => value.clone(),
            (_, ControlValue::Checked(checked)) => Value::Bool(*checked),
            (ControlKind::Input(InputKind::DateTime), ControlValue::Text(text)) => {
                Value::String(to_storage_format(text))
            }
            (ControlKind::Input(InputKind::Number), ControlValue::Text(text)) => number_value(text),
            (_, ControlValue::Text(text)) => Value::String(text.clone()),
        }
    }

    /// Apply user input to the control, validating it like the matching HTML control would.
    pub fn set(&mut self, raw: &str) -> GridResult<()> {
        let invalid = |reason: &str| GridError::InvalidValue {
            field: self.field.clone(),
            reason: reason.to_string(),
        };

        let value = match &self.kind {
            ControlKind::ReadOnly => return Err(GridError::ReadOnlyField(self.field.clone())),
            ControlKind::Input(InputKind::Checkbox) => match raw.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => ControlValue::Checked(true),
                "false" | "0" | "no" | "off" | "" => ControlValue::Checked(false),
                _ => return Err(invalid("expected a boolean")),
            },
            ControlKind::Input(InputKind::Number) => {
                let trimmed = raw.trim();
                if !trimmed.is_empty() && !is_decimal_literal(trimmed) {
                    return Err(invalid("expected a number"));
                }
                ControlValue::Text(trimmed.to_string())
            }
            ControlKind::Input(InputKind::DateTime) => {
                let edit = to_edit_format(raw.trim());
                let parses = EDIT_DATETIME_FORMATS
                    .iter()
                    .any(|fmt| NaiveDateTime::parse_from_str(&edit, fmt).is_ok());
                if !edit.is_empty() && !parses {
                    return Err(invalid("expected YYYY-MM-DDTHH:MM:SS"));
                }
                ControlValue::Text(edit)
            }
            ControlKind::Input(InputKind::Date) => {
                let trimmed = raw.trim();
                if !trimmed.is_empty() && NaiveDate::parse_from_str(trimmed, DATE_FORMAT).is_err() {
                    return Err(invalid("expected YYYY-MM-DD"));
                }
                ControlValue::Text(trimmed.to_string())
            }
            ControlKind::Input(InputKind::Text) => ControlValue::Text(raw.to_string()),
            ControlKind::Select(options) => {
                if !options.iter().any(|o| o.value == raw) {
                    return Err(invalid("not one of the options"));
                }
                ControlValue::Text(raw.to_string())
            }
        };

        self.value = value;
        Ok(())
    }
}

fn number_value(text: &str) -> Value {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(int) = trimmed.parse::<u64>() {
        return Value::from(int);
    }
    Value::String(trimmed.to_string())
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, as a number input accepts it.
///
/// A bare fraction such as `.5` or `5.` is allowed; `NaN`, `inf` and hex are not.
fn is_decimal_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;

    let digits = |i: &mut usize| {
        let start = *i;
        while *i < bytes.len() && bytes[*i].is_ascii_digit() {
            *i += 1;
        }
        *i - start
    };

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let mut mantissa = digits(&mut i);
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        mantissa += digits(&mut i);
    }
    if mantissa == 0 {
        return false;
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if digits(&mut i) == 0 {
            return false;
        }
    }
    i == bytes.len()
}

/// Uncommitted form state of one row
#[derive(Debug, Clone, PartialEq)]
pub struct RowDraft {
    pub target: DraftTarget,
    pub controls: Vec<Control>,
}

impl RowDraft {
    /// Draft of a transient new row; `now` prefills datetime controls.
    pub fn for_new(
        columns: &[ColumnDescriptor],
        policies: &[RenderPolicy],
        options: &OptionsTable,
        now: &str,
    ) -> Self {
        let controls = columns
            .iter()
            .zip(policies)
            .map(|(column, policy)| {
                Control::blank(column, Control::resolve_kind(column, *policy, options), now)
            })
            .collect();
        Self {
            target: DraftTarget::New,
            controls,
        }
    }

    pub fn for_record(
        key: RecordKey,
        record: &Record,
        columns: &[ColumnDescriptor],
        policies: &[RenderPolicy],
        options: &OptionsTable,
    ) -> Self {
        let controls = columns
            .iter()
            .zip(policies)
            .map(|(column, policy)| {
                Control::prefilled(column, Control::resolve_kind(column, *policy, options), record)
            })
            .collect();
        Self {
            target: DraftTarget::Existing(key),
            controls,
        }
    }

    pub fn is_new(&self) -> bool {
        self.target == DraftTarget::New
    }

    pub fn control(&self, field: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.field.eq_ignore_ascii_case(field))
    }

    /// Set a field from user input.
    pub fn set_value(&mut self, field: &str, raw: &str) -> GridResult<()> {
        self.controls
            .iter_mut()
            .find(|c| c.field.eq_ignore_ascii_case(field))
            .ok_or_else(|| GridError::UnknownField(field.to_string()))?
            .set(raw)
    }

    /// Ordered field/value pairs to save.
    ///
    /// The primary key is left out of inserts (the server assigns it) and
    /// carried unchanged in updates.
    pub fn field_values(&self) -> Vec<FieldValue> {
        self.controls
            .iter()
            .filter(|c| !(self.is_new() && c.is_read_only()))
            .map(|c| FieldValue::new(c.field.clone(), c.read()))
            .collect()
    }
}

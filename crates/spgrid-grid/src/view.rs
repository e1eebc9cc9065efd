//! Pure rendering of the grid into a UI description
//!
//! `render` is a function of the columns, the records and the current draft.
//! It never talks to the network; surfaces draw whatever it returns.

use serde::Serialize;
use spgrid_core::{ColumnDescriptor, InputKind, Record, RecordKey};

use crate::draft::{Control, DraftTarget, RowDraft};

/// Edit state of one rendered row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowEditState {
    Viewing,
    Editing,
    AddingNew,
}

/// Buttons offered in a row's action cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RowAction {
    Edit,
    Delete,
    Save,
    Cancel,
}

impl RowAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Delete => "Delete",
            Self::Save => "Save",
            Self::Cancel => "Cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellView {
    /// Read-only text of a viewed row.
    Display { text: String, kind: InputKind },
    /// Form control of the row being edited or added.
    Control(Control),
}

impl CellView {
    pub fn text(&self) -> String {
        match self {
            Self::Display { text, .. } => text.clone(),
            Self::Control(control) => control.text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    /// `None` for the transient add row.
    pub key: Option<RecordKey>,
    pub state: RowEditState,
    pub cells: Vec<CellView>,
    pub actions: Vec<RowAction>,
}

/// Everything a surface needs to draw one grid
#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub table_id: String,
    pub container_id: String,
    pub custom_class: Option<String>,
    /// Whether the add trigger is enabled.
    pub add_enabled: bool,
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
}

impl GridView {
    pub fn row(&self, key: &RecordKey) -> Option<&RowView> {
        self.rows.iter().find(|r| r.key.as_ref() == Some(key))
    }

    pub fn adding_row(&self) -> Option<&RowView> {
        self.rows.iter().find(|r| r.state == RowEditState::AddingNew)
    }
}

/// Identity and chrome of the grid, carried into every render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridFrame {
    pub table_id: String,
    pub container_id: String,
    pub custom_class: Option<String>,
}

/// Render one row.
///
/// Viewed rows show each column's display text; a row with a draft shows its
/// controls in column order.
pub fn render_row(
    columns: &[ColumnDescriptor],
    record: Option<&Record>,
    draft: Option<&RowDraft>,
) -> RowView {
    match draft {
        Some(draft) => {
            let state = match draft.target {
                DraftTarget::New => RowEditState::AddingNew,
                DraftTarget::Existing(_) => RowEditState::Editing,
            };
            RowView {
                key: record.and_then(Record::key),
                state,
                cells: draft.controls.iter().cloned().map(CellView::Control).collect(),
                actions: vec![RowAction::Save, RowAction::Cancel],
            }
        }
        None => {
            let cells = columns
                .iter()
                .map(|column| {
                    let kind = column.input_kind();
                    let raw = record.map(|r| r.text(&column.field)).unwrap_or_default();
                    CellView::Display {
                        text: kind.display(&raw),
                        kind,
                    }
                })
                .collect();
            RowView {
                key: record.and_then(Record::key),
                state: RowEditState::Viewing,
                cells,
                actions: vec![RowAction::Edit, RowAction::Delete],
            }
        }
    }
}

/// Render the whole grid. The transient add row comes first.
pub fn render(
    frame: &GridFrame,
    columns: &[ColumnDescriptor],
    records: &[Record],
    draft: Option<&RowDraft>,
    add_enabled: bool,
) -> GridView {
    let mut rows = Vec::with_capacity(records.len() + 1);

    if let Some(new_row) = draft.filter(|d| d.is_new()) {
        rows.push(render_row(columns, None, Some(new_row)));
    }

    rows.extend(records.iter().map(|record| {
        let editing = draft.filter(|d| match &d.target {
            DraftTarget::Existing(key) => record.key().as_ref() == Some(key),
            DraftTarget::New => false,
        });
        render_row(columns, Some(record), editing)
    }));

    GridView {
        table_id: frame.table_id.clone(),
        container_id: frame.container_id.clone(),
        custom_class: frame.custom_class.clone(),
        add_enabled,
        headers: columns.iter().map(|c| c.label.clone()).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::resolve_policies;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use spgrid_core::{GridOptions, OptionsTable};

    fn frame() -> GridFrame {
        GridFrame {
            table_id: "spgrid-test".into(),
            container_id: "root".into(),
            custom_class: None,
        }
    }

    fn columns() -> Vec<ColumnDescriptor> {
        vec![
            ColumnDescriptor::new("item", "varchar"),
            ColumnDescriptor::new("QtyBag", "int"),
        ]
    }

    #[test]
    fn renders_text_and_numeric_cells() {
        let records = vec![Record::from_json(json!({ "id": 1, "item": "A", "QtyBag": 5 })).unwrap()];
        let view = render(&frame(), &columns(), &records, None, true);

        assert_eq!(view.headers, vec!["item".to_string(), "QtyBag".to_string()]);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(
            view.rows[0].cells,
            vec![
                CellView::Display {
                    text: "A".into(),
                    kind: InputKind::Text
                },
                CellView::Display {
                    text: "5".into(),
                    kind: InputKind::Number
                },
            ]
        );
        assert_eq!(view.rows[0].actions, vec![RowAction::Edit, RowAction::Delete]);
    }

    #[test]
    fn datetime_cells_show_storage_format() {
        let cols = vec![ColumnDescriptor::new("RegDate", "datetime")];
        let records = vec![Record::from_json(json!({ "id": 1, "RegDate": "2024-05-06T07:08:09" })).unwrap()];
        let view = render(&frame(), &cols, &records, None, true);
        assert_eq!(view.rows[0].cells[0].text(), "2024-05-06 07:08:09");
    }

    #[test]
    fn add_row_renders_first_and_edit_row_in_place() {
        let cols = columns();
        let options = GridOptions::new("https://example.test", "sp", "item,QtyBag", "T", "root");
        let policies = resolve_policies(&cols, &options);
        let records = vec![
            Record::from_json(json!({ "id": 1, "item": "A", "QtyBag": 5 })).unwrap(),
            Record::from_json(json!({ "id": 2, "item": "B", "QtyBag": 6 })).unwrap(),
        ];

        let new_draft = RowDraft::for_new(&cols, &policies, &OptionsTable::new(), "");
        let view = render(&frame(), &cols, &records, Some(&new_draft), false);
        assert_eq!(view.rows.len(), 3);
        assert_eq!(view.rows[0].state, RowEditState::AddingNew);
        assert_eq!(view.rows[0].key, None);
        assert!(!view.add_enabled);

        let edit = RowDraft::for_record("2".into(), &records[1], &cols, &policies, &OptionsTable::new());
        let view = render(&frame(), &cols, &records, Some(&edit), true);
        assert_eq!(view.rows[0].state, RowEditState::Viewing);
        assert_eq!(view.rows[1].state, RowEditState::Editing);
        assert_eq!(view.rows[1].actions, vec![RowAction::Save, RowAction::Cancel]);
        assert_eq!(view.row(&"2".into()).unwrap().cells[0].text(), "B");
    }
}

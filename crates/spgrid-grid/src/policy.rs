//! How each column is edited, resolved once per schema load

use serde::{Deserialize, Serialize};
use spgrid_core::{ColumnDescriptor, GridOptions, InputKind};

/// Edit control policy of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderPolicy {
    /// The primary key; shown but never editable.
    ReadOnlyKey,
    /// Configured drop-down. Renders as a text input while its options are missing.
    Select,
    /// Input chosen from the column's data type.
    Input(InputKind),
}

impl RenderPolicy {
    /// The `id` rule comes first, then the select configuration, then the type.
    pub fn resolve(column: &ColumnDescriptor, options: &GridOptions) -> Self {
        if column.is_primary_key() {
            Self::ReadOnlyKey
        } else if options.select_field(&column.field).is_some() {
            Self::Select
        } else {
            Self::Input(column.input_kind())
        }
    }

    pub fn is_read_only(self) -> bool {
        matches!(self, Self::ReadOnlyKey)
    }
}

/// Policies aligned with `columns`.
pub fn resolve_policies(columns: &[ColumnDescriptor], options: &GridOptions) -> Vec<RenderPolicy> {
    columns
        .iter()
        .map(|column| RenderPolicy::resolve(column, options))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spgrid_core::SelectFieldConfig;

    #[test]
    fn id_wins_over_select_configuration() {
        let options = GridOptions::new("https://example.test", "sp", "id,item,qty", "T", "root")
            .with_select_field("ID", SelectFieldConfig::default())
            .with_select_field("Item", SelectFieldConfig::default());
        let columns = vec![
            ColumnDescriptor::new("Id", "int"),
            ColumnDescriptor::new("item", "varchar"),
            ColumnDescriptor::new("qty", "decimal"),
        ];

        assert_eq!(
            resolve_policies(&columns, &options),
            vec![
                RenderPolicy::ReadOnlyKey,
                RenderPolicy::Select,
                RenderPolicy::Input(InputKind::Number),
            ]
        );
    }
}

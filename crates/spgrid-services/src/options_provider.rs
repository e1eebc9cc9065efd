//! Drop-down options of select fields (`@kind` 6)
//!
//! Option rows carry the value under the upper-cased field name, e.g. rows
//! for `item` look like `{"ITEM": "Bolt M6"}`. The value doubles as the label.

use serde_json::Value;
use spgrid_client::{ProcedureParams, RemoteProcedureClient};
use spgrid_core::{
    GridError, GridOptions, GridResult, OptionsTable, ProcedureKind, SelectFieldConfig,
    SelectOption, value_to_text,
};

pub struct OptionsProvider {
    client: RemoteProcedureClient,
}

impl OptionsProvider {
    pub fn new(client: RemoteProcedureClient) -> Self {
        Self { client }
    }

    /// Fetch the options of one select field.
    ///
    /// An empty option list is reported as unavailable.
    #[tracing::instrument(skip(self, config), fields(table_name = %table_name))]
    pub async fn fetch_options(
        &self,
        table_name: &str,
        field: &str,
        config: &SelectFieldConfig,
    ) -> GridResult<Vec<SelectOption>> {
        let columns = config.columns_to_include.as_deref().unwrap_or(field);
        let params = ProcedureParams::new().columns(columns).table(table_name);

        let options = self
            .client
            .call(ProcedureKind::FetchOptions, params)
            .await
            .map(|reply| Self::parse_options(&reply, field, config.value_key.as_deref()))
            .unwrap_or_default();

        if options.is_empty() {
            tracing::warn!(field, "Could not obtain options, field falls back to a text input");
            return Err(GridError::OptionsUnavailable {
                field: field.to_string(),
            });
        }

        tracing::debug!(field, option_count = options.len(), "Options loaded");
        Ok(options)
    }

    /// Fetch options for every configured select field.
    ///
    /// Failures are logged and leave the field out of the table.
    pub async fn load_all(&self, options: &GridOptions) -> OptionsTable {
        let mut table = OptionsTable::new();
        for (field, config) in &options.select_fields {
            match self.fetch_options(&options.table_name, field, config).await {
                Ok(list) => table.insert(field, list),
                Err(e) => tracing::warn!(error = %e, "Select field left without options"),
            }
        }
        table
    }

    /// Turn option rows into `{value, text}` pairs.
    ///
    /// The value key is `value_key` when given, otherwise the upper-cased field
    /// name; a case-insensitive match and then the first string property are
    /// tried next. Rows with none of these are skipped.
    pub fn parse_options(reply: &Value, field: &str, value_key: Option<&str>) -> Vec<SelectOption> {
        let Some(rows) = reply.as_array() else {
            return Vec::new();
        };
        let key = value_key
            .map(str::to_string)
            .unwrap_or_else(|| field.to_uppercase());

        rows.iter()
            .filter_map(|row| {
                let object = row.as_object()?;
                let value = object
                    .get(&key)
                    .or_else(|| {
                        object
                            .iter()
                            .find(|(name, _)| name.eq_ignore_ascii_case(&key))
                            .map(|(_, v)| v)
                    })
                    .or_else(|| object.values().find(|v| v.is_string()))?;
                Some(SelectOption::plain(value_to_text(value)))
            })
            .collect()
    }
}

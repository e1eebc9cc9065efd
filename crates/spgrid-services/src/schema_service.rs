//! Schema discovery service
//!
//! Asks the procedure for the columns of a table (`@kind` 5) and turns the
//! `{ColumnName, DataType}` rows into column descriptors.

use serde_json::Value;
use spgrid_client::{ProcedureParams, RemoteProcedureClient};
use spgrid_core::{ColumnDescriptor, GridError, GridResult, ProcedureKind};

const COLUMN_NAME_KEY: &str = "ColumnName";
const DATA_TYPE_KEY: &str = "DataType";

/// Service for schema operations
pub struct SchemaService {
    client: RemoteProcedureClient,
}

impl SchemaService {
    pub fn new(client: RemoteProcedureClient) -> Self {
        Self { client }
    }

    /// Fetch the column list of `table_name`, restricted to `columns_to_include`.
    ///
    /// The returned order is the server's order and becomes the render order.
    #[tracing::instrument(skip(self), fields(table_name = %table_name))]
    pub async fn fetch_schema(
        &self,
        table_name: &str,
        columns_to_include: &str,
    ) -> GridResult<Vec<ColumnDescriptor>> {
        let params = ProcedureParams::new()
            .columns(columns_to_include)
            .table(table_name);

        let columns = self
            .client
            .call(ProcedureKind::FetchSchema, params)
            .await
            .and_then(|reply| Self::parse_schema(&reply));

        match columns {
            Some(columns) => {
                tracing::debug!(column_count = columns.len(), "Schema loaded");
                Ok(columns)
            }
            None => {
                tracing::error!("Could not obtain the schema");
                Err(GridError::SchemaUnavailable {
                    table: table_name.to_string(),
                })
            }
        }
    }

    /// Parse a schema reply; anything but an array is `None`.
    ///
    /// Rows without a column name are skipped, as are repeated names
    /// (compared case-insensitively).
    pub fn parse_schema(reply: &Value) -> Option<Vec<ColumnDescriptor>> {
        let rows = reply.as_array()?;
        let mut columns: Vec<ColumnDescriptor> = Vec::with_capacity(rows.len());

        for row in rows {
            let Some(field) = row.get(COLUMN_NAME_KEY).and_then(Value::as_str) else {
                tracing::warn!(row = %row, "Schema row without ColumnName skipped");
                continue;
            };
            if columns.iter().any(|c| c.matches(field)) {
                tracing::warn!(field, "Duplicate column in schema skipped");
                continue;
            }
            let sql_type = row
                .get(DATA_TYPE_KEY)
                .and_then(Value::as_str)
                .unwrap_or_default();
            columns.push(ColumnDescriptor::new(field, sql_type));
        }

        if columns.is_empty() {
            tracing::warn!("Schema reply contained no columns");
        }
        Some(columns)
    }
}

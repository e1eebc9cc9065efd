//! Insert, update and delete through the procedure (`@kind` 2, 3, 4)
//!
//! Writes send the field names as a comma-separated `columnsToInclude` and the
//! values under `values`. With [`ValueEncoding::Parameterized`] the values are
//! a typed JSON array aligned with the field list, so the server can bind them
//! as parameters. [`ValueEncoding::QuotedList`] keeps the older shape of one
//! string of single-quoted values for servers that splice it into SQL.

use serde_json::Value;
use spgrid_client::{ProcedureParams, RemoteProcedureClient};
use spgrid_core::{
    FieldValue, GridError, GridResult, ID_PARAM, ProcedureKind, VALUES_PARAM, ValueEncoding,
    is_success_response, value_to_text,
};

pub struct MutationService {
    client: RemoteProcedureClient,
    encoding: ValueEncoding,
}

impl MutationService {
    pub fn new(client: RemoteProcedureClient, encoding: ValueEncoding) -> Self {
        Self { client, encoding }
    }

    pub fn encoding(&self) -> ValueEncoding {
        self.encoding
    }

    #[tracing::instrument(skip(self, values), fields(table_name = %table_name))]
    pub async fn insert(&self, table_name: &str, values: &[FieldValue]) -> GridResult<()> {
        let params = self.write_params(table_name, values);
        self.submit(ProcedureKind::Insert, params).await
    }

    #[tracing::instrument(skip(self, values), fields(table_name = %table_name))]
    pub async fn update(&self, table_name: &str, values: &[FieldValue]) -> GridResult<()> {
        let params = self.write_params(table_name, values);
        self.submit(ProcedureKind::Update, params).await
    }

    #[tracing::instrument(skip(self), fields(table_name = %table_name))]
    pub async fn delete(&self, table_name: &str, id: &Value) -> GridResult<()> {
        tracing::debug!(id = %id, "Deleting record");
        let params = ProcedureParams::new()
            .with(ID_PARAM, id.clone())
            .table(table_name);
        self.submit(ProcedureKind::Delete, params).await
    }

    /// Parameters of an insert or update for the configured encoding.
    pub fn write_params(&self, table_name: &str, values: &[FieldValue]) -> ProcedureParams {
        let fields = values
            .iter()
            .map(|fv| fv.field.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let encoded = match self.encoding {
            ValueEncoding::Parameterized => {
                Value::Array(values.iter().map(|fv| fv.value.clone()).collect())
            }
            ValueEncoding::QuotedList => Value::String(encode_quoted_list(values)),
        };

        ProcedureParams::new()
            .columns(&fields)
            .with(VALUES_PARAM, encoded)
            .table(table_name)
    }

    async fn submit(&self, kind: ProcedureKind, params: ProcedureParams) -> GridResult<()> {
        match self.client.call(kind, params).await {
            None => Err(GridError::Transport(format!("{} returned no response", kind))),
            Some(reply) if is_success_response(&reply) => {
                tracing::info!(operation = %kind, "Mutation succeeded");
                Ok(())
            }
            Some(reply) => {
                tracing::warn!(operation = %kind, reply = %reply, "Mutation rejected");
                Err(GridError::OperationRejected { operation: kind })
            }
        }
    }
}

/// `'a','b','true'` form of a value list.
///
/// Embedded single quotes are doubled so each entry stays one SQL literal.
pub fn encode_quoted_list(values: &[FieldValue]) -> String {
    values
        .iter()
        .map(|fv| format!("'{}'", value_to_text(&fv.value).replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn service(encoding: ValueEncoding) -> MutationService {
        let client = RemoteProcedureClient::new(
            "https://example.test/exec",
            "sp",
            Arc::new(spgrid_client::HttpTransport::new()),
        )
        .unwrap();
        MutationService::new(client, encoding)
    }

    fn values() -> Vec<FieldValue> {
        vec![
            FieldValue::new("item", json!("O'Brien")),
            FieldValue::new("QtyBag", json!(5)),
            FieldValue::new("Verificada", json!(true)),
            FieldValue::new("RegDate", json!("2024-01-02 03:04:05")),
        ]
    }

    #[test]
    fn parameterized_values_stay_typed() {
        let params = service(ValueEncoding::Parameterized).write_params("Inventory", &values());
        assert_eq!(
            params.get("columnsToInclude"),
            Some(&json!("item,QtyBag,Verificada,RegDate"))
        );
        assert_eq!(
            params.get("values"),
            Some(&json!(["O'Brien", 5, true, "2024-01-02 03:04:05"]))
        );
        assert_eq!(params.get("tableName"), Some(&json!("Inventory")));
    }

    #[test]
    fn quoted_list_quotes_every_value() {
        let params = service(ValueEncoding::QuotedList).write_params("Inventory", &values());
        assert_eq!(
            params.get("values"),
            Some(&json!("'O''Brien','5','true','2024-01-02 03:04:05'"))
        );
    }

    #[test]
    fn quoted_list_renders_null_as_empty() {
        assert_eq!(
            encode_quoted_list(&[FieldValue::new("a", Value::Null), FieldValue::new("b", json!(""))]),
            "'',''"
        );
    }
}

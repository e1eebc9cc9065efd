//! In-memory record set backed by the record fetch (`@kind` 1)

use serde_json::Value;
use spgrid_client::{ProcedureParams, RemoteProcedureClient};
use spgrid_core::{GridError, GridResult, ProcedureKind, Record, RecordKey};

/// Holds the current records of one grid
///
/// The set is only ever replaced as a whole: a failed fetch leaves the
/// previous records in place.
pub struct RecordStore {
    client: RemoteProcedureClient,
    records: Vec<Record>,
    /// Number of successful fetches so far
    generation: u64,
}

impl RecordStore {
    pub fn new(client: RemoteProcedureClient) -> Self {
        Self {
            client,
            records: Vec::new(),
            generation: 0,
        }
    }

    #[tracing::instrument(skip(self), fields(table_name = %table_name))]
    pub async fn fetch_records(
        &mut self,
        table_name: &str,
        columns_to_include: &str,
    ) -> GridResult<&[Record]> {
        let params = ProcedureParams::new()
            .columns(columns_to_include)
            .table(table_name);

        let records = self
            .client
            .call(ProcedureKind::FetchRecords, params)
            .await
            .and_then(Self::parse_records);

        match records {
            Some(records) => {
                tracing::debug!(record_count = records.len(), "Records loaded");
                self.records = records;
                self.generation += 1;
                Ok(&self.records)
            }
            None => {
                tracing::error!("Could not obtain the records");
                Err(GridError::RecordsUnavailable {
                    table: table_name.to_string(),
                })
            }
        }
    }

    /// Parse a record reply; anything but an array is `None`.
    pub fn parse_records(reply: Value) -> Option<Vec<Record>> {
        let Value::Array(rows) = reply else {
            return None;
        };

        let records = rows
            .into_iter()
            .filter_map(|row| {
                let record = Record::from_json(row);
                if record.is_none() {
                    tracing::warn!("Non-object record row skipped");
                }
                record
            })
            .collect();
        Some(records)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn find(&self, key: &RecordKey) -> Option<&Record> {
        self.records.iter().find(|r| r.key().as_ref() == Some(key))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

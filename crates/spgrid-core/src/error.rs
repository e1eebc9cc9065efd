//! Error types for SPGRID

use thiserror::Error;

use crate::ProcedureKind;

/// Core error type for grid operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// The endpoint could not be reached or did not answer with JSON.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Schema fetch produced nothing usable; records are never requested.
    #[error("Schema unavailable for table {table}")]
    SchemaUnavailable { table: String },

    /// Record fetch produced nothing usable; the previous render is kept.
    #[error("Records unavailable for table {table}")]
    RecordsUnavailable { table: String },

    /// The server answered but without a success indicator.
    #[error("{operation} rejected by the server")]
    OperationRejected { operation: ProcedureKind },

    /// Non-fatal: the field renders as a text input instead.
    #[error("Options unavailable for field {field}")]
    OptionsUnavailable { field: String },

    #[error("Another row is already being edited")]
    EditInProgress,

    #[error("No row is being edited")]
    NoActiveEdit,

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field is read-only: {0}")]
    ReadOnlyField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Record has no primary key field")]
    MissingPrimaryKey,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for grid operations
pub type GridResult<T> = std::result::Result<T, GridError>;

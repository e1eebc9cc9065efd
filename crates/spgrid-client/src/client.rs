use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use spgrid_core::{COLUMNS_PARAM, GridOptions, KIND_PARAM, ProcedureKind, TABLE_PARAM};
use url::Url;

use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpTransport, ProcedureTransport};

/// Extra parameters of a call, merged after `@kind`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcedureParams(Map<String, Value>);

impl ProcedureParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn table(self, table_name: &str) -> Self {
        self.with(TABLE_PARAM, table_name)
    }

    pub fn columns(self, columns: &str) -> Self {
        self.with(COLUMNS_PARAM, columns)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

/// Request body of every call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureEnvelope {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Parameters")]
    pub parameters: Map<String, Value>,
}

impl ProcedureEnvelope {
    /// `@kind` is written first; an `@kind` inside `params` cannot override it.
    pub fn new(name: impl Into<String>, kind: ProcedureKind, params: ProcedureParams) -> Self {
        let mut parameters = Map::new();
        parameters.insert(KIND_PARAM.to_string(), Value::from(kind.code()));
        for (key, value) in params.into_map() {
            if key != KIND_PARAM {
                parameters.insert(key, value);
            }
        }
        Self {
            name: name.into(),
            parameters,
        }
    }

    pub fn kind(&self) -> Option<ProcedureKind> {
        self.parameters
            .get(KIND_PARAM)
            .and_then(Value::as_u64)
            .and_then(|code| u8::try_from(code).ok())
            .and_then(ProcedureKind::from_code)
    }
}

/// Client of the stored-procedure endpoint
///
/// One client per grid instance; cloning shares the transport.
#[derive(Clone)]
pub struct RemoteProcedureClient {
    endpoint: Url,
    procedure_name: String,
    transport: Arc<dyn ProcedureTransport>,
}

impl RemoteProcedureClient {
    pub fn new(
        endpoint: &str,
        procedure_name: impl Into<String>,
        transport: Arc<dyn ProcedureTransport>,
    ) -> ClientResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| ClientError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        Ok(Self {
            endpoint,
            procedure_name: procedure_name.into(),
            transport,
        })
    }

    /// Client over HTTP for the endpoint and procedure named in `options`.
    pub fn from_options(options: &GridOptions) -> ClientResult<Self> {
        Self::new(&options.api_url, options.sp_name.clone(), Arc::new(HttpTransport::new()))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn procedure_name(&self) -> &str {
        &self.procedure_name
    }

    pub fn envelope(&self, kind: ProcedureKind, params: ProcedureParams) -> ProcedureEnvelope {
        ProcedureEnvelope::new(self.procedure_name.clone(), kind, params)
    }

    /// Issue one call and report failures as errors.
    pub async fn try_call(&self, kind: ProcedureKind, params: ProcedureParams) -> ClientResult<Value> {
        let envelope = self.envelope(kind, params);
        let body = serde_json::to_value(&envelope)?;
        tracing::debug!(kind = kind.code(), payload = %body, "Calling procedure");
        self.transport.post_json(&self.endpoint, &body).await
    }

    /// Issue one call; any failure is logged and yields `None`.
    ///
    /// A literal JSON `null` reply is treated the same as a failure.
    pub async fn call(&self, kind: ProcedureKind, params: ProcedureParams) -> Option<Value> {
        match self.try_call(kind, params).await {
            Ok(Value::Null) => {
                tracing::warn!(kind = kind.code(), procedure = %self.procedure_name, "Procedure returned null");
                None
            }
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    kind = kind.code(),
                    procedure = %self.procedure_name,
                    endpoint = %self.endpoint,
                    "Procedure call failed"
                );
                None
            }
        }
    }
}

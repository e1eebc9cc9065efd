//! Transport seam between the procedure client and the network

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::Value;
use url::Url;

use crate::error::{ClientError, ClientResult};

/// Posts a JSON body to an endpoint and returns the decoded JSON reply.
///
/// The HTTP status is not interpreted: any reply whose body parses as JSON
/// is handed back to the caller.
#[async_trait]
pub trait ProcedureTransport: Send + Sync {
    async fn post_json(&self, endpoint: &Url, body: &Value) -> ClientResult<Value>;
}

/// `reqwest`-backed transport
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProcedureTransport for HttpTransport {
    async fn post_json(&self, endpoint: &Url, body: &Value) -> ClientResult<Value> {
        let response = self
            .client
            .post(endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(serde_json::to_vec(body)?)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        tracing::debug!(status = %status, bytes = bytes.len(), "Procedure response received");

        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode {
            status: status.as_u16(),
            reason: e.to_string(),
        })
    }
}

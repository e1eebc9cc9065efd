//! Common test utilities and mocks

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use spgrid_client::{ClientError, ClientResult, ProcedureTransport, RemoteProcedureClient};
use spgrid_core::ProcedureKind;
use url::Url;

pub const ENDPOINT: &str = "https://example.test/api/exec";
pub const PROCEDURE: &str = "sp_inventory";

/// Mock transport scripted per operation code.
///
/// Each kind owns a queue of replies: replies are consumed in order and the
/// last one repeats. `None` entries simulate a transport fault. Every posted
/// body is logged for assertions.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<u8, VecDeque<Option<Value>>>>,
    log: Mutex<Vec<Value>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, kind: ProcedureKind, reply: Value) -> Self {
        self.replies.lock().entry(kind.code()).or_default().push_back(Some(reply));
        self
    }

    pub fn with_failure(self, kind: ProcedureKind) -> Self {
        self.replies.lock().entry(kind.code()).or_default().push_back(None);
        self
    }

    pub fn calls(&self) -> Vec<Value> {
        self.log.lock().clone()
    }

    /// Parameters of every call with the given kind.
    pub fn parameters_of(&self, kind: ProcedureKind) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|body| kind_of(body) == Some(kind.code()))
            .map(|body| body["Parameters"].clone())
            .collect()
    }

    pub fn count_of(&self, kind: ProcedureKind) -> usize {
        self.parameters_of(kind).len()
    }
}

fn kind_of(body: &Value) -> Option<u8> {
    body["Parameters"]["@kind"].as_u64().and_then(|k| u8::try_from(k).ok())
}

#[async_trait]
impl ProcedureTransport for MockTransport {
    async fn post_json(&self, _endpoint: &Url, body: &Value) -> ClientResult<Value> {
        self.log.lock().push(body.clone());

        let kind = kind_of(body).ok_or_else(|| ClientError::Request("missing @kind".into()))?;
        let mut replies = self.replies.lock();
        let queue = replies
            .get_mut(&kind)
            .ok_or_else(|| ClientError::Request(format!("no reply scripted for kind {}", kind)))?;

        let reply = if queue.len() > 1 {
            queue.pop_front().flatten()
        } else {
            queue.front().cloned().flatten()
        };
        reply.ok_or_else(|| ClientError::Request("connection reset".into()))
    }
}

pub fn client(transport: Arc<MockTransport>) -> RemoteProcedureClient {
    RemoteProcedureClient::new(ENDPOINT, PROCEDURE, transport).expect("valid endpoint")
}

//! Common test utilities and mocks

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use spgrid_client::{ClientError, ClientResult, ProcedureTransport, RemoteProcedureClient};
use spgrid_core::{GridOptions, ProcedureKind, SelectFieldConfig};
use spgrid_grid::{
    GridController, GridSurface, GridView, Notification, UserInteraction, WidgetOptions,
};
use url::Url;

pub const ENDPOINT: &str = "https://example.test/api/exec";
pub const PROCEDURE: &str = "sp_inventory";
pub const TABLE: &str = "Inventory";

/// Mock transport scripted per operation code.
///
/// Replies for a kind are consumed in order and the last one repeats. `None`
/// entries simulate a transport fault.
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
        self.push(kind, Some(reply));
        self
    }

    pub fn with_failure(self, kind: ProcedureKind) -> Self {
        self.push(kind, None);
        self
    }

    /// Script more replies after the controller is built.
    pub fn push(&self, kind: ProcedureKind, reply: Option<Value>) {
        self.replies.lock().entry(kind.code()).or_default().push_back(reply);
    }

    /// Replace every scripted reply of `kind`.
    pub fn set_reply(&self, kind: ProcedureKind, reply: Value) {
        self.replace(kind, Some(reply));
    }

    /// Make every further call of `kind` fail.
    pub fn set_failure(&self, kind: ProcedureKind) {
        self.replace(kind, None);
    }

    fn replace(&self, kind: ProcedureKind, reply: Option<Value>) {
        let mut replies = self.replies.lock();
        let queue = replies.entry(kind.code()).or_default();
        queue.clear();
        queue.push_back(reply);
    }

    pub fn calls(&self) -> Vec<Value> {
        self.log.lock().clone()
    }

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

    pub fn clear_log(&self) {
        self.log.lock().clear();
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

/// Surface that records what it was asked to draw
#[derive(Default)]
pub struct RecordingSurface {
    pub events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Initialize(GridView),
    Update(GridView),
    Teardown,
}

impl GridSurface for RecordingSurface {
    fn initialize(&mut self, _options: &WidgetOptions, view: &GridView) {
        self.events.lock().push(SurfaceEvent::Initialize(view.clone()));
    }

    fn update(&mut self, view: &GridView) {
        self.events.lock().push(SurfaceEvent::Update(view.clone()));
    }

    fn teardown(&mut self) {
        self.events.lock().push(SurfaceEvent::Teardown);
    }
}

/// Interaction that answers confirmations from a fixed reply
pub struct ScriptedInteraction {
    pub confirm_reply: bool,
    pub notifications: Mutex<Vec<Notification>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedInteraction {
    pub fn answering(confirm_reply: bool) -> Self {
        Self {
            confirm_reply,
            notifications: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .iter()
            .map(|n| n.message().to_string())
            .collect()
    }
}

impl UserInteraction for ScriptedInteraction {
    fn notify(&self, notification: &Notification) {
        self.notifications.lock().push(*notification);
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().push(prompt.to_string());
        self.confirm_reply
    }
}

pub fn client(transport: Arc<MockTransport>) -> RemoteProcedureClient {
    RemoteProcedureClient::new(ENDPOINT, PROCEDURE, transport).expect("valid endpoint")
}

pub fn grid_options() -> GridOptions {
    GridOptions::new(ENDPOINT, PROCEDURE, "item,QtyBag,Verificada,RegDate", TABLE, "grid-root")
        .with_select_field("item", SelectFieldConfig::default())
}

pub fn schema_reply() -> Value {
    json!([
        { "ColumnName": "id", "DataType": "int" },
        { "ColumnName": "item", "DataType": "varchar" },
        { "ColumnName": "QtyBag", "DataType": "int" },
        { "ColumnName": "Verificada", "DataType": "bit" },
        { "ColumnName": "RegDate", "DataType": "datetime" }
    ])
}

pub fn records_reply() -> Value {
    json!([
        { "id": 1, "item": "Bolt", "QtyBag": 5, "Verificada": true, "RegDate": "2024-03-01T09:00:00" },
        { "id": 2, "item": "Nut", "QtyBag": 8, "Verificada": false, "RegDate": "2024-03-02 10:30:00" }
    ])
}

pub fn options_reply() -> Value {
    json!([{ "ITEM": "Bolt" }, { "ITEM": "Nut" }, { "ITEM": "Washer" }])
}

/// Transport answering schema, records and options with the fixtures above.
pub fn standard_transport() -> MockTransport {
    MockTransport::new()
        .with_reply(ProcedureKind::FetchSchema, schema_reply())
        .with_reply(ProcedureKind::FetchRecords, records_reply())
        .with_reply(ProcedureKind::FetchOptions, options_reply())
}

pub struct Harness {
    pub controller: GridController,
    pub transport: Arc<MockTransport>,
    pub interaction: Arc<ScriptedInteraction>,
    pub surface_events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl Harness {
    pub fn build(transport: MockTransport, options: GridOptions, confirm_reply: bool) -> Self {
        let transport = Arc::new(transport);
        let interaction = Arc::new(ScriptedInteraction::answering(confirm_reply));
        let surface = RecordingSurface::default();
        let surface_events = surface.events.clone();

        let controller = GridController::new(
            options,
            client(transport.clone()),
            interaction.clone(),
            Box::new(surface),
        )
        .expect("valid options");

        Self {
            controller,
            transport,
            interaction,
            surface_events,
        }
    }

    /// Standard fixtures, initialized, with the call log cleared.
    pub async fn ready(confirm_reply: bool) -> Self {
        let mut harness = Self::build(standard_transport(), grid_options(), confirm_reply);
        harness.controller.initialize().await.expect("grid initializes");
        harness.transport.clear_log();
        harness
    }

    pub fn last_view(&self) -> Option<GridView> {
        self.surface_events.lock().iter().rev().find_map(|event| match event {
            SurfaceEvent::Initialize(view) | SurfaceEvent::Update(view) => Some(view.clone()),
            SurfaceEvent::Teardown => None,
        })
    }
}

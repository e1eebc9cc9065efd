//! Grid controller: owns one grid instance and its row edit state machine
//!
//! ```text
//! Viewing -> Editing   -> Viewing (save ok, full refetch) | Editing (save rejected)
//! Viewing -> AddingNew -> removed (cancel) | Viewing (save ok, full refetch)
//! ```
//!
//! At most one row holds a draft at a time. The add trigger is disabled while
//! the transient add row exists and enabled again when its save completes
//! (either way) or when it is cancelled.

use std::sync::Arc;

use spgrid_client::RemoteProcedureClient;
use spgrid_core::{
    ColumnDescriptor, GridError, GridOptions, GridResult, OptionsTable, ProcedureKind, Record,
    RecordKey, now_in_edit_format,
};
use spgrid_services::{MutationService, OptionsProvider, RecordStore, SchemaService};
use uuid::Uuid;

use crate::draft::{DraftTarget, RowDraft};
use crate::interaction::{DELETE_CONFIRMATION, Notification, UserInteraction};
use crate::policy::{RenderPolicy, resolve_policies};
use crate::view::{GridFrame, GridView, render};
use crate::widget::{GridSurface, WidgetHandle, WidgetOptions};

/// Result of a delete request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined the confirmation; nothing was sent.
    Declined,
}

pub struct GridController {
    options: GridOptions,
    schema: SchemaService,
    store: RecordStore,
    options_provider: OptionsProvider,
    mutations: MutationService,
    interaction: Arc<dyn UserInteraction>,
    widget: WidgetHandle,
    frame: GridFrame,
    columns: Vec<ColumnDescriptor>,
    policies: Vec<RenderPolicy>,
    select_options: OptionsTable,
    draft: Option<RowDraft>,
    add_enabled: bool,
}

impl GridController {
    /// Build a controller for one grid. Nothing is fetched until [`initialize`](Self::initialize).
    pub fn new(
        options: GridOptions,
        client: RemoteProcedureClient,
        interaction: Arc<dyn UserInteraction>,
        surface: Box<dyn GridSurface>,
    ) -> GridResult<Self> {
        options.validate()?;

        let frame = GridFrame {
            table_id: format!("spgrid-{}", Uuid::new_v4().simple()),
            container_id: options.container_id.clone(),
            custom_class: Some(options.custom_class.clone()).filter(|c| !c.is_empty()),
        };
        let widget = WidgetHandle::new(surface, WidgetOptions::from(&options));

        Ok(Self {
            schema: SchemaService::new(client.clone()),
            store: RecordStore::new(client.clone()),
            options_provider: OptionsProvider::new(client.clone()),
            mutations: MutationService::new(client, options.value_encoding),
            options,
            interaction,
            widget,
            frame,
            columns: Vec::new(),
            policies: Vec::new(),
            select_options: OptionsTable::new(),
            draft: None,
            add_enabled: true,
        })
    }

    /// Load select options, then the schema, then the records, and mount the grid.
    ///
    /// Options are loaded first so select cells never render before their
    /// options are known. A schema failure stops here and no records are
    /// requested.
    #[tracing::instrument(skip(self), fields(table_name = %self.options.table_name, table_id = %self.frame.table_id))]
    pub async fn initialize(&mut self) -> GridResult<()> {
        self.widget.teardown();

        self.select_options = self.options_provider.load_all(&self.options).await;

        let columns = self
            .schema
            .fetch_schema(&self.options.table_name, &self.options.schema_columns)
            .await?;
        self.policies = resolve_policies(&columns, &self.options);
        self.columns = columns;
        tracing::info!(column_count = self.columns.len(), "Schema loaded");

        self.refresh().await
    }

    /// Refetch the records and re-render the whole grid.
    ///
    /// On success every draft is discarded. On failure the previous render stays.
    pub async fn refresh(&mut self) -> GridResult<()> {
        self.store
            .fetch_records(&self.options.table_name, &self.options.schema_columns)
            .await?;

        self.draft = None;
        self.add_enabled = true;
        let view = self.view();
        self.widget.initialize(&view);
        Ok(())
    }

    /// Current UI description.
    pub fn view(&self) -> GridView {
        render(
            &self.frame,
            &self.columns,
            self.store.records(),
            self.draft.as_ref(),
            self.add_enabled,
        )
    }

    /// Insert the transient add row at the top of the grid.
    ///
    /// Does nothing while an add row already exists.
    pub fn begin_add(&mut self) -> GridResult<()> {
        match self.draft.as_ref().map(|d| &d.target) {
            Some(DraftTarget::New) => {
                tracing::debug!("Add row already present");
                return Ok(());
            }
            Some(DraftTarget::Existing(_)) => return Err(GridError::EditInProgress),
            None => {}
        }

        self.draft = Some(RowDraft::for_new(
            &self.columns,
            &self.policies,
            &self.select_options,
            &now_in_edit_format(),
        ));
        self.add_enabled = false;
        self.redraw();
        Ok(())
    }

    /// Switch the row of `key` into edit mode.
    pub fn begin_edit(&mut self, key: &RecordKey) -> GridResult<()> {
        match self.draft.as_ref().map(|d| &d.target) {
            Some(DraftTarget::Existing(current)) if current == key => return Ok(()),
            Some(_) => return Err(GridError::EditInProgress),
            None => {}
        }

        let record = self.record(key)?;
        self.draft = Some(RowDraft::for_record(
            key.clone(),
            record,
            &self.columns,
            &self.policies,
            &self.select_options,
        ));
        self.redraw();
        Ok(())
    }

    /// Change one field of the row being edited or added.
    pub fn set_field(&mut self, field: &str, raw: &str) -> GridResult<()> {
        self.draft
            .as_mut()
            .ok_or(GridError::NoActiveEdit)?
            .set_value(field, raw)?;
        self.redraw();
        Ok(())
    }

    /// Persist the draft with an insert or update.
    ///
    /// On success the user is notified and the grid refetched. On failure the
    /// user is notified and the row stays in its edit state.
    ///
    /// The add trigger is enabled again once an insert completes, even when it
    /// failed and the add row is still shown; `begin_add` is a no-op then.
    pub async fn save(&mut self) -> GridResult<()> {
        let draft = self.draft.as_ref().ok_or(GridError::NoActiveEdit)?;
        let values = draft.field_values();
        let table_name = self.options.table_name.clone();

        let (operation, result) = match &draft.target {
            DraftTarget::New => {
                let result = self.mutations.insert(&table_name, &values).await;
                self.add_enabled = true;
                (ProcedureKind::Insert, result)
            }
            DraftTarget::Existing(key) => {
                tracing::debug!(key = %key, "Saving edited row");
                (
                    ProcedureKind::Update,
                    self.mutations.update(&table_name, &values).await,
                )
            }
        };

        match result {
            Ok(()) => {
                self.interaction.notify(&Notification::success(operation));
                self.draft = None;
                self.reload_after_mutation().await;
                Ok(())
            }
            Err(e) => {
                self.interaction.notify(&Notification::failure(operation));
                self.redraw();
                Err(e)
            }
        }
    }

    /// Leave the current edit.
    ///
    /// A cancelled add row is removed locally; a cancelled edit refetches the
    /// records. When that refetch fails the draft is still dropped and the
    /// records already held are shown again.
    pub async fn cancel(&mut self) -> GridResult<()> {
        let draft = self.draft.take().ok_or(GridError::NoActiveEdit)?;

        match draft.target {
            DraftTarget::New => {
                self.add_enabled = true;
                self.redraw();
                Ok(())
            }
            DraftTarget::Existing(_) => {
                if let Err(e) = self.refresh().await {
                    self.redraw();
                    return Err(e);
                }
                Ok(())
            }
        }
    }

    /// Delete the record of `key` after the user confirms.
    pub async fn delete(&mut self, key: &RecordKey) -> GridResult<DeleteOutcome> {
        let id = self
            .record(key)?
            .primary_key()
            .cloned()
            .ok_or(GridError::MissingPrimaryKey)?;

        if !self.interaction.confirm(DELETE_CONFIRMATION) {
            tracing::debug!(key = %key, "Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        match self.mutations.delete(&self.options.table_name, &id).await {
            Ok(()) => {
                self.interaction
                    .notify(&Notification::success(ProcedureKind::Delete));
                self.reload_after_mutation().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(e) => {
                self.interaction
                    .notify(&Notification::failure(ProcedureKind::Delete));
                Err(e)
            }
        }
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn policies(&self) -> &[RenderPolicy] {
        &self.policies
    }

    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    pub fn select_options(&self) -> &OptionsTable {
        &self.select_options
    }

    pub fn draft(&self) -> Option<&RowDraft> {
        self.draft.as_ref()
    }

    pub fn is_add_enabled(&self) -> bool {
        self.add_enabled
    }

    pub fn table_id(&self) -> &str {
        &self.frame.table_id
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Number of successful record fetches so far.
    pub fn generation(&self) -> u64 {
        self.store.generation()
    }

    fn record(&self, key: &RecordKey) -> GridResult<&Record> {
        self.store
            .find(key)
            .ok_or_else(|| GridError::RecordNotFound(key.to_string()))
    }

    fn redraw(&mut self) {
        let view = self.view();
        self.widget.update(&view);
    }

    /// The mutation already succeeded; a failed refetch only keeps the old rows.
    async fn reload_after_mutation(&mut self) {
        if let Err(e) = self.refresh().await {
            tracing::warn!(error = %e, "Refetch after mutation failed");
            self.redraw();
        }
    }
}

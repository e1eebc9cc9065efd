//! SPGRID Grid - Editable grid controller
//!
//! Turns a schema, a record set and the select options into an editable grid
//! and drives the per-row edit state machine on top of the services layer.
//!
//! - [`GridController`] - One grid instance: initialize, add, edit, save, cancel, delete
//! - [`RowDraft`] - Uncommitted form state of the row being edited
//! - [`RenderPolicy`] - Per-column control choice, resolved at schema load
//! - [`render`] - Pure function from grid state to a [`GridView`]
//! - [`WidgetHandle`] / [`GridSurface`] - Mounting the view somewhere visible
//! - [`UserInteraction`] - Notifications and confirmations

mod controller;
mod draft;
mod interaction;
mod policy;
mod view;
mod widget;

pub use controller::{DeleteOutcome, GridController};
pub use draft::{Control, ControlKind, ControlValue, DraftTarget, RowDraft};
pub use interaction::{DELETE_CONFIRMATION, Notification, UserInteraction};
pub use policy::{RenderPolicy, resolve_policies};
pub use view::{CellView, GridFrame, GridView, RowAction, RowEditState, RowView, render, render_row};
pub use widget::{GridSurface, WidgetHandle, WidgetOptions};

//! SPGRID Services Layer
//!
//! This crate provides the services that sit between the grid controller and
//! the remote procedure endpoint. Each service owns one family of operation
//! codes and turns raw JSON replies into typed values.
//!
//! # Architecture
//!
//! ```text
//! Grid Layer (spgrid-grid)
//!     ↓
//! Service Layer (spgrid-services) ← This crate
//!     ↓
//! Client Layer (spgrid-client)
//!     ↓
//! Core Types (spgrid-core)
//! ```
//!
//! # Services
//!
//! - [`SchemaService`] - Column metadata (`@kind` 5)
//! - [`RecordStore`] - Record set of the grid (`@kind` 1)
//! - [`OptionsProvider`] - Drop-down options of select fields (`@kind` 6)
//! - [`MutationService`] - Insert, update and delete (`@kind` 2, 3, 4)
//!
//! # Design Principles
//!
//! 1. **No UI types** - Services never know how the grid is drawn
//! 2. **Typed results** - Replies are parsed here, not in the controller
//! 3. **Failures are values** - Every failure is a `GridError`, nothing panics

mod mutation_service;
mod options_provider;
mod record_store;
mod schema_service;

pub use mutation_service::{MutationService, encode_quoted_list};
pub use options_provider::OptionsProvider;
pub use record_store::RecordStore;
pub use schema_service::SchemaService;

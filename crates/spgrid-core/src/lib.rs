//! SPGRID Core - Core types for the stored-procedure CRUD grid
//!
//! This crate provides the fundamental types that all other SPGRID crates
//! depend on. It defines:
//!
//! - `GridError` - The error taxonomy shared by every layer
//! - `ColumnDescriptor`, `Record`, `SelectOption`, `OptionsTable` - The data model
//! - `InputKind` and the date format conversions (the type mapper)
//! - `ProcedureKind` - Operation codes understood by the remote procedure
//! - `GridOptions` - Construction-time configuration

mod error;
mod input_kind;
mod options;
mod procedure;
mod types;

pub use error::*;
pub use input_kind::*;
pub use options::*;
pub use procedure::*;
pub use types::*;

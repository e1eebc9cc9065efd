//! Blocking notifications and confirmations shown to the user

use spgrid_core::ProcedureKind;

pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this record?";

/// Outcome of a mutation, reported once per save or delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    pub operation: ProcedureKind,
    pub success: bool,
}

impl Notification {
    pub fn success(operation: ProcedureKind) -> Self {
        Self {
            operation,
            success: true,
        }
    }

    pub fn failure(operation: ProcedureKind) -> Self {
        Self {
            operation,
            success: false,
        }
    }

    pub fn message(&self) -> &'static str {
        match (self.operation, self.success) {
            (ProcedureKind::Insert, true) => "Record added successfully",
            (ProcedureKind::Insert, false) => "Error adding record",
            (ProcedureKind::Update, true) => "Record updated successfully",
            (ProcedureKind::Update, false) => "Error updating record",
            (ProcedureKind::Delete, true) => "Record deleted successfully",
            (ProcedureKind::Delete, false) => "Error deleting record",
            (_, true) => "Operation completed",
            (_, false) => "Operation failed",
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// User-facing side of the grid: alerts and yes/no prompts
pub trait UserInteraction: Send + Sync {
    /// Show a blocking notification.
    fn notify(&self, notification: &Notification);

    /// Ask a yes/no question. `false` means the action must not happen.
    fn confirm(&self, prompt: &str) -> bool;
}

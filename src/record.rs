//! Change-log record schema.
//!
//! This module provides:
//! - `ChangeRecord`: one logged mutation with its JSON snapshot
//! - `ChangeSchema`: table and column naming for the persistence layer
//! - `actions`: standard action labels
//!
//! Records are plain values. Inserting and querying them is left to the
//! host persistence layer, which reads column names from a `ChangeSchema`
//! and values from [`ChangeRecord::to_row`].

mod change;
mod schema;

pub use change::ChangeRecord;
pub use schema::{ChangeSchema, Column, ColumnKind, RecordField};

/// Standard action labels.
///
/// The action column is free text; these are the labels used for the
/// three basic mutations.
pub mod actions {
    /// Object was inserted
    pub const CREATE: &str = "create";
    /// Object was modified
    pub const UPDATE: &str = "update";
    /// Object was removed
    pub const DELETE: &str = "delete";
}

//! Editing primitives for the multi-cursor engine.
//!
//! # Architecture
//!
//! The core components are:
//!
//! - [`Buffer`]: line-oriented text store backed by `ropey::Rope`
//! - [`Cursor`] / [`Position`]: edit points, with an optional selection anchor
//! - [`Selection`] / [`VisualKind`]: the range a visual-mode cursor covers
//! - [`Edit`] / [`rebase`]: describe one primitive edit and map positions through it
//! - [`EditHistory`] / [`Transaction`]: grouped undo/redo of replicated edits
//! - [`Command`]: everything the session's command queue accepts
//!
//! None of these know about each other beyond the types they exchange; the
//! replicator in `crate::update` ties them together.

mod buffer;
mod cursor;
mod history;
mod messages;
mod rebase;
mod selection;

// Re-export main types
pub use buffer::{normalize_line_endings, Buffer};
pub use cursor::{Cursor, CursorId, Position};
pub use history::{EditHistory, EditRecord, Transaction};
pub use messages::{Command, CursorCommand, EditCommand, InsertPosition, MoveTarget};
pub use rebase::{rebase, rebase_biased, Bias, Edit};
pub use selection::{Selection, VisualKind};

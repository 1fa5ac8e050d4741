//! Multicursor - a vim-style multiple-cursors editing engine
//!
//! A [`Session`] owns a text buffer, a set of cursors and a command queue.
//! Each editing command is replicated at every cursor in ascending order,
//! and every other cursor is rebased after each single edit so positions
//! stay correct as text shifts.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod editable;
pub mod error;
pub mod model;
pub mod search;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use config::EngineConfig;
pub use editable::{Buffer, Command, Cursor, CursorCommand, EditCommand, Position};
pub use error::EngineError;
pub use model::{Mode, MultiCursorSet, Session};
pub use search::{LiteralLocator, MatchLocator, MatchSpan, Pattern};
pub use update::ReplicationReport;

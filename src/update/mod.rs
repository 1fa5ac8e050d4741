//! Update functions: every command flows through [`update`].
//!
//! Editing commands go to [`document`], cursor-set commands, motions and mode
//! switches go to [`editor`]. After either, the open transaction is committed
//! once the session is out of insert mode.

mod document;
mod editor;

use std::ops::AddAssign;

use crate::editable::Command;
use crate::error::EngineError;
use crate::model::Session;
use crate::search::MatchLocator;

#[cfg(debug_assertions)]
use crate::tracing::CursorSnapshot;
#[cfg(debug_assertions)]
use tracing::{debug, span, Level};

pub use document::update_document;
pub use editor::{update_cursors, update_editor};

/// Outcome of replicating one command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplicationReport {
    /// Cursors the command was applied at
    pub applied: usize,
    /// Cursors skipped: the command would have left the buffer, or an earlier
    /// cursor's edit already removed their range
    pub skipped: usize,
    /// Cursors merged away because they ended on the same position
    pub merged: usize,
}

impl ReplicationReport {
    pub fn is_clean(&self) -> bool {
        self.skipped == 0
    }
}

impl AddAssign for ReplicationReport {
    fn add_assign(&mut self, other: Self) {
        self.applied += other.applied;
        self.skipped += other.skipped;
        self.merged += other.merged;
    }
}

/// Main update function - dispatches to sub-handlers
///
/// In debug builds, this wraps with tracing instrumentation.
#[inline]
pub fn update<L: MatchLocator>(
    session: &mut Session<L>,
    command: Command,
) -> Result<ReplicationReport, EngineError> {
    #[cfg(debug_assertions)]
    {
        update_traced(session, command)
    }
    #[cfg(not(debug_assertions))]
    {
        update_inner(session, command)
    }
}

fn update_inner<L: MatchLocator>(
    session: &mut Session<L>,
    command: Command,
) -> Result<ReplicationReport, EngineError> {
    let result = match command {
        Command::Edit(cmd) if cmd.is_editing() => document::update_document(session, cmd),
        Command::Edit(cmd) => editor::update_editor(session, cmd),
        Command::Cursors(cmd) => editor::update_cursors(session, cmd),
    };

    if !session.mode.is_insert() {
        session.commit_pending();
    }
    result
}

/// Traced update wrapper (debug builds only)
///
/// Captures before/after cursor state and logs the diff.
#[cfg(debug_assertions)]
fn update_traced<L: MatchLocator>(
    session: &mut Session<L>,
    command: Command,
) -> Result<ReplicationReport, EngineError> {
    let name = format!("{:?}", command);
    let _span = span!(Level::DEBUG, "update", command = %name).entered();

    let before = CursorSnapshot::from_session(session);
    debug!(target: "command", command = %name, "processing");

    let result = update_inner(session, command);

    let after = CursorSnapshot::from_session(session);
    if let Some(diff) = before.diff(&after) {
        debug!(target: "cursor", %diff, "state changed");
    }
    result
}

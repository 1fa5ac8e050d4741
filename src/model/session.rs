//! The editing session: one buffer, its cursors, and the command queue.

use std::collections::VecDeque;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::editable::{Buffer, Command, Cursor, CursorId, EditHistory, Position, Transaction};
use crate::error::EngineError;
use crate::search::{LiteralLocator, MatchLocator};
use crate::update::{update, ReplicationReport};

use super::cursor_set::MultiCursorSet;
use super::mode::Mode;

/// Id of the single cursor used while the set is empty
pub const HOME_CURSOR_ID: CursorId = CursorId(0);

/// Cursor state captured on either side of an undo transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorState {
    pub cursors: Vec<Cursor>,
    pub primary: Option<CursorId>,
    pub home: Cursor,
}

/// Owns everything one editing session needs.
///
/// Commands are queued with [`Session::submit`] and applied one at a time by
/// [`Session::run_pending`]; [`Session::execute`] does both for one command.
#[derive(Debug)]
pub struct Session<L: MatchLocator = LiteralLocator> {
    pub(crate) buffer: Buffer,
    pub(crate) set: MultiCursorSet,
    /// The ordinary cursor, edited when the set is empty
    pub(crate) home: Cursor,
    pub(crate) mode: Mode,
    pub(crate) queue: VecDeque<Command>,
    pub(crate) history: EditHistory<CursorState>,
    /// Transaction collecting edits until the session leaves insert mode
    pub(crate) pending: Option<Transaction<CursorState>>,
    pub(crate) config: EngineConfig,
    pub(crate) locator: L,
}

impl Session<LiteralLocator> {
    pub fn new(text: &str) -> Self {
        Self::with_config(text, EngineConfig::default())
    }

    pub fn with_config(text: &str, config: EngineConfig) -> Self {
        let locator = LiteralLocator::new(config.case_sensitive);
        Self::with_locator(text, config, locator)
    }
}

impl<L: MatchLocator> Session<L> {
    pub fn with_locator(text: &str, config: EngineConfig, locator: L) -> Self {
        Self {
            buffer: Buffer::from_text(text),
            set: MultiCursorSet::new(),
            home: Cursor::new(HOME_CURSOR_ID, 0, 0),
            mode: Mode::Normal,
            queue: VecDeque::new(),
            history: EditHistory::with_max_size(config.history_limit),
            pending: None,
            config,
            locator,
        }
    }

    // === Command queue ===

    /// Queue a command for [`Session::run_pending`]
    pub fn submit(&mut self, command: impl Into<Command>) {
        self.queue.push_back(command.into());
    }

    /// Queue several commands in order
    pub fn submit_all<I, C>(&mut self, commands: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Command>,
    {
        self.queue.extend(commands.into_iter().map(Into::into));
    }

    /// Number of commands waiting in the queue
    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    /// Apply every queued command in order. Failed commands are skipped and
    /// their errors returned; they never stop the rest of the queue.
    pub fn run_pending(&mut self) -> Vec<EngineError> {
        let mut errors = Vec::new();
        while let Some(command) = self.queue.pop_front() {
            let name = command.name();
            if let Err(e) = update(self, command) {
                tracing::warn!(command = name, error = %e, "command ignored");
                errors.push(e);
            }
        }
        errors
    }

    /// Apply the next queued command only. None once the queue is empty.
    pub fn step(&mut self) -> Option<Result<ReplicationReport, EngineError>> {
        let command = self.queue.pop_front()?;
        Some(update(self, command))
    }

    /// Queue `command` and run the queue to completion.
    ///
    /// Returns the combined report, or the first error raised while draining.
    pub fn execute(
        &mut self,
        command: impl Into<Command>,
    ) -> Result<ReplicationReport, EngineError> {
        self.submit(command);
        let mut report = ReplicationReport::default();
        let mut first_error = None;
        while let Some(command) = self.queue.pop_front() {
            let name = command.name();
            match update(self, command) {
                Ok(r) => report += r,
                Err(e) => {
                    tracing::warn!(command = name, error = %e, "command ignored");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }

    // === Queries ===

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn lines(&self) -> Vec<String> {
        self.buffer.lines()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn cursor_set(&self) -> &MultiCursorSet {
        &self.set
    }

    /// Active cursors in ascending order: the set, or the home cursor when it is empty
    pub fn cursors(&self) -> &[Cursor] {
        if self.set.is_empty() {
            std::slice::from_ref(&self.home)
        } else {
            self.set.cursors()
        }
    }

    /// The primary cursor, or the home cursor when the set is empty
    pub fn primary(&self) -> &Cursor {
        self.set.primary().unwrap_or(&self.home)
    }

    pub fn cursor_count(&self) -> usize {
        self.cursors().len()
    }

    pub fn has_multiple_cursors(&self) -> bool {
        self.set.len() > 1
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Serializable view of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        let primary = self.primary().id;
        SessionSnapshot {
            lines: self.lines(),
            mode: self.mode,
            cursors: self
                .cursors()
                .iter()
                .map(|c| CursorView {
                    line: c.line,
                    column: c.column,
                    anchor: c.anchor,
                    primary: c.id == primary,
                })
                .collect(),
        }
    }

    // === Direct cursor control ===

    /// Drop all cursors and put the home cursor at `pos` (clamped to the buffer)
    pub fn place_cursor(&mut self, pos: Position) {
        self.cancel();
        let pos = self.buffer.clamp(pos);
        self.home.set_position(pos);
        self.home.clear_desired_column();
    }

    /// Collapse the set onto its primary, leaving visual mode
    pub fn collapse(&mut self) {
        if let Some(kind) = self.mode.visual_kind() {
            for cursor in self.cursors_mut() {
                cursor.drop_selection(kind);
            }
            self.mode = Mode::Normal;
        }
        if let Some(primary) = self.set.collapse() {
            self.home = primary;
        }
        self.home.clear_anchor();
        if self.mode.is_normal() {
            self.home.set_position(self.normal_position(self.home.to_position()));
        }
    }

    /// Back to a single cursor in normal mode, closing any open transaction
    pub fn cancel(&mut self) {
        self.collapse();
        self.mode = Mode::Normal;
        self.commit_pending();
    }

    // === Internals used by the update functions ===

    /// Buffer and active cursors, borrowed together for replication
    pub(crate) fn split_mut(&mut self) -> (&mut Buffer, &mut [Cursor]) {
        let cursors = if self.set.is_empty() {
            std::slice::from_mut(&mut self.home)
        } else {
            self.set.cursors_mut()
        };
        (&mut self.buffer, cursors)
    }

    pub(crate) fn cursors_mut(&mut self) -> &mut [Cursor] {
        self.split_mut().1
    }

    /// `pos` clamped into the buffer and onto a character, as normal mode wants
    fn normal_position(&self, pos: Position) -> Position {
        let pos = self.buffer.clamp(pos);
        let last = self.buffer.line_length(pos.line).saturating_sub(1);
        Position::new(pos.line, pos.column.min(last))
    }

    /// Re-sort after a command has run at every cursor. Outside insert mode
    /// cursors that now share a position are merged; returns how many.
    pub(crate) fn reconcile(&mut self) -> usize {
        if self.mode.is_insert() {
            self.set.sort();
            0
        } else {
            self.set.normalize()
        }
    }

    pub(crate) fn cursor_state(&self) -> CursorState {
        CursorState {
            cursors: self.set.cursors().to_vec(),
            primary: self.set.primary_id(),
            home: self.home,
        }
    }

    /// Restore cursors from history; selections are dropped and the mode is normal
    pub(crate) fn restore_cursor_state(&mut self, state: &CursorState) {
        let cursors = state
            .cursors
            .iter()
            .map(|c| {
                let mut c = *c;
                c.clear_anchor();
                c.set_position(self.normal_position(c.to_position()));
                c
            })
            .collect();
        self.set.restore(cursors, state.primary);
        self.home = state.home;
        self.home.clear_anchor();
        self.home.set_position(self.normal_position(self.home.to_position()));
        self.mode = Mode::Normal;
    }

    /// Open a transaction if none is collecting edits
    pub(crate) fn begin_transaction(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(Transaction::begin(self.cursor_state()));
        }
    }

    /// Close the open transaction, pushing it to history if it changed anything
    pub(crate) fn commit_pending(&mut self) {
        let Some(mut tx) = self.pending.take() else {
            return;
        };
        if tx.is_empty() {
            return;
        }
        tx.after = self.cursor_state();
        tracing::debug!(edits = tx.records.len(), "committed transaction");
        self.history.push(tx);
    }
}

/// Cursor as reported by [`SessionSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CursorView {
    pub line: usize,
    pub column: usize,
    pub anchor: Option<Position>,
    pub primary: bool,
}

/// Serializable state of a session: buffer lines, mode and cursors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub lines: Vec<String>,
    pub mode: Mode,
    pub cursors: Vec<CursorView>,
}

//! Replicated text editing and undo/redo.
//!
//! Every command here is applied once per active cursor, in ascending
//! position order. After each single application the edit is described as
//! an [`Edit`] and every other cursor is rebased through it before the next
//! cursor is visited. A cursor whose whole range an earlier cursor's edit
//! removed does not act; it is absorbed into that cursor.

use crate::editable::{
    normalize_line_endings, Bias, Buffer, Cursor, CursorId, Edit, EditCommand, EditRecord,
    Position, Selection, VisualKind,
};
use crate::error::EngineError;
use crate::model::{Mode, Session};
use crate::search::MatchLocator;

use super::ReplicationReport;

/// One application of a command at one cursor
#[derive(Debug)]
pub(crate) struct Applied {
    pub edit: Edit,
    pub record: EditRecord,
}

/// The command would reach past the start or end of the buffer at this cursor
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct OutOfBounds;

/// Result of applying a command at one cursor. `Ok(None)`: applied, buffer untouched.
pub(crate) type Application = Result<Option<Applied>, OutOfBounds>;

/// Bookkeeping collected while replicating one command
#[derive(Debug, Default)]
pub(crate) struct Replay {
    pub records: Vec<EditRecord>,
    /// `(swallowed, by)`: cursors whose range another cursor's edit removed
    pub absorbed: Vec<(CursorId, CursorId)>,
}

/// Apply `apply` at every cursor in order, rebasing the others after each edit.
///
/// Cursors are never added or removed here. Swallowed cursors are skipped and
/// listed in `replay.absorbed`; merging is left to the caller once the whole
/// command is done.
pub(crate) fn replicate<F>(
    buffer: &mut Buffer,
    cursors: &mut [Cursor],
    replay: &mut Replay,
    command: &str,
    mut apply: F,
) -> ReplicationReport
where
    F: FnMut(&mut Buffer, &mut Cursor) -> Application,
{
    let mut report = ReplicationReport::default();
    let mut swallowed_by: Vec<Option<CursorId>> = vec![None; cursors.len()];
    for idx in 0..cursors.len() {
        if let Some(by) = swallowed_by[idx] {
            tracing::debug!(
                command,
                cursor = cursors[idx].id.0,
                by = by.0,
                "range removed by an earlier cursor, skipped"
            );
            replay.absorbed.push((cursors[idx].id, by));
            report.skipped += 1;
            continue;
        }
        match apply(buffer, &mut cursors[idx]) {
            Ok(Some(applied)) => {
                let acting = cursors[idx].id;
                for (other_idx, other) in cursors.iter_mut().enumerate() {
                    if other_idx == idx {
                        continue;
                    }
                    let bias = if other_idx < idx {
                        Bias::Before
                    } else {
                        Bias::After
                    };
                    if other.rebase(&applied.edit, bias)
                        && other_idx > idx
                        && swallowed_by[other_idx].is_none()
                    {
                        swallowed_by[other_idx] = Some(acting);
                    }
                }
                replay.records.push(applied.record);
                report.applied += 1;
            }
            Ok(None) => report.applied += 1,
            Err(OutOfBounds) => {
                tracing::debug!(
                    command,
                    cursor = cursors[idx].id.0,
                    at = ?cursors[idx].to_position(),
                    "out of bounds, skipped"
                );
                report.skipped += 1;
            }
        }
    }
    report
}

/// Replicate over the session's active cursors, recording into the open transaction
fn replicate_in<L, F>(session: &mut Session<L>, command: &str, apply: F) -> ReplicationReport
where
    L: MatchLocator,
    F: FnMut(&mut Buffer, &mut Cursor) -> Application,
{
    session.begin_transaction();
    let mut replay = Replay::default();
    let mut report = {
        let (buffer, cursors) = session.split_mut();
        replicate(buffer, cursors, &mut replay, command, apply)
    };
    if let Some(tx) = session.pending.as_mut() {
        tx.records.extend(replay.records);
    }
    for (swallowed, by) in replay.absorbed {
        if session.set.absorb(swallowed, by) {
            report.merged += 1;
        }
    }
    report.merged += session.reconcile();
    report
}

/// Insert `text` at the cursor and move the cursor past it
fn insert_at_cursor(buffer: &mut Buffer, cursor: &mut Cursor, text: &str) -> Applied {
    let at = cursor.to_position();
    let offset = buffer.position_to_offset(at);
    let text = normalize_line_endings(text);
    let end = buffer.insert_at(at, &text);
    cursor.set_position(end);
    cursor.clear_desired_column();
    Applied {
        edit: Edit::insert(at, end),
        record: EditRecord::insert(offset, text.into_owned()),
    }
}

/// Delete `[start, end)`; the caller positions the acting cursor
fn delete_between(buffer: &mut Buffer, start: Position, end: Position) -> Applied {
    let offset = buffer.position_to_offset(start);
    let deleted = buffer.delete_range(start, end);
    Applied {
        edit: Edit::delete(start, end),
        record: EditRecord::delete(offset, deleted),
    }
}

/// Largest column a normal-mode cursor may sit on
fn normal_column(buffer: &Buffer, line: usize, column: usize) -> usize {
    column.min(buffer.line_length(line).saturating_sub(1))
}

/// What deleting a visual selection leaves behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineWiseDelete {
    /// Clear the lines' content, keeping one empty line (c)
    KeepLine,
    /// Remove the lines entirely (d)
    RemoveLines,
}

fn delete_selection_at(
    buffer: &mut Buffer,
    cursor: &mut Cursor,
    kind: VisualKind,
    linewise: LineWiseDelete,
) -> Application {
    let selection =
        Selection::of_cursor(cursor).unwrap_or_else(|| Selection::collapsed(cursor.to_position()));
    cursor.clear_anchor();
    cursor.clear_desired_column();

    let (start, end) = selection.range(kind, buffer);
    if kind == VisualKind::CharWise || linewise == LineWiseDelete::KeepLine {
        cursor.set_position(start);
        if start == end {
            return Ok(None);
        }
        return Ok(Some(delete_between(buffer, start, end)));
    }

    // Whole lines, newline included
    let (first, last) = (start.line, end.line);
    let (del_start, del_end, land_line) = if last + 1 < buffer.line_count() {
        (Position::new(first, 0), Position::new(last + 1, 0), first)
    } else if first > 0 {
        (
            Position::new(first - 1, buffer.line_length(first - 1)),
            Position::new(last, buffer.line_length(last)),
            first - 1,
        )
    } else {
        (Position::zero(), Position::new(last, buffer.line_length(last)), 0)
    };
    let applied = delete_between(buffer, del_start, del_end);
    cursor.set_position(Position::new(
        land_line,
        buffer.first_non_whitespace_column(land_line),
    ));
    Ok(Some(applied))
}

fn invalid_mode<L: MatchLocator>(session: &Session<L>, command: &EditCommand) -> EngineError {
    EngineError::InvalidMode {
        command: command.name(),
        mode: session.mode,
    }
}

/// Handle buffer-changing commands
pub fn update_document<L: MatchLocator>(
    session: &mut Session<L>,
    command: EditCommand,
) -> Result<ReplicationReport, EngineError> {
    let name = command.name();
    match command {
        EditCommand::InsertChar(ch) => {
            if !session.mode.is_insert() {
                return Err(invalid_mode(session, &command));
            }
            let text = ch.to_string();
            Ok(replicate_in(session, name, |buffer, cursor| {
                Ok(Some(insert_at_cursor(buffer, cursor, &text)))
            }))
        }

        EditCommand::InsertNewline => {
            if !session.mode.is_insert() {
                return Err(invalid_mode(session, &command));
            }
            Ok(replicate_in(session, name, |buffer, cursor| {
                Ok(Some(insert_at_cursor(buffer, cursor, "\n")))
            }))
        }

        EditCommand::InsertText(ref text) => {
            if !session.mode.is_insert() {
                return Err(invalid_mode(session, &command));
            }
            // One keystroke at a time, ahead of anything already queued
            let text = normalize_line_endings(text);
            for ch in text.chars().rev() {
                let key = match ch {
                    '\n' => EditCommand::InsertNewline,
                    ch => EditCommand::InsertChar(ch),
                };
                session.queue.push_front(key.into());
            }
            Ok(ReplicationReport::default())
        }

        EditCommand::DeleteBackward(count) => {
            if !session.mode.is_insert() {
                return Err(invalid_mode(session, &command));
            }
            Ok(replicate_in(session, name, |buffer, cursor| {
                if count == 0 {
                    return Ok(None);
                }
                let end = cursor.to_position();
                let offset = buffer.position_to_offset(end);
                if offset < count {
                    return Err(OutOfBounds);
                }
                let start = buffer.offset_to_position(offset - count);
                let applied = delete_between(buffer, start, end);
                cursor.set_position(start);
                cursor.clear_desired_column();
                Ok(Some(applied))
            }))
        }

        EditCommand::DeleteForward(count) => match session.mode {
            Mode::Visual(_) => update_document(session, EditCommand::DeleteSelection),
            Mode::Insert => Ok(replicate_in(session, name, |buffer, cursor| {
                if count == 0 {
                    return Ok(None);
                }
                let start = cursor.to_position();
                let offset = buffer.position_to_offset(start);
                if offset.saturating_add(count) > buffer.len_chars() {
                    return Err(OutOfBounds);
                }
                let end = buffer.offset_to_position(offset + count);
                Ok(Some(delete_between(buffer, start, end)))
            })),
            Mode::Normal => Ok(replicate_in(session, name, |buffer, cursor| {
                // x never joins lines
                let len = buffer.line_length(cursor.line);
                if cursor.column >= len {
                    return Err(OutOfBounds);
                }
                let start = cursor.to_position();
                let end = Position::new(cursor.line, cursor.column.saturating_add(count).min(len));
                let applied = delete_between(buffer, start, end);
                cursor.column = normal_column(buffer, cursor.line, cursor.column);
                cursor.clear_desired_column();
                Ok(Some(applied))
            })),
        },

        EditCommand::OpenLineBelow | EditCommand::OpenLineAbove => {
            if !session.mode.is_normal() {
                return Err(invalid_mode(session, &command));
            }
            let below = matches!(command, EditCommand::OpenLineBelow);
            let report = replicate_in(session, name, |buffer, cursor| {
                let line = cursor.line;
                let at = if below {
                    Position::new(line, buffer.line_length(line))
                } else {
                    Position::new(line, 0)
                };
                let offset = buffer.position_to_offset(at);
                let end = buffer.split_line(at);
                cursor.set_position(if below { end } else { at });
                cursor.clear_desired_column();
                Ok(Some(Applied {
                    edit: Edit::insert(at, end),
                    record: EditRecord::insert(offset, "\n".to_string()),
                }))
            });
            session.mode = Mode::Insert;
            Ok(report)
        }

        EditCommand::ReplaceSelection => match session.mode {
            Mode::Visual(kind) => {
                // Already inserting: cursors emptied onto one spot by adjacent
                // selections stay separate
                session.mode = Mode::Insert;
                let report = replicate_in(session, name, |buffer, cursor| {
                    delete_selection_at(buffer, cursor, kind, LineWiseDelete::KeepLine)
                });
                clear_anchors(session);
                Ok(report)
            }
            Mode::Normal => {
                session.mode = Mode::Insert;
                Ok(ReplicationReport {
                    applied: session.cursor_count(),
                    ..Default::default()
                })
            }
            Mode::Insert => Err(invalid_mode(session, &command)),
        },

        EditCommand::DeleteSelection => {
            let Mode::Visual(kind) = session.mode else {
                return Err(invalid_mode(session, &command));
            };
            let mut report = replicate_in(session, name, |buffer, cursor| {
                delete_selection_at(buffer, cursor, kind, LineWiseDelete::RemoveLines)
            });
            clear_anchors(session);
            session.mode = Mode::Normal;
            let (buffer, cursors) = session.split_mut();
            for cursor in cursors.iter_mut() {
                cursor.column = normal_column(buffer, cursor.line, cursor.column);
            }
            report.merged += session.set.normalize();
            Ok(report)
        }

        EditCommand::Undo => {
            if !session.mode.is_normal() {
                return Err(invalid_mode(session, &command));
            }
            let Some(tx) = session.history.pop_undo() else {
                return Err(EngineError::NothingToUndo);
            };
            tx.undo(&mut session.buffer);
            let applied = tx.records.len();
            let state = tx.before.clone();
            session.restore_cursor_state(&state);
            tracing::debug!(edits = applied, "undo");
            Ok(ReplicationReport {
                applied,
                ..Default::default()
            })
        }

        EditCommand::Redo => {
            if !session.mode.is_normal() {
                return Err(invalid_mode(session, &command));
            }
            let Some(tx) = session.history.pop_redo() else {
                return Err(EngineError::NothingToRedo);
            };
            tx.redo(&mut session.buffer);
            let applied = tx.records.len();
            let state = tx.after.clone();
            session.restore_cursor_state(&state);
            tracing::debug!(edits = applied, "redo");
            Ok(ReplicationReport {
                applied,
                ..Default::default()
            })
        }

        EditCommand::EnterVisual(_)
        | EditCommand::EnterInsert(_)
        | EditCommand::ExitInsert
        | EditCommand::Escape
        | EditCommand::Move(_) => super::editor::update_editor(session, command),
    }
}

fn clear_anchors<L: MatchLocator>(session: &mut Session<L>) {
    for cursor in session.cursors_mut() {
        cursor.clear_anchor();
    }
}

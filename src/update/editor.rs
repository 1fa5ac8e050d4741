//! Cursor-set commands, replicated motions and mode switches.
//!
//! Nothing here changes the buffer, so no rebasing is needed: each cursor is
//! moved on its own and the set is re-normalized afterwards.

use crate::editable::{
    Buffer, Cursor, CursorCommand, EditCommand, InsertPosition, MoveTarget, Position, Selection,
    VisualKind,
};
use crate::error::EngineError;
use crate::model::{Mode, Session};
use crate::search::{word_at, MatchLocator, Pattern};
use crate::util::{char_type, CharType};

use super::ReplicationReport;

// === Motions ===

/// Last column a cursor may reach on `line`. Normal mode stops on the last
/// character; insert and visual mode may sit just past it.
fn max_column(buffer: &Buffer, line: usize, past_end: bool) -> usize {
    let len = buffer.line_length(line);
    if past_end {
        len
    } else {
        len.saturating_sub(1)
    }
}

fn word_forward(buffer: &Buffer, pos: Position) -> Position {
    let rope = buffer.rope();
    let total = rope.len_chars();
    let mut offset = buffer.position_to_offset(pos);
    if offset >= total {
        return pos;
    }

    let start_type = char_type(rope.char(offset));
    if start_type != CharType::Whitespace {
        while offset < total && char_type(rope.char(offset)) == start_type {
            offset += 1;
        }
    }
    while offset < total && rope.char(offset).is_whitespace() {
        // An empty line counts as a word
        if rope.char(offset) == '\n' && offset + 1 < total && rope.char(offset + 1) == '\n' {
            offset += 1;
            break;
        }
        offset += 1;
    }
    buffer.offset_to_position(offset)
}

fn word_backward(buffer: &Buffer, pos: Position) -> Position {
    let rope = buffer.rope();
    let mut offset = buffer.position_to_offset(pos);
    if offset == 0 {
        return pos;
    }

    offset -= 1;
    while offset > 0 && rope.char(offset).is_whitespace() {
        offset -= 1;
    }
    let run_type = char_type(rope.char(offset));
    while offset > 0 && char_type(rope.char(offset - 1)) == run_type {
        offset -= 1;
    }
    buffer.offset_to_position(offset)
}

fn move_cursor(buffer: &Buffer, cursor: &mut Cursor, target: MoveTarget, past_end: bool) {
    match target {
        MoveTarget::Left => {
            cursor.column = cursor.column.saturating_sub(1);
            cursor.clear_desired_column();
        }
        MoveTarget::Right => {
            cursor.column = (cursor.column + 1).min(max_column(buffer, cursor.line, past_end));
            cursor.clear_desired_column();
        }
        MoveTarget::Up | MoveTarget::Down => {
            let line = if target == MoveTarget::Up {
                cursor.line.saturating_sub(1)
            } else {
                (cursor.line + 1).min(buffer.line_count() - 1)
            };
            cursor.set_desired_column();
            cursor.line = line;
            cursor.column = cursor
                .effective_column()
                .min(max_column(buffer, line, past_end));
        }
        MoveTarget::LineStart => {
            cursor.column = 0;
            cursor.clear_desired_column();
        }
        MoveTarget::LineEnd => {
            cursor.column = max_column(buffer, cursor.line, past_end);
            cursor.clear_desired_column();
        }
        MoveTarget::WordForward | MoveTarget::WordBackward => {
            let pos = if target == MoveTarget::WordForward {
                word_forward(buffer, cursor.to_position())
            } else {
                word_backward(buffer, cursor.to_position())
            };
            cursor.set_position(pos);
            cursor.column = cursor.column.min(max_column(buffer, pos.line, past_end));
            cursor.clear_desired_column();
        }
    }
}

/// Run `f` on every active cursor, then re-normalize the set
fn for_each_cursor<L, F>(session: &mut Session<L>, mut f: F) -> ReplicationReport
where
    L: MatchLocator,
    F: FnMut(&Buffer, &mut Cursor),
{
    let applied = {
        let (buffer, cursors) = session.split_mut();
        for cursor in cursors.iter_mut() {
            f(buffer, cursor);
        }
        cursors.len()
    };
    ReplicationReport {
        applied,
        merged: session.reconcile(),
        ..Default::default()
    }
}

fn invalid_mode<L: MatchLocator>(session: &Session<L>, command: &'static str) -> EngineError {
    EngineError::InvalidMode {
        command,
        mode: session.mode,
    }
}

/// Handle motions and mode switches
pub fn update_editor<L: MatchLocator>(
    session: &mut Session<L>,
    command: EditCommand,
) -> Result<ReplicationReport, EngineError> {
    match command {
        EditCommand::Move(target) => {
            let past_end = !session.mode.is_normal();
            Ok(for_each_cursor(session, |buffer, cursor| {
                move_cursor(buffer, cursor, target, past_end)
            }))
        }

        EditCommand::EnterVisual(kind) => match session.mode {
            Mode::Insert => Err(invalid_mode(session, command.name())),
            Mode::Visual(current) if current == kind => Ok(leave_visual(session)),
            Mode::Visual(_) => {
                session.mode = Mode::Visual(kind);
                Ok(ReplicationReport {
                    applied: session.cursor_count(),
                    ..Default::default()
                })
            }
            Mode::Normal => {
                session.mode = Mode::Visual(kind);
                Ok(for_each_cursor(session, |_, cursor| cursor.anchor_here()))
            }
        },

        EditCommand::EnterInsert(position) => {
            if !session.mode.is_normal() {
                return Err(invalid_mode(session, command.name()));
            }
            session.mode = Mode::Insert;
            Ok(for_each_cursor(session, |buffer, cursor| {
                let len = buffer.line_length(cursor.line);
                cursor.column = match position {
                    InsertPosition::Before => cursor.column,
                    InsertPosition::After => (cursor.column + 1).min(len),
                    InsertPosition::LineStart => buffer.first_non_whitespace_column(cursor.line),
                    InsertPosition::LineEnd => len,
                };
                cursor.clear_desired_column();
            }))
        }

        EditCommand::ExitInsert => Ok(exit_to_normal(session)),

        EditCommand::Escape => {
            if session.mode.is_normal() {
                let applied = session.cursor_count();
                session.collapse();
                return Ok(ReplicationReport {
                    applied,
                    ..Default::default()
                });
            }
            Ok(exit_to_normal(session))
        }

        other => super::document::update_document(session, other),
    }
}

fn exit_to_normal<L: MatchLocator>(session: &mut Session<L>) -> ReplicationReport {
    match session.mode {
        Mode::Insert => {
            session.mode = Mode::Normal;
            let step_left = session.config.step_left_on_exit_insert;
            for_each_cursor(session, |_, cursor| {
                if step_left {
                    cursor.column = cursor.column.saturating_sub(1);
                }
                cursor.clear_desired_column();
            })
        }
        Mode::Visual(_) => leave_visual(session),
        Mode::Normal => ReplicationReport::default(),
    }
}

fn leave_visual<L: MatchLocator>(session: &mut Session<L>) -> ReplicationReport {
    let kind = session.mode.visual_kind().unwrap_or(VisualKind::CharWise);
    session.mode = Mode::Normal;
    for_each_cursor(session, |buffer, cursor| {
        cursor.drop_selection(kind);
        cursor.column = cursor.column.min(max_column(buffer, cursor.line, false));
    })
}

// === Cursor-set commands ===

/// Pattern for an add-next without an explicit one: the set's pattern, the
/// home cursor's char-wise selection, or the whole word under the home cursor.
fn implicit_pattern<L: MatchLocator>(session: &Session<L>) -> Result<Pattern, EngineError> {
    if let Some(pattern) = session.set.pattern() {
        return Ok(pattern.clone());
    }
    if session.set.is_empty() {
        if let (Some(VisualKind::CharWise), Some(selection)) = (
            session.mode.visual_kind(),
            Selection::of_cursor(&session.home),
        ) {
            let text = selection.text(VisualKind::CharWise, &session.buffer);
            if !text.is_empty() {
                return Ok(Pattern::literal(text));
            }
        }
        if let Some((word, _)) = word_at(&session.buffer, session.home.to_position()) {
            return Ok(Pattern::word(word));
        }
    }
    Err(EngineError::EmptyPattern)
}

/// Handle commands that reshape the cursor set
pub fn update_cursors<L: MatchLocator>(
    session: &mut Session<L>,
    command: CursorCommand,
) -> Result<ReplicationReport, EngineError> {
    if session.mode.is_insert() && !matches!(command, CursorCommand::Collapse) {
        return Err(invalid_mode(session, command.name()));
    }
    let wrap = session.config.wrap_search;

    match command {
        CursorCommand::AddNext(pattern) => {
            let pattern = match pattern {
                Some(text) => Pattern::literal(text),
                None => implicit_pattern(session)?,
            };
            // Selecting unless the set already lives in normal mode
            let select = session.set.is_empty() || session.mode.is_visual();
            // A visual selection on the home cursor is itself the first match
            let from = Selection::of_cursor(&session.home)
                .map_or(session.home.to_position(), |selection| selection.start());
            session.set.add_next(
                &session.buffer,
                &session.locator,
                &pattern,
                from,
                select,
                wrap,
            )?;
            if select && !session.mode.is_visual() {
                session.mode = Mode::Visual(VisualKind::CharWise);
            }
            Ok(ReplicationReport {
                applied: 1,
                ..Default::default()
            })
        }

        CursorCommand::FindAll(text) => {
            let pattern = Pattern::literal(text);
            let count = session
                .set
                .add_all(&session.buffer, &session.locator, &pattern)?;
            session.mode = Mode::Visual(VisualKind::CharWise);
            Ok(ReplicationReport {
                applied: count,
                ..Default::default()
            })
        }

        CursorCommand::SkipNext => {
            let select = session.mode.is_visual();
            session
                .set
                .skip_next(&session.buffer, &session.locator, select, wrap)?;
            Ok(ReplicationReport {
                applied: 1,
                ..Default::default()
            })
        }

        CursorCommand::RemoveLastAdded => {
            let Some(mut removed) = session.set.remove_last_added() else {
                return Ok(ReplicationReport::default());
            };
            if session.set.is_empty() {
                removed.clear_anchor();
                session.home = removed;
                if session.mode.is_visual() {
                    session.mode = Mode::Normal;
                }
            }
            Ok(ReplicationReport {
                applied: 1,
                ..Default::default()
            })
        }

        CursorCommand::Collapse => {
            let applied = session.cursor_count();
            session.collapse();
            Ok(ReplicationReport {
                applied,
                ..Default::default()
            })
        }
    }
}

//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use multicursor::editable::{Command, CursorCommand, EditCommand, VisualKind};
use multicursor::{Position, Session};

/// Create a test session with given text and the home cursor at (line, column)
pub fn test_session(text: &str, line: usize, column: usize) -> Session {
    let mut session = Session::new(text);
    session.place_cursor(Position::new(line, column));
    session
}

/// Helper to get buffer content as string
pub fn buffer_to_string(session: &Session) -> String {
    session.text()
}

/// Cursor positions in set order
pub fn positions(session: &Session) -> Vec<(usize, usize)> {
    session
        .cursors()
        .iter()
        .map(|c| (c.line, c.column))
        .collect()
}

/// Run commands in order, panicking on the first error
pub fn run(session: &mut Session, commands: Vec<Command>) {
    for command in commands {
        let name = command.name();
        if let Err(e) = session.execute(command) {
            panic!("command {} failed: {}", name, e);
        }
    }
}

/// `<C-n>`
pub fn add_next() -> Command {
    CursorCommand::AddNext(None).into()
}

/// `c{text}<Esc>`
pub fn change_to(text: &str) -> Vec<Command> {
    vec![
        EditCommand::ReplaceSelection.into(),
        EditCommand::InsertText(text.to_string()).into(),
        EditCommand::ExitInsert.into(),
    ]
}

/// `v`
pub fn visual() -> Command {
    EditCommand::EnterVisual(VisualKind::CharWise).into()
}

/// `V`
pub fn visual_line() -> Command {
    EditCommand::EnterVisual(VisualKind::LineWise).into()
}

/// Type text in insert mode, then `<Esc>`
pub fn type_and_exit(text: &str) -> Vec<Command> {
    vec![
        EditCommand::InsertText(text.to_string()).into(),
        EditCommand::ExitInsert.into(),
    ]
}

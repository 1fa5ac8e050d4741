//! Monkey tests - edge cases, fuzzing, and stress testing
//!
//! These tests intentionally push the engine to its limits with
//! weird inputs, extreme values, and unusual sequences of commands.

mod common;

use common::{buffer_to_string, change_to, run, test_session};
use multicursor::editable::{
    Command, CursorCommand, EditCommand, InsertPosition, MoveTarget, VisualKind,
};
use multicursor::{EngineError, Position, Session};
use proptest::prelude::*;

/// Cursors sorted, inside the buffer, anchored iff in visual mode.
///
/// Cursors may coincide while inserting; outside insert mode they are distinct.
fn assert_consistent(session: &Session, context: &str) {
    let buffer = session.buffer();
    let cursors = session.cursors();
    assert!(!cursors.is_empty(), "{}: no active cursor", context);

    for pair in cursors.windows(2) {
        let (a, b) = (pair[0].to_position(), pair[1].to_position());
        let ordered = if session.mode().is_insert() { a <= b } else { a < b };
        assert!(
            ordered,
            "{}: cursors out of order or duplicated in {}: {:?}",
            context,
            session.mode(),
            cursors
        );
    }
    for cursor in cursors {
        assert!(
            cursor.line < buffer.line_count(),
            "{}: cursor line {} past {} lines",
            context,
            cursor.line,
            buffer.line_count()
        );
        assert!(
            cursor.column <= buffer.line_length(cursor.line),
            "{}: cursor column {} past line length {}",
            context,
            cursor.column,
            buffer.line_length(cursor.line)
        );
        assert_eq!(
            cursor.anchor.is_some(),
            session.mode().is_visual(),
            "{}: anchor does not match mode {}",
            context,
            session.mode()
        );
        if let Some(anchor) = cursor.anchor {
            assert_eq!(buffer.clamp(anchor), anchor, "{}: anchor outside buffer", context);
        }
    }
}

// ========================================================================
// Empty and tiny buffers
// ========================================================================

#[test]
fn test_empty_buffer_find_all_reports_no_match() {
    let mut session = Session::new("");
    let err = session
        .execute(CursorCommand::FindAll("x".to_string()))
        .unwrap_err();
    assert!(matches!(err, EngineError::NoMatchFound { .. }));
    assert_consistent(&session, "empty find");
}

#[test]
fn test_empty_buffer_add_next_is_empty_pattern() {
    let mut session = Session::new("");
    assert_eq!(
        session.execute(CursorCommand::AddNext(None)).unwrap_err(),
        EngineError::EmptyPattern
    );
}

#[test]
fn test_empty_pattern_find_all() {
    let mut session = Session::new("abc\n");
    assert_eq!(
        session
            .execute(CursorCommand::FindAll(String::new()))
            .unwrap_err(),
        EngineError::EmptyPattern
    );
}

#[test]
fn test_empty_buffer_typing() {
    let mut session = Session::new("");
    run(&mut session, change_to("hi\nthere"));
    assert_eq!(session.lines(), vec!["hi", "there"]);
    assert_consistent(&session, "empty typing");
}

#[test]
fn test_every_motion_on_empty_buffer() {
    let mut session = Session::new("");
    for target in [
        MoveTarget::Left,
        MoveTarget::Right,
        MoveTarget::Up,
        MoveTarget::Down,
        MoveTarget::LineStart,
        MoveTarget::LineEnd,
        MoveTarget::WordForward,
        MoveTarget::WordBackward,
    ] {
        session.execute(EditCommand::Move(target)).unwrap();
        assert_eq!(session.primary().to_position(), Position::zero());
    }
}

// ========================================================================
// Extreme counts
// ========================================================================

#[test]
fn test_huge_delete_counts_do_not_overflow() {
    let mut session = test_session("hello\n", 0, 2);
    session.execute(EditCommand::DeleteForward(usize::MAX)).unwrap();
    assert_eq!(session.lines(), vec!["he"]);

    run(
        &mut session,
        vec![EditCommand::EnterInsert(InsertPosition::LineEnd).into()],
    );
    let report = session
        .execute(EditCommand::DeleteForward(usize::MAX))
        .unwrap();
    assert_eq!(report.skipped, 1);
    let report = session
        .execute(EditCommand::DeleteBackward(usize::MAX))
        .unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(buffer_to_string(&session), "he");
}

#[test]
fn test_zero_counts_change_nothing() {
    let mut session = test_session("hello\n", 0, 2);
    run(
        &mut session,
        vec![
            EditCommand::EnterInsert(InsertPosition::Before).into(),
            EditCommand::DeleteBackward(0).into(),
            EditCommand::DeleteForward(0).into(),
            EditCommand::ExitInsert.into(),
        ],
    );
    assert_eq!(session.lines(), vec!["hello"]);
    assert!(!session.can_undo());
}

#[test]
fn test_place_cursor_far_outside_buffer() {
    let mut session = test_session("ab\ncd\n", usize::MAX, usize::MAX);
    assert_eq!(session.primary().to_position(), Position::new(1, 2));
    assert_consistent(&session, "clamped placement");
}

#[test]
fn test_many_cursors() {
    let text = "x\n".repeat(2000);
    let mut session = Session::new(&text);
    run(
        &mut session,
        vec![CursorCommand::FindAll("x".to_string()).into()],
    );
    assert_eq!(session.cursor_count(), 2000);

    run(&mut session, change_to("yy"));
    assert!(session.lines().iter().all(|line| line == "yy"));
    assert_consistent(&session, "many cursors");
}

// ========================================================================
// Unicode
// ========================================================================

#[test]
fn test_unicode_occurrences() {
    let mut session = Session::new("héllo wörld\n🙂 héllo\n");
    run(
        &mut session,
        vec![CursorCommand::FindAll("héllo".to_string()).into()],
    );
    assert_eq!(session.cursor_count(), 2);
    run(&mut session, change_to("ñ"));
    assert_eq!(session.lines(), vec!["ñ wörld", "🙂 ñ"]);
}

#[test]
fn test_carriage_returns_become_newlines() {
    let mut session = Session::new("a\r\nb\r\n");
    assert_eq!(session.lines(), vec!["a", "b"]);

    run(
        &mut session,
        vec![
            EditCommand::EnterInsert(InsertPosition::LineEnd).into(),
            EditCommand::InsertChar('\r').into(),
            EditCommand::ExitInsert.into(),
        ],
    );
    assert_eq!(session.lines(), vec!["a", "", "b"]);

    run(
        &mut session,
        vec![EditCommand::Undo.into(), EditCommand::Redo.into()],
    );
    assert_eq!(session.lines(), vec!["a", "", "b"]);
}

// ========================================================================
// Random command sequences
// ========================================================================

fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("foo bar foo\nbar foo\n\nfoo\n".to_string()),
        Just("oooo\n".to_string()),
        // Adjacent occurrences
        "(foo|o|bar){1,6}(\n(foo|o|bar| ){0,6}){0,4}",
        "[fo \n\u{e9}]{0,40}",
    ]
}

fn word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("foo".to_string()),
        Just("bar".to_string()),
        Just("o".to_string()),
        Just("\n".to_string()),
        Just("\u{e9}".to_string()),
    ]
}

fn motion_strategy() -> impl Strategy<Value = MoveTarget> {
    prop_oneof![
        Just(MoveTarget::Left),
        Just(MoveTarget::Right),
        Just(MoveTarget::Up),
        Just(MoveTarget::Down),
        Just(MoveTarget::LineStart),
        Just(MoveTarget::LineEnd),
        Just(MoveTarget::WordForward),
        Just(MoveTarget::WordBackward),
    ]
}

fn insert_position_strategy() -> impl Strategy<Value = InsertPosition> {
    prop_oneof![
        Just(InsertPosition::Before),
        Just(InsertPosition::After),
        Just(InsertPosition::LineStart),
        Just(InsertPosition::LineEnd),
    ]
}

fn cursor_command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(CursorCommand::AddNext(None).into()),
        word_strategy().prop_map(|w| CursorCommand::AddNext(Some(w)).into()),
        word_strategy().prop_map(|w| CursorCommand::FindAll(w).into()),
        Just(CursorCommand::SkipNext.into()),
        Just(CursorCommand::RemoveLastAdded.into()),
        Just(CursorCommand::Collapse.into()),
    ]
}

fn edit_command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        prop_oneof![Just('x'), Just(' '), Just('\u{e9}'), Just('\n')]
            .prop_map(|c| EditCommand::InsertChar(c).into()),
        word_strategy().prop_map(|w| EditCommand::InsertText(w).into()),
        (0usize..4).prop_map(|n| EditCommand::DeleteBackward(n).into()),
        (0usize..4).prop_map(|n| EditCommand::DeleteForward(n).into()),
        Just(EditCommand::EnterVisual(VisualKind::CharWise).into()),
        Just(EditCommand::EnterVisual(VisualKind::LineWise).into()),
        insert_position_strategy().prop_map(|p| EditCommand::EnterInsert(p).into()),
        Just(EditCommand::OpenLineBelow.into()),
        Just(EditCommand::OpenLineAbove.into()),
        Just(EditCommand::ExitInsert.into()),
        Just(EditCommand::Escape.into()),
        Just(EditCommand::ReplaceSelection.into()),
        Just(EditCommand::DeleteSelection.into()),
        Just(EditCommand::Undo.into()),
        Just(EditCommand::Redo.into()),
        motion_strategy().prop_map(|m| EditCommand::Move(m).into()),
    ]
}

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        1 => cursor_command_strategy(),
        3 => edit_command_strategy(),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn command_sequences_keep_cursors_consistent(
        text in text_strategy(),
        commands in prop::collection::vec(command_strategy(), 1..200),
    ) {
        let mut session = Session::new(&text);
        for (i, command) in commands.into_iter().enumerate() {
            let context = format!("command {} {:?}", i, command);
            session.submit(command);
            // Errors are fine; panics and broken invariants are not
            while let Some(_result) = session.step() {
                assert_consistent(&session, &context);
            }
        }
    }

    #[test]
    fn occurrence_change_replaces_every_match(
        pieces in prop::collection::vec(
            prop_oneof![Just("ab"), Just(" "), Just("\n"), Just("a")],
            1..12,
        ),
        replacement in "[xy]{0,3}",
    ) {
        let mut session = Session::new(&pieces.concat());
        let expected = session.text().replace("ab", &replacement);
        prop_assume!(session.execute(CursorCommand::FindAll("ab".to_string())).is_ok());

        let report = session.execute(EditCommand::ReplaceSelection).unwrap();
        prop_assert_eq!(report.skipped, 0);
        assert_consistent(&session, "after change");
        for c in replacement.chars() {
            session.execute(EditCommand::InsertChar(c)).unwrap();
            assert_consistent(&session, "while typing");
        }
        session.execute(EditCommand::ExitInsert).unwrap();
        assert_consistent(&session, "after exit");
        prop_assert_eq!(session.text(), expected);
    }

    #[test]
    fn undo_everything_restores_original(
        text in text_strategy(),
        commands in prop::collection::vec(command_strategy(), 0..150),
    ) {
        let mut session = Session::new(&text);
        let original = session.text();
        for command in commands {
            let _ = session.execute(command);
        }
        session.cancel();
        while session.can_undo() {
            session.execute(EditCommand::Undo).unwrap();
        }
        prop_assert_eq!(session.text(), original);
    }
}

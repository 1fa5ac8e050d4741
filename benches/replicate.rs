//! Benchmarks for replicated editing
//!
//! Run with: cargo bench --bench replicate

use multicursor::editable::{CursorCommand, EditCommand, InsertPosition, MoveTarget};
use multicursor::Session;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// Session with one selecting cursor per line
fn session_with_cursors(cursor_count: usize) -> Session {
    let text = "let value = compute(value);\n".repeat(cursor_count);
    let mut session = Session::new(&text);
    let _ = session.execute(CursorCommand::FindAll("value =".to_string()));
    session
}

// ============================================================================
// Cursor set construction
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn find_all(bencher: divan::Bencher, cursor_count: usize) {
    let text = "let value = compute(value);\n".repeat(cursor_count);
    bencher
        .with_inputs(|| Session::new(&text))
        .bench_local_values(|mut session| {
            let _ = session.execute(CursorCommand::FindAll("value".to_string()));
            divan::black_box(session.cursor_count())
        });
}

#[divan::bench(args = [10, 100])]
fn add_next_repeatedly(bencher: divan::Bencher, cursor_count: usize) {
    let text = "let value = compute(value);\n".repeat(cursor_count);
    bencher
        .with_inputs(|| Session::new(&text))
        .bench_local_values(|mut session| {
            for _ in 0..cursor_count {
                let _ = session.execute(CursorCommand::AddNext(None));
            }
            divan::black_box(session.cursor_count())
        });
}

// ============================================================================
// Replicated edits
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn change_every_cursor(bencher: divan::Bencher, cursor_count: usize) {
    bencher
        .with_inputs(|| session_with_cursors(cursor_count))
        .bench_local_values(|mut session| {
            session.submit_all([
                EditCommand::ReplaceSelection,
                EditCommand::InsertText("result = ".to_string()),
                EditCommand::ExitInsert,
            ]);
            divan::black_box(session.run_pending())
        });
}

#[divan::bench(args = [10, 100, 1_000])]
fn type_newlines_at_every_cursor(bencher: divan::Bencher, cursor_count: usize) {
    bencher
        .with_inputs(|| {
            let mut session = session_with_cursors(cursor_count);
            session.submit_all([
                EditCommand::ExitInsert,
                EditCommand::EnterInsert(InsertPosition::LineEnd),
            ]);
            session.run_pending();
            session
        })
        .bench_local_values(|mut session| {
            session.submit_all([
                EditCommand::InsertText("\n// a\n".to_string()),
                EditCommand::ExitInsert,
            ]);
            divan::black_box(session.run_pending())
        });
}

#[divan::bench(args = [10, 100, 1_000])]
fn move_every_cursor(bencher: divan::Bencher, cursor_count: usize) {
    bencher
        .with_inputs(|| session_with_cursors(cursor_count))
        .bench_local_values(|mut session| {
            for _ in 0..10 {
                let _ = session.execute(EditCommand::Move(MoveTarget::WordForward));
            }
            divan::black_box(session.cursor_count())
        });
}

#[divan::bench(args = [10, 100, 1_000])]
fn undo_replicated_change(bencher: divan::Bencher, cursor_count: usize) {
    bencher
        .with_inputs(|| {
            let mut session = session_with_cursors(cursor_count);
            session.submit_all([
                EditCommand::DeleteSelection,
                EditCommand::Undo,
                EditCommand::Redo,
            ]);
            session.run_pending();
            session
        })
        .bench_local_values(|mut session| divan::black_box(session.execute(EditCommand::Undo)));
}

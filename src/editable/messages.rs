//! Command types consumed by the session's command queue.

use super::selection::VisualKind;

/// Target for replicated cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    /// Move one character left (h)
    Left,
    /// Move one character right (l)
    Right,
    /// Move one line up (k)
    Up,
    /// Move one line down (j)
    Down,
    /// Move to start of line (0)
    LineStart,
    /// Move to end of line ($)
    LineEnd,
    /// Move to the start of the next word (w)
    WordForward,
    /// Move to the start of the previous word (b)
    WordBackward,
}

/// Where `EnterInsert` places each cursor before typing starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the cursor (i)
    Before,
    /// After the character under the cursor (a)
    After,
    /// At the first non-blank of the line (I)
    LineStart,
    /// At the end of the line (A)
    LineEnd,
}

/// Editing commands. Each one is replicated to every active cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    // === Insert mode typing ===
    /// Insert a single character at every cursor
    InsertChar(char),
    /// Type a string; expanded into one `InsertChar` per character
    InsertText(String),
    /// Insert a line break at every cursor
    InsertNewline,
    /// Delete N characters before every cursor (Backspace)
    DeleteBackward(usize),
    /// Delete N characters at every cursor (Delete / x)
    DeleteForward(usize),

    // === Mode changes ===
    /// Enter visual mode of the given kind (v / V); toggles off if already in it
    EnterVisual(VisualKind),
    /// Enter insert mode (i / a / I / A)
    EnterInsert(InsertPosition),
    /// Open a line below each cursor and start inserting there (o)
    OpenLineBelow,
    /// Open a line above each cursor and start inserting there (O)
    OpenLineAbove,
    /// Leave insert or visual mode (Esc in those modes)
    ExitInsert,
    /// Esc: like `ExitInsert`, and from normal mode collapses the cursor set
    Escape,

    // === Selection edits ===
    /// Delete every cursor's selection and start inserting (c)
    ReplaceSelection,
    /// Delete every cursor's selection and return to normal mode (d)
    DeleteSelection,

    // === Movement ===
    /// Move every cursor; extends selections in visual mode
    Move(MoveTarget),

    // === Undo/Redo ===
    /// Undo the last transaction
    Undo,
    /// Redo the last undone transaction
    Redo,
}

impl EditCommand {
    /// Short name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            EditCommand::InsertChar(_) => "insert-char",
            EditCommand::InsertText(_) => "insert-text",
            EditCommand::InsertNewline => "newline",
            EditCommand::DeleteBackward(_) => "delete-backward",
            EditCommand::DeleteForward(_) => "delete-forward",
            EditCommand::EnterVisual(_) => "enter-visual",
            EditCommand::EnterInsert(_) => "enter-insert",
            EditCommand::OpenLineBelow => "open-line-below",
            EditCommand::OpenLineAbove => "open-line-above",
            EditCommand::ExitInsert => "exit-insert",
            EditCommand::Escape => "escape",
            EditCommand::ReplaceSelection => "replace-selection",
            EditCommand::DeleteSelection => "delete-selection",
            EditCommand::Move(_) => "move",
            EditCommand::Undo => "undo",
            EditCommand::Redo => "redo",
        }
    }

    /// Check if this command can modify the buffer
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            EditCommand::InsertChar(_)
                | EditCommand::InsertText(_)
                | EditCommand::InsertNewline
                | EditCommand::DeleteBackward(_)
                | EditCommand::DeleteForward(_)
                | EditCommand::OpenLineBelow
                | EditCommand::OpenLineAbove
                | EditCommand::ReplaceSelection
                | EditCommand::DeleteSelection
                | EditCommand::Undo
                | EditCommand::Redo
        )
    }

    /// Check if this command is a movement operation
    pub fn is_movement(&self) -> bool {
        matches!(self, EditCommand::Move(_))
    }
}

/// Commands that shape the cursor set itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorCommand {
    /// Add a cursor at the next occurrence (C-n). Without a pattern, reuses the
    /// set's pattern or the word under the cursor.
    AddNext(Option<String>),
    /// Replace the set with one cursor per occurrence
    FindAll(String),
    /// Drop the primary cursor and add the next occurrence instead (C-x)
    SkipNext,
    /// Remove the most recently added cursor (C-p)
    RemoveLastAdded,
    /// Discard all cursors but the primary
    Collapse,
}

impl CursorCommand {
    pub fn name(&self) -> &'static str {
        match self {
            CursorCommand::AddNext(_) => "add-next",
            CursorCommand::FindAll(_) => "find-all",
            CursorCommand::SkipNext => "skip-next",
            CursorCommand::RemoveLastAdded => "remove-last-added",
            CursorCommand::Collapse => "collapse",
        }
    }
}

/// Anything the session queue accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Edit(EditCommand),
    Cursors(CursorCommand),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Edit(cmd) => cmd.name(),
            Command::Cursors(cmd) => cmd.name(),
        }
    }
}

impl From<EditCommand> for Command {
    fn from(cmd: EditCommand) -> Self {
        Command::Edit(cmd)
    }
}

impl From<CursorCommand> for Command {
    fn from(cmd: CursorCommand) -> Self {
        Command::Cursors(cmd)
    }
}

//! Edit history (undo/redo) for replicated edits.
//!
//! Each replicated command produces one [`EditRecord`] per cursor it changed
//! the buffer at, in application order. Records are grouped into a
//! [`Transaction`] which undoes and redoes as one step.

use super::buffer::Buffer;

/// A single primitive edit, in char offsets valid at the moment it was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    /// Char offset where the edit occurred
    pub offset: usize,
    /// Text that was deleted (empty for pure inserts)
    pub deleted: String,
    /// Text that was inserted (empty for pure deletes)
    pub inserted: String,
}

impl EditRecord {
    pub fn insert(offset: usize, text: String) -> Self {
        Self {
            offset,
            deleted: String::new(),
            inserted: text,
        }
    }

    pub fn delete(offset: usize, text: String) -> Self {
        Self {
            offset,
            deleted: text,
            inserted: String::new(),
        }
    }

    /// Get the inverse operation for undo
    pub fn inverse(&self) -> Self {
        Self {
            offset: self.offset,
            deleted: self.inserted.clone(),
            inserted: self.deleted.clone(),
        }
    }

    /// Apply the record to a buffer
    pub fn apply(&self, buffer: &mut Buffer) {
        let deleted_len = self.deleted.chars().count();
        buffer.remove_chars(self.offset..self.offset + deleted_len);
        buffer.insert_chars(self.offset, &self.inserted);
    }
}

/// A group of records undone/redone together, with the cursor state on either side.
#[derive(Debug, Clone)]
pub struct Transaction<S> {
    pub records: Vec<EditRecord>,
    pub before: S,
    pub after: S,
}

impl<S: Clone> Transaction<S> {
    /// Open a transaction; `after` starts equal to `before`
    pub fn begin(before: S) -> Self {
        Self {
            records: Vec::new(),
            after: before.clone(),
            before,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-apply the records in order
    pub fn redo(&self, buffer: &mut Buffer) {
        for record in &self.records {
            record.apply(buffer);
        }
    }

    /// Apply the inverse of each record, last first
    pub fn undo(&self, buffer: &mut Buffer) {
        for record in self.records.iter().rev() {
            record.inverse().apply(buffer);
        }
    }
}

/// Edit history with undo/redo stacks.
#[derive(Debug, Clone)]
pub struct EditHistory<S> {
    undo_stack: Vec<Transaction<S>>,
    redo_stack: Vec<Transaction<S>>,
    max_size: usize,
}

impl<S> EditHistory<S> {
    /// Create a new edit history with default max size
    pub fn new() -> Self {
        Self::with_max_size(1000)
    }

    /// Create a new edit history with specified max size
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Push a transaction onto the undo stack (clears redo stack)
    pub fn push(&mut self, tx: Transaction<S>) {
        self.redo_stack.clear();
        self.undo_stack.push(tx);

        // Trim if exceeded max size
        if self.undo_stack.len() > self.max_size {
            let excess = self.undo_stack.len() - self.max_size;
            self.undo_stack.drain(..excess);
        }
    }

    /// Pop a transaction to undo (moves it to the redo stack)
    pub fn pop_undo(&mut self) -> Option<&Transaction<S>> {
        let tx = self.undo_stack.pop()?;
        self.redo_stack.push(tx);
        self.redo_stack.last()
    }

    /// Pop a transaction to redo (moves it back to the undo stack)
    pub fn pop_redo(&mut self) -> Option<&Transaction<S>> {
        let tx = self.redo_stack.pop()?;
        self.undo_stack.push(tx);
        self.undo_stack.last()
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Get the number of transactions in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of transactions in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }
}

impl<S> Default for EditHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

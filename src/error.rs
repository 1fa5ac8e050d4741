//! Recoverable engine errors.
//!
//! None of these leave the session in a broken state: the offending command
//! is ignored and the buffer and cursors are exactly as they were.

use crate::model::Mode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// add-next, skip or find-all found no occurrence without a cursor
    NoMatchFound { pattern: String },
    /// No pattern given and no word under the cursor to use instead
    EmptyPattern,
    /// The command is not accepted in the current mode
    InvalidMode { command: &'static str, mode: Mode },
    NothingToUndo,
    NothingToRedo,
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::NoMatchFound { pattern } => write!(f, "No match found: {}", pattern),
            EngineError::EmptyPattern => write!(f, "Empty search pattern"),
            EngineError::InvalidMode { command, mode } => {
                write!(f, "Command '{}' is not available in {} mode", command, mode)
            }
            EngineError::NothingToUndo => write!(f, "Already at oldest change"),
            EngineError::NothingToRedo => write!(f, "Already at newest change"),
        }
    }
}

impl std::error::Error for EngineError {}

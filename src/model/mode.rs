//! Editing mode of a session

use serde::Serialize;

use crate::editable::VisualKind;

/// Current editing mode. Cursors carry a selection anchor iff the mode is `Visual`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Mode {
    #[default]
    Normal,
    Visual(VisualKind),
    Insert,
}

impl Mode {
    pub fn is_visual(&self) -> bool {
        matches!(self, Mode::Visual(_))
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Mode::Insert)
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Mode::Normal)
    }

    /// Visual kind, if in a visual mode
    pub fn visual_kind(&self) -> Option<VisualKind> {
        match self {
            Mode::Visual(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Normal => write!(f, "normal"),
            Mode::Visual(VisualKind::CharWise) => write!(f, "visual"),
            Mode::Visual(VisualKind::LineWise) => write!(f, "visual line"),
            Mode::Insert => write!(f, "insert"),
        }
    }
}

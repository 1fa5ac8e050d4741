//! Session state: mode, multi-cursor set and the session that owns them.

pub mod cursor_set;
pub mod mode;
pub mod session;

pub use cursor_set::MultiCursorSet;
pub use mode::Mode;
pub use session::{CursorState, CursorView, Session, SessionSnapshot, HOME_CURSOR_ID};

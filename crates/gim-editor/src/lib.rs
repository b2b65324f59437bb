//! gim-editor — the editing core of gim.
//!
//! Rows with their tab-expanded render projection, the buffer that keeps
//! indices/highlighting/dirty state consistent through every edit, the
//! editor state machine (cursor, scroll, status, quit confirmation), the
//! incremental find, and the viewport that paints frames into an output
//! buffer. Nothing in here touches a real terminal — the binary owns
//! that boundary — so the whole crate runs under plain unit tests.

pub mod buffer;
pub mod editor;
pub mod row;
pub mod search;
pub mod view;

pub use buffer::{Buffer, UNNAMED};
pub use editor::{CursorSnapshot, Editor, QUIT_CONFIRM_TIMES};
pub use row::{Row, TAB_STOP};

//! Session collaborators: the audit log, the clipboard seam, and the
//! terminal bootstrap. Everything here is created once at startup and
//! threaded into the interpreter as explicit state.

mod clipboard;
mod log;
mod terminal;

pub use clipboard::{Clipboard, MemClipboard, OsClipboard};
pub use log::{SessionLog, LOG_FILE};
pub use terminal::relaunch_in_terminal;

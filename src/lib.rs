//! # Walkbook
//!
//! Guided runbook walker - step through manual procedures with live values
//! and clipboard staging.
//!
//! Walkbook interprets a plain-text runbook script one line at a time.
//! Each line is a directive, classified by its first character:
//!
//! - `# text` prints a heading
//! - `!cmd args` launches a detached background command
//! - `$name=prompt` asks the operator for a value
//! - anything else is staged on the clipboard, ready to paste, and the
//!   interpreter pauses until the operator continues
//!
//! Lines can reference previously collected variables as `$name` and the
//! reserved `${DATETIME...}` token for the current time in a chosen
//! timezone. Every line is rendered twice: decorated for the screen and
//! plain for execution, logging, and the clipboard.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::doc_markdown)]

pub mod interp;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use interp::{Directive, Interpreter, Rendered, Value, VarStore};
pub use session::{Clipboard, MemClipboard, OsClipboard, SessionLog};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "walkbook";

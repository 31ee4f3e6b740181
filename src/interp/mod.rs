//! The line interpreter and variable-substitution engine.
//!
//! A script is processed strictly line by line: substitution produces a
//! decorated and a plain rendering, classification reads the plain form,
//! and one of four handlers acts on it.

mod datetime;
mod directive;
mod interpreter;
mod store;
mod subst;

pub use datetime::{resolve_first, DateError, DateMatch, STAMP_FORMAT};
pub use directive::{classify, Directive};
pub use interpreter::Interpreter;
pub use store::{Value, VarStore, SCRIPT_CHECKSUM_VAR, SCRIPT_PATH_VAR};
pub use subst::{substitute, Rendered};

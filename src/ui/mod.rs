//! Screen decoration.
//!
//! Pure text-in, styled-text-out helpers. Every handler funnels its screen
//! output through these so the visual language stays in one place and the
//! substitution engine can treat "decorate" as an opaque function.

use crossterm::style::Stylize;

/// Style a heading line.
pub fn heading(text: &str) -> String {
    text.green().to_string()
}

/// Style an informational notice (command announcements).
pub fn notice(text: &str) -> String {
    text.yellow().to_string()
}

/// Style an operator prompt (variable questions).
pub fn prompt(text: &str) -> String {
    text.magenta().to_string()
}

/// Style the continuation prompt shown after staging text.
pub fn pause(text: &str) -> String {
    text.blue().to_string()
}

/// Style a substituted value inside a decorated rendering.
pub fn value(text: &str) -> String {
    text.magenta().to_string()
}

/// Style an error line.
pub fn error(text: &str) -> String {
    text.red().to_string()
}

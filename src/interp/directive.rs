//! Directive classification.
//!
//! A substituted line becomes exactly one of four directives, decided by
//! the first character of its plain rendering. Flat dispatch: each line is
//! classified on its own, with no cross-line state.

use super::subst::Rendered;

/// One classified script line, ready for its handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `#` line: print as a heading.
    Heading { decorated: String },

    /// `!` line: launch a detached shell command.
    Command { plain: String },

    /// `$name=prompt` line: ask the operator for a value.
    ReadVar { name: String, prompt: String },

    /// Anything else: stage the text on the clipboard and pause.
    Stage { plain: String, decorated: String },
}

/// Classify a substituted line by the first character of its plain form.
///
/// Classification never reads the decorated form; styling must not be able
/// to change what a line does. A `$` line without `=` falls through to the
/// default stage directive.
pub fn classify(line: &Rendered) -> Directive {
    match line.plain.chars().next() {
        Some('#') => Directive::Heading {
            decorated: line.decorated.strip_prefix('#').unwrap_or(&line.decorated).trim().to_string(),
        },
        Some('!') => Directive::Command { plain: line.plain[1..].trim().to_string() },
        Some('$') => match line.plain[1..].split_once('=') {
            Some((name, prompt)) => Directive::ReadVar {
                name: name.trim().to_string(),
                prompt: prompt.trim().to_string(),
            },
            None => stage(line),
        },
        _ => stage(line),
    }
}

fn stage(line: &Rendered) -> Directive {
    Directive::Stage {
        plain: line.plain.trim().to_string(),
        decorated: line.decorated.trim().to_string(),
    }
}

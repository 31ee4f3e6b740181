//! Two-rendering substitution.
//!
//! Every script line is expanded twice in lockstep: once styled for the
//! operator's screen and once plain. The plain form is what gets executed,
//! logged, and staged on the clipboard, so the two renderings must carry
//! character-identical substituted values.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::ui;

use super::datetime::{self, DateError};
use super::store::VarStore;

/// The two derived forms of a script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Styled for the operator's screen.
    pub decorated: String,

    /// Verbatim values only, no styling markup.
    pub plain: String,
}

/// Substitute the date token and store variables into `line`.
///
/// A date-resolution failure is reported alongside the renderings so the
/// caller can audit it; the token itself stays literal in both copies.
pub fn substitute(line: &str, store: &VarStore) -> (Rendered, Option<DateError>) {
    substitute_at(line, store, Utc::now())
}

/// Substitution with an explicit evaluation instant.
pub(crate) fn substitute_at(
    line: &str,
    store: &VarStore,
    now: DateTime<Utc>,
) -> (Rendered, Option<DateError>) {
    let mut decorated = line.to_string();
    let mut plain = line.to_string();
    let mut date_err = None;

    // Pass one: the first ${DATETIME...} token, rendered once and spliced
    // into both copies so the instant is identical.
    match datetime::resolve_first(line, now) {
        Ok(Some(m)) => {
            decorated =
                format!("{}{}{}", &line[..m.start], ui::value(&m.value), &line[m.end..]);
            plain = format!("{}{}{}", &line[..m.start], m.value, &line[m.end..]);
        }
        Ok(None) => {}
        Err(e) => date_err = Some(e),
    }

    // Pass two: one alternation over every store name, longest first so a
    // name never shadows another it is a prefix of. A single pass also
    // means an inserted value is never re-scanned for further tokens.
    if !store.is_empty() {
        let names = store.names_longest_first();
        let rendered: BTreeMap<&str, String> = names
            .iter()
            .map(|name| (*name, store.get(name).map(super::Value::render).unwrap_or_default()))
            .collect();

        let pattern = format!(
            r"\$({})",
            names.iter().map(|n| regex::escape(n)).collect::<Vec<_>>().join("|")
        );
        // names come straight from the store, so the pattern is always valid
        let token = Regex::new(&pattern).unwrap();

        decorated = token
            .replace_all(&decorated, |caps: &regex::Captures| {
                ui::value(rendered.get(&caps[1]).map(String::as_str).unwrap_or_default())
            })
            .to_string();
        plain = token
            .replace_all(&plain, |caps: &regex::Captures| {
                rendered.get(&caps[1]).cloned().unwrap_or_default()
            })
            .to_string();
    }

    (Rendered { decorated, plain }, date_err)
}

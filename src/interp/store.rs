//! Variable store for an interpreter session.
//!
//! Holds every value available for `$name` substitution: operator answers,
//! bootstrap values seeded at startup, and clock-backed entries that
//! re-evaluate on every render.

use std::collections::BTreeMap;

use chrono::Utc;
use chrono_tz::Tz;

use super::datetime::STAMP_FORMAT;

/// Bootstrap variable holding the resolved script path.
pub const SCRIPT_PATH_VAR: &str = "{SCRIPT_PATH}";

/// Bootstrap variable holding the script's SHA-256 checksum.
pub const SCRIPT_CHECKSUM_VAR: &str = "{SCRIPT_CHECKSUM}";

/// A renderable value bound to a variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Fixed text captured at assignment time.
    Static(String),

    /// Current wall-clock time in the bound timezone, re-evaluated on
    /// every render (never cached).
    DynamicTime(Tz),
}

impl Value {
    /// Produce the value's current text.
    pub fn render(&self) -> String {
        match self {
            Value::Static(text) => text.clone(),
            Value::DynamicTime(tz) => Utc::now().with_timezone(tz).format(STAMP_FORMAT).to_string(),
        }
    }
}

/// Mapping from variable name to value.
///
/// Later writes overwrite earlier ones; values live for the process
/// lifetime. Iteration is deterministic (sorted by name), and substitution
/// re-sorts by length so that longer names always win over their prefixes.
#[derive(Debug, Default)]
pub struct VarStore {
    vars: BTreeMap<String, Value>,
}

impl VarStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a value, overwriting any previous binding.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    /// Assign a static string value.
    pub fn set_static(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.set(name, Value::Static(text.into()));
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Whether the store has no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Number of variables in the store.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Variable names sorted longest-first, ties broken alphabetically.
    ///
    /// This is the substitution order: a name that is a prefix of another
    /// (`$A` vs `$AB`) must never shadow the longer one.
    pub fn names_longest_first(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.vars.keys().map(String::as_str).collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names
    }
}

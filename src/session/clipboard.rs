//! Clipboard access behind a write-only seam.
//!
//! The interpreter only ever writes. Going through a trait keeps the OS
//! clipboard out of unit tests and pins down the one capability the stage
//! handler actually needs.

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

/// Write-only clipboard surface.
pub trait Clipboard {
    /// Place `text` on the clipboard as UTF-8.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// OS clipboard backed by `arboard`.
pub struct OsClipboard {
    inner: arboard::Clipboard,
}

impl OsClipboard {
    /// Connect to the OS clipboard. Failure here is fatal to startup.
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().context("unable to initialize clipboard")?;
        Ok(Self { inner })
    }
}

impl Clipboard for OsClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner.set_text(text).context("unable to write clipboard")?;
        Ok(())
    }
}

/// In-memory clipboard for tests.
///
/// Clones share the same backing cell, so a test can keep a handle while
/// the interpreter owns another.
#[derive(Debug, Clone, Default)]
pub struct MemClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemClipboard {
    /// Create an empty in-memory clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently staged text.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().unwrap().clone()
    }
}

impl Clipboard for MemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        *self.contents.lock().unwrap() = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_clipboard_overwrites() {
        let mut clip = MemClipboard::new();
        assert_eq!(clip.contents(), None);

        clip.set_text("first").unwrap();
        clip.set_text("second").unwrap();
        assert_eq!(clip.contents(), Some("second".to_string()));
    }

    #[test]
    fn test_mem_clipboard_clones_share_state() {
        let clip = MemClipboard::new();
        let mut writer = clip.clone();

        writer.set_text("shared").unwrap();
        assert_eq!(clip.contents(), Some("shared".to_string()));
    }
}

//! Append-only session log.
//!
//! The log is an operator-facing audit artifact, separate from tracing
//! diagnostics: it records what was staged, what was answered, and when
//! the run completed. Opened once at startup, closed once at shutdown.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

/// Default log file name, created in the working directory.
pub const LOG_FILE: &str = "log.txt";

/// The session's audit log.
#[derive(Debug)]
pub struct SessionLog {
    out: File,
}

impl SessionLog {
    /// Create (truncating) the log file. Failure here is fatal to startup.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let out = File::create(path)
            .with_context(|| format!("unable to create session log {}", path.display()))?;
        Ok(Self { out })
    }

    /// Append one staged or bootstrap line.
    pub fn line(&mut self, text: &str) {
        self.write(text);
    }

    /// Record an operator answer as `prompt = value`.
    pub fn assignment(&mut self, prompt: &str, value: &str) {
        self.write(&format!("{prompt} = {value}"));
    }

    /// Record a per-line resolution error.
    pub fn error(&mut self, message: &str) {
        self.write(&format!("ERROR: {message}"));
    }

    /// Record the completion timestamp and flush.
    pub fn completed(&mut self) -> Result<()> {
        self.write(&format!("Completed: {}", Local::now()));
        self.out.flush().context("unable to flush session log")?;
        Ok(())
    }

    fn write(&mut self, text: &str) {
        // log writes must never take the interpreter down
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "session log write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_records_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");

        let mut log = SessionLog::create(&path).unwrap();
        log.line("Using script: /ops/restore.wb");
        log.assignment("What is your name?", "Bob123!");
        log.error("unable to load timezone ZZZ");
        log.completed().unwrap();
        drop(log);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "Using script: /ops/restore.wb");
        assert_eq!(lines[1], "What is your name? = Bob123!");
        assert_eq!(lines[2], "ERROR: unable to load timezone ZZZ");
        assert!(lines[3].starts_with("Completed: "));
    }

    #[test]
    fn test_create_fails_in_missing_directory() {
        let result = SessionLog::create("/definitely/not/a/dir/log.txt");
        assert!(result.is_err());
    }
}

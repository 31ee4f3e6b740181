//! The interpreter loop and its four directive handlers.
//!
//! Strictly sequential: one line is substituted, classified, and handled
//! before the next is read. The only concurrency is the fire-and-forget
//! command handler, whose children are deliberately never waited on.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::session::{Clipboard, SessionLog};
use crate::ui;

use super::directive::{classify, Directive};
use super::store::{VarStore, SCRIPT_CHECKSUM_VAR, SCRIPT_PATH_VAR};
use super::subst;

/// One interpreter session: the variable store plus the collaborators the
/// handlers need. Created once at startup, torn down once at shutdown.
pub struct Interpreter {
    store: VarStore,
    log: SessionLog,
    clipboard: Box<dyn Clipboard>,
    input: Box<dyn BufRead>,
    screen: Box<dyn Write>,
}

impl Interpreter {
    /// Create an interpreter over an operator input stream and screen.
    pub fn new(
        log: SessionLog,
        clipboard: Box<dyn Clipboard>,
        input: Box<dyn BufRead>,
        screen: Box<dyn Write>,
    ) -> Self {
        Self { store: VarStore::new(), log, clipboard, input, screen }
    }

    /// The variable store.
    pub fn store(&self) -> &VarStore {
        &self.store
    }

    /// Mutable access to the variable store, for startup seeding.
    pub fn store_mut(&mut self) -> &mut VarStore {
        &mut self.store
    }

    /// Resolve and verify the script path, re-prompting until one loads.
    ///
    /// Seeds `{SCRIPT_CHECKSUM}` on success and records both bootstrap
    /// values in the session log.
    pub fn acquire_script(&mut self) -> PathBuf {
        loop {
            let entered = self
                .store
                .get(SCRIPT_PATH_VAR)
                .map(super::Value::render)
                .unwrap_or_default();
            let path = shellexpand::tilde(entered.trim_matches(|c| c == '"' || c == '\''))
                .into_owned();

            match script_checksum(Path::new(&path)) {
                Ok(checksum) => {
                    self.log.line(&format!("Using script: {path}"));
                    self.log.line(&format!("Checksum: {checksum}"));
                    self.store.set_static(SCRIPT_PATH_VAR, path.clone());
                    self.store.set_static(SCRIPT_CHECKSUM_VAR, checksum);
                    return PathBuf::from(path);
                }
                Err(e) => {
                    if !entered.is_empty() {
                        self.show(&ui::error(&format!("script not usable: {e:#}")));
                    }
                    self.read_var(SCRIPT_PATH_VAR, "Enter path to script");
                }
            }
        }
    }

    /// Interpret every line of the script at `path`.
    ///
    /// Open and read failures abandon the rest of the script; the session
    /// itself carries on to the completion banner.
    pub fn run_file(&mut self, path: &Path) {
        if let Err(e) = self.try_run_file(path) {
            tracing::warn!(error = %e, "script abandoned");
            self.log.error(&format!("script abandoned: {e}"));
            self.show(&ui::error(&format!("script abandoned: {e}")));
        }
    }

    fn try_run_file(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("unable to open script {}", path.display()))?;

        for line in BufReader::new(file).lines() {
            let line = line.context("unable to read script line")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.process_line(line);
        }

        Ok(())
    }

    /// Substitute, classify, and handle one non-blank line.
    pub fn process_line(&mut self, raw: &str) {
        let (rendered, date_err) = subst::substitute(raw, &self.store);
        if let Some(e) = date_err {
            tracing::warn!(error = %e, "date token left unresolved");
            self.log.error(&e.to_string());
        }

        match classify(&rendered) {
            Directive::Heading { decorated } => self.print_heading(&decorated),
            Directive::Command { plain } => self.run_command(&plain),
            Directive::ReadVar { name, prompt } => self.read_var(&name, &prompt),
            Directive::Stage { plain, decorated } => self.stage(&plain, &decorated),
        }
    }

    /// Flush the completion record and hold the session open.
    ///
    /// Blocks until the operator's input stream closes, so a double-click
    /// launch keeps its window (and the staged text) on screen.
    pub fn finish(mut self) -> Result<()> {
        self.log.completed()?;

        self.show(&ui::heading("Script complete"));
        self.prompt(&ui::pause("Press Ctrl-C to end and close this window..."));

        let _ = io::copy(&mut self.input, &mut io::sink());
        Ok(())
    }

    fn print_heading(&mut self, text: &str) {
        self.show(&ui::heading(text));
    }

    /// Launch a command and immediately let go of it.
    ///
    /// The child is never waited on; failures after a successful spawn are
    /// unobservable by design.
    fn run_command(&mut self, command: &str) {
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return;
        };

        self.show(&ui::notice(&format!("Executing command: {command}")));

        match Command::new(program).args(parts).spawn() {
            Ok(child) => drop(child),
            Err(e) => {
                tracing::warn!(command, error = %e, "unable to start command");
                self.log.error(&format!("unable to start command {command}: {e}"));
                self.show(&ui::error(&format!("unable to start command: {e}")));
            }
        }
    }

    /// Ask the operator for a value and store the sanitized answer.
    fn read_var(&mut self, name: &str, prompt: &str) {
        self.prompt(&format!("{}: ", ui::prompt(prompt)));

        let mut response = String::new();
        if let Err(e) = self.input.read_line(&mut response) {
            tracing::warn!(error = %e, "unable to read operator input");
            return;
        }

        let response = sanitize(&response);
        self.log.assignment(prompt, response);
        self.store.set_static(name, response);
    }

    /// Stage text on the clipboard and block until the operator continues.
    fn stage(&mut self, plain: &str, decorated: &str) {
        self.log.line(plain);

        if let Err(e) = self.clipboard.set_text(plain) {
            tracing::warn!(error = %e, "clipboard write failed");
            self.log.error(&format!("clipboard write failed: {e}"));
        }

        self.show(decorated);
        self.prompt(&format!("\n{}", ui::pause("Press Enter to continue...")));

        let mut ack = String::new();
        let _ = self.input.read_line(&mut ack);
    }

    /// Write one line to the operator's screen.
    fn show(&mut self, text: &str) {
        // screen writes must never take the interpreter down
        let _ = writeln!(self.screen, "{text}");
    }

    /// Write a prompt without a trailing newline and flush it out.
    fn prompt(&mut self, text: &str) {
        let _ = write!(self.screen, "{text}");
        let _ = self.screen.flush();
    }
}

/// Trim stray quoting and control characters from operator input.
///
/// Strips from both ends any character that is a quote mark or is neither
/// alphanumeric nor punctuation; interior characters are untouched.
fn sanitize(input: &str) -> &str {
    input.trim_matches(|c: char| {
        c == '\'' || c == '"' || !(c.is_alphanumeric() || c.is_ascii_punctuation())
    })
}

/// SHA-256 of the script file, lowercase hex.
fn script_checksum(path: &Path) -> Result<String> {
    let data = std::fs::read(path)
        .with_context(|| format!("unable to read script {}", path.display()))?;
    Ok(format!("{:x}", Sha256::digest(&data)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemClipboard;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Screen sink the test can keep a handle on while the interpreter
    /// owns another, like `MemClipboard`.
    #[derive(Debug, Clone, Default)]
    struct SharedScreen(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedScreen {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Fixture {
        dir: TempDir,
        clipboard: MemClipboard,
        screen: SharedScreen,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                clipboard: MemClipboard::new(),
                screen: SharedScreen::default(),
            }
        }

        fn interpreter(&self, operator_input: &str) -> Interpreter {
            let log = SessionLog::create(self.dir.path().join("log.txt")).unwrap();
            Interpreter::new(
                log,
                Box::new(self.clipboard.clone()),
                Box::new(Cursor::new(operator_input.to_string().into_bytes())),
                Box::new(self.screen.clone()),
            )
        }

        fn log_contents(&self) -> String {
            std::fs::read_to_string(self.dir.path().join("log.txt")).unwrap()
        }

        fn screen_contents(&self) -> String {
            String::from_utf8_lossy(&self.screen.0.lock().unwrap()).to_string()
        }
    }

    #[test]
    fn test_sanitize_strips_quotes_and_whitespace() {
        assert_eq!(sanitize("  \"Bob123!\"  \n"), "Bob123!");
        assert_eq!(sanitize("'quoted'"), "quoted");
        assert_eq!(sanitize("plain"), "plain");
    }

    #[test]
    fn test_sanitize_keeps_interior_punctuation() {
        assert_eq!(sanitize("  db-01.internal:5432  "), "db-01.internal:5432");
        assert_eq!(sanitize("a\"b"), "a\"b");
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize("\u{7}beep\r\n"), "beep");
        assert_eq!(sanitize("\t tabbed \t"), "tabbed");
    }

    #[test]
    fn test_read_var_then_substitute() {
        let fx = Fixture::new();
        let mut interp = fx.interpreter("  \"Bob123!\"  \n\n");

        interp.process_line("$answer=What is your name?");
        assert_eq!(interp.store().get("answer").unwrap().render(), "Bob123!");

        interp.process_line("copy this $answer");
        assert_eq!(fx.clipboard.contents(), Some("copy this Bob123!".to_string()));

        let log = fx.log_contents();
        assert!(log.contains("What is your name? = Bob123!"));
        assert!(log.contains("copy this Bob123!"));
    }

    #[test]
    fn test_heading_is_printed_with_heading_style() {
        let fx = Fixture::new();
        let mut interp = fx.interpreter("");

        interp.process_line("# Replica restore");

        let screen = fx.screen_contents();
        assert!(screen.contains(&ui::heading("Replica restore")));
        assert_ne!(ui::heading("Replica restore"), "Replica restore");
    }

    #[test]
    fn test_finish_drains_remaining_operator_input() {
        let fx = Fixture::new();
        let interp = fx.interpreter("stray\ninput\nleft over\n");

        interp.finish().unwrap();

        assert!(fx.log_contents().contains("Completed: "));
        assert!(fx.screen_contents().contains("Ctrl-C"));
    }

    #[test]
    fn test_reassignment_overwrites() {
        let fx = Fixture::new();
        let mut interp = fx.interpreter("one\ntwo\n");

        interp.process_line("$v=First?");
        interp.process_line("$v=Second?");
        assert_eq!(interp.store().get("v").unwrap().render(), "two");
    }

    #[test]
    fn test_command_does_not_block() {
        let fx = Fixture::new();
        let mut interp = fx.interpreter("");

        // sleeps far longer than the test is allowed to take
        let start = std::time::Instant::now();
        interp.process_line("!sleep 30");
        assert!(start.elapsed() < std::time::Duration::from_secs(5));
    }

    #[test]
    fn test_failed_command_is_logged_and_skipped() {
        let fx = Fixture::new();
        let mut interp = fx.interpreter("\n");

        interp.process_line("!no-such-program-wb --flag");
        interp.process_line("still running");

        let log = fx.log_contents();
        assert!(log.contains("unable to start command no-such-program-wb --flag"));
        assert!(log.contains("still running"));
    }

    #[test]
    fn test_date_error_is_logged_and_line_staged_literal() {
        let fx = Fixture::new();
        let mut interp = fx.interpreter("\n");

        interp.process_line("when: ${DATETIME_ZZZ}");

        assert_eq!(fx.clipboard.contents(), Some("when: ${DATETIME_ZZZ}".to_string()));
        assert!(fx.log_contents().contains("ERROR: unable to load timezone ZZZ"));
    }

    #[test]
    fn test_run_file_skips_blank_lines() {
        let fx = Fixture::new();
        let script = fx.dir.path().join("steps.wb");
        std::fs::write(&script, "# One\n\n   \n# Two\n").unwrap();

        let mut interp = fx.interpreter("");
        interp.run_file(&script);

        // headings only print; nothing staged, nothing logged as an error
        assert!(!fx.log_contents().contains("ERROR"));
    }

    #[test]
    fn test_run_file_missing_script_is_not_fatal() {
        let fx = Fixture::new();
        let mut interp = fx.interpreter("");

        interp.run_file(Path::new("/definitely/not/here.wb"));
        assert!(fx.log_contents().contains("script abandoned"));
    }

    #[test]
    fn test_acquire_script_seeds_checksum() {
        let fx = Fixture::new();
        let script = fx.dir.path().join("steps.wb");
        std::fs::write(&script, "# hello\n").unwrap();

        let mut interp = fx.interpreter("");
        interp.store_mut().set_static(SCRIPT_PATH_VAR, script.to_str().unwrap());

        let resolved = interp.acquire_script();
        assert_eq!(resolved, script);

        let expected = format!("{:x}", Sha256::digest(b"# hello\n"));
        assert_eq!(interp.store().get(SCRIPT_CHECKSUM_VAR).unwrap().render(), expected);
        assert!(fx.log_contents().contains(&expected));
    }

    #[test]
    fn test_acquire_script_reprompts_on_bad_path() {
        let fx = Fixture::new();
        let script = fx.dir.path().join("steps.wb");
        std::fs::write(&script, "# hello\n").unwrap();

        // first answer is a bad path, second is the real one
        let operator = format!("/nope/missing.wb\n{}\n", script.display());
        let mut interp = fx.interpreter(&operator);
        interp.store_mut().set_static(SCRIPT_PATH_VAR, "");

        let resolved = interp.acquire_script();
        assert_eq!(resolved, script);
    }

    #[test]
    fn test_bootstrap_tokens_substitute_from_first_line() {
        let fx = Fixture::new();
        let script = fx.dir.path().join("steps.wb");
        std::fs::write(&script, "path is ${SCRIPT_PATH}\n").unwrap();

        let mut interp = fx.interpreter("\n");
        interp.store_mut().set_static(SCRIPT_PATH_VAR, script.to_str().unwrap());
        let resolved = interp.acquire_script();
        interp.run_file(&resolved);

        assert_eq!(
            fx.clipboard.contents(),
            Some(format!("path is {}", script.display()))
        );
    }
}

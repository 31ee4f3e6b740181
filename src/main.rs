//! Walkbook - guided runbook walker for manual operations.
//!
//! Reads a runbook script line by line: headings, background commands,
//! operator-collected variables, and clipboard-staged text with live
//! value substitution.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use walkbook::interp::{Interpreter, SCRIPT_PATH_VAR};
use walkbook::session::{self, OsClipboard, SessionLog};
use walkbook::ui;

/// Guided runbook walker for manual operations
#[derive(Parser)]
#[command(name = "walkbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the runbook script (prompted for when omitted)
    script: Option<String>,

    /// Session log file
    #[arg(long, default_value = session::LOG_FILE)]
    log_file: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    // Launched without a console (double-click): re-open ourselves inside
    // a terminal and let this process exit.
    if !io::stdin().is_terminal() {
        return session::relaunch_in_terminal();
    }

    // Both are fatal when unavailable; everything after this point is
    // recoverable per line.
    let log = SessionLog::create(&cli.log_file)?;
    let clipboard = OsClipboard::new()?;
    let input = Box::new(io::stdin().lock());
    let screen = Box::new(io::stdout());

    let mut interp = Interpreter::new(log, Box::new(clipboard), input, screen);
    interp.store_mut().set_static(SCRIPT_PATH_VAR, cli.script.unwrap_or_default());

    let script = interp.acquire_script();
    println!("{}", ui::heading(&format!("Walking {}", script.display())));

    interp.run_file(&script);
    interp.finish()
}

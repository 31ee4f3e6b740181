//! Terminal bootstrap.
//!
//! Runbooks are often launched by double-click, with no attached console.
//! When stdin is not a terminal we re-launch the executable inside a
//! platform terminal emulator, detach, and let the original process exit.

use std::env;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};

/// Re-launch the current executable inside a terminal emulator and detach.
///
/// The spawned child is never waited on; the caller exits right after.
pub fn relaunch_in_terminal() -> Result<()> {
    let exe = env::current_exe().context("unable to locate own executable")?;

    let mut cmd = if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.arg("/c").arg(&exe);
        cmd
    } else if cfg!(target_os = "macos") {
        let terminal = "/System/Applications/Utilities/Terminal.app/Contents/MacOS/Terminal";
        if !Path::new(terminal).exists() {
            bail!("unable to find Terminal.app; run from an interactive shell");
        }
        let mut cmd = Command::new(terminal);
        cmd.arg(&exe);
        cmd
    } else {
        let mut cmd = Command::new("xterm");
        cmd.arg("-e").arg(&exe);
        cmd
    };

    let child = cmd
        .spawn()
        .context("unable to launch a terminal; run from an interactive shell")?;
    drop(child);
    Ok(())
}

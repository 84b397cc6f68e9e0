//! Utility functions for use in other parts of tessella
use crate::Result;
use std::process::{Command, Stdio};
use tracing::info;

/// Run an external command as a child of the window manager process.
///
/// This redirects the process stdout and stderr to /dev/null. Children are
/// reaped automatically: SIGCHLD is set to ignore at startup.
pub fn spawn<S: Into<String>>(cmd: S) -> Result<()> {
    let s = cmd.into();
    info!(cmd = %s, "spawning subprocess");
    let parts: Vec<&str> = s.split_whitespace().collect();
    let result = if parts.len() > 1 {
        Command::new(parts[0])
            .args(&parts[1..])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    } else {
        Command::new(parts[0])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
    };

    match result {
        Ok(_) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

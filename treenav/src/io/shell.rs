//! Shell escape for the `shell` / `!` verb.

use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use tracing::{debug, instrument};

/// Run `line` through `sh -c` with the terminal attached.
#[instrument(skip_all)]
pub fn run_shell(line: &str) -> Result<ExitStatus> {
    debug!(command = line, "spawning shell");
    let status = Command::new("sh")
        .arg("-c")
        .arg(line)
        .status()
        .with_context(|| format!("run shell command `{}`", line))?;
    debug!(code = ?status.code(), "shell exited");
    Ok(status)
}

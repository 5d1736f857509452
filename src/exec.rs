//! Process execution collaborator.
//!
//! The sole effect of this crate is handing an argument vector to the
//! container runtime. Arguments are passed straight to the OS — nothing
//! here goes through a shell, so the command tokens are never
//! re-interpreted.

use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::error::Result;

/// Run `bin` with `args`, inheriting this process's standard streams, and
/// wait for it to finish.
pub fn run_inherited(bin: &Path, args: &[String]) -> Result<ExitStatus> {
    let status = Command::new(bin).args(args).status()?;
    Ok(status)
}

/// Exit code to propagate for a finished child, mirroring the shell
/// convention for signal deaths.
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or_else(|| {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return 128 + signal;
            }
            1
        }
        #[cfg(not(unix))]
        {
            1
        }
    })
}

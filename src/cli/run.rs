//! Launch path: merge config, resolve the runtime, build and exec.

use std::process::Command;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::{Config, apply_overrides, load_config, validate};
use crate::exec;
use crate::launch::{Host, InvocationBuilder, ResolvedRuntime, RuntimeResolver, ShellResolver};
use crate::paths::Paths;

use super::setup;

/// Launch the sandbox. `command` of `None` means an interactive shell,
/// resolved from the configured or detected shell preference.
///
/// Returns the container's exit code.
pub fn launch(overrides: Config, command: Option<Vec<String>>, interactive: bool) -> Result<i32> {
    let project_dir = std::env::current_dir().context("failed to get working directory")?;
    let paths = Paths::resolve()?;

    let mut cfg = load_config(&project_dir, &paths)?;
    apply_overrides(&mut cfg, overrides);
    validate(&cfg)?;

    if cfg.setup {
        match setup::run_wizard(&paths) {
            Ok(saved) => {
                // Setup answers fill in whatever the CLI did not already set.
                if !cfg.git_config {
                    cfg.git_config = saved.git_config;
                }
                if !cfg.gh_token {
                    cfg.gh_token = saved.gh_token;
                }
                if !cfg.ssh_agent {
                    cfg.ssh_agent = saved.ssh_agent;
                }
                if !cfg.no_network {
                    cfg.no_network = saved.no_network;
                }
                if !cfg.no_yolo {
                    cfg.no_yolo = saved.no_yolo;
                }
                validate(&cfg)?;
            }
            Err(e) if setup::was_cancelled(&e) => info!("setup cancelled; using current settings"),
            Err(e) => return Err(e),
        }
    }

    if cfg.scratch {
        warn!("scratch mode: /home/agent and /var/cache are ephemeral (data will not persist)");
        if cfg.readonly_project {
            warn!("scratch mode with readonly-project: /output is ephemeral (copy files out before exiting)");
        }
    }

    let runtime = RuntimeResolver::new().resolve(&cfg.runtime)?;
    check_runtime_memory(&runtime);

    let host = Host::capture(&cfg)?;

    let command = match command {
        Some(command) => command,
        None => {
            let choice = ShellResolver::new().resolve(&cfg.shell, host.env("SHELL"))?;
            if let Some(rejected) = &choice.rejected {
                warn!(
                    shell = %rejected,
                    fallback = %choice.shell,
                    "host shell is not available in the sandbox"
                );
            }
            vec![choice.shell]
        }
    };

    let invocation = InvocationBuilder::new(&cfg, &host, runtime.capabilities)
        .build(&project_dir, &command, interactive)?;

    let status = exec::run_inherited(&runtime.path, invocation.args())?;
    Ok(exec::exit_code(status))
}

/// Warn when the runtime VM is too small for heavy agent workloads. Purely
/// advisory; any failure to probe is ignored.
fn check_runtime_memory(runtime: &ResolvedRuntime) {
    if !runtime.capabilities.fixed_memory_budget {
        return;
    }

    let Ok(output) = Command::new(&runtime.path)
        .args(["info", "--format", "{{.MemTotal}}"])
        .output()
    else {
        return;
    };
    if !output.status.success() {
        return;
    }
    let Ok(bytes) = String::from_utf8_lossy(&output.stdout).trim().parse::<i64>() else {
        return;
    };

    let gib = bytes as f64 / (1024.0 * 1024.0 * 1024.0);
    if gib < 3.5 {
        warn!(
            "runtime VM has only {gib:.1}GiB RAM; heavy agents may be OOM killed. \
             Increase it to 4GiB+ for best results"
        );
    }
}

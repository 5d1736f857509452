//! `cordon setup` — interactive configuration saved to the global file.
//!
//! Prompts degrade to plain stdin when inquire cannot drive the terminal.

use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::config::{Config, load_global};
use crate::paths::Paths;

#[derive(Debug, thiserror::Error)]
#[error("setup cancelled")]
struct Cancelled;

/// True when a wizard error was a user cancellation rather than a failure.
pub fn was_cancelled(e: &anyhow::Error) -> bool {
    e.downcast_ref::<Cancelled>().is_some()
}

/// Standalone `cordon setup` entry point.
pub fn run() -> Result<()> {
    let paths = Paths::resolve()?;
    match run_wizard(&paths) {
        Ok(_) => {
            println!(
                "Saved to {}. Run `cordon setup` anytime to change these settings.",
                paths.global_config_file().display()
            );
            Ok(())
        }
        Err(e) if was_cancelled(&e) => {
            println!("Setup cancelled; nothing saved.");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Ask the questions, starting from the current global config, and persist
/// the answers. Returns the saved config.
pub fn run_wizard(paths: &Paths) -> Result<Config> {
    let mut cfg = load_global(paths)?;

    eprintln!();
    eprintln!("cordon setup — what do you want inside the box?");
    eprintln!();

    cfg.git_config = confirm("Copy git identity (~/.gitconfig)?", cfg.git_config)?;
    cfg.gh_token = confirm("Forward GitHub CLI token (gh auth)?", cfg.gh_token)?;
    cfg.ssh_agent = confirm("Forward SSH agent (for git over SSH)?", cfg.ssh_agent)?;
    cfg.no_network = confirm("Disable network access?", cfg.no_network)?;
    cfg.no_yolo = confirm("Disable auto-confirm in AI CLIs?", cfg.no_yolo)?;

    save_global(paths, &cfg)?;
    Ok(cfg)
}

/// Write the wizard-managed settings to the global config file. Only
/// non-default values are written, keeping the file minimal.
fn save_global(paths: &Paths, cfg: &Config) -> Result<()> {
    fs::create_dir_all(&paths.config_dir).with_context(|| {
        format!("failed to create config directory {}", paths.config_dir.display())
    })?;

    let mut lines = Vec::new();
    if cfg.git_config {
        lines.push("git_config = true".to_string());
    }
    if cfg.gh_token {
        lines.push("gh_token = true".to_string());
    }
    if cfg.ssh_agent {
        lines.push("ssh_agent = true".to_string());
    }
    if cfg.no_network {
        lines.push("no_network = true".to_string());
    }
    if !cfg.network.is_empty() {
        lines.push(format!("network = {:?}", cfg.network));
    }
    if cfg.no_yolo {
        lines.push("no_yolo = true".to_string());
    }

    let mut content = lines.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }

    fs::write(paths.global_config_file(), content).context("failed to write config")?;
    Ok(())
}

/// Yes/no prompt with inquire, falling back to plain stdin when the
/// terminal cannot host the fancy prompt.
fn confirm(message: &str, default: bool) -> Result<bool> {
    match inquire::Confirm::new(message).with_default(default).prompt() {
        Ok(answer) => Ok(answer),
        Err(
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted,
        ) => Err(Cancelled.into()),
        Err(_) => {
            let hint = if default { "Y/n" } else { "y/N" };
            eprint!("? {message} ({hint}) ");
            io::stderr().flush()?;
            let mut input = String::new();
            io::stdin().lock().read_line(&mut input)?;
            match input.trim().to_lowercase().as_str() {
                "y" | "yes" => Ok(true),
                "n" | "no" => Ok(false),
                _ => Ok(default),
            }
        }
    }
}

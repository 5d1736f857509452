//! Snapshot of the host-side facts an invocation depends on.
//!
//! Captured once per command so the builder works from immutable data: the
//! environment, TTY state, home directory, and any credentials extracted
//! from helper tools. Tests construct a [`Host`] directly instead of
//! mutating process-global state.

use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::Command;

use crate::config::Config;
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Host {
    /// The user's home directory.
    pub home: PathBuf,

    /// True when both stdin and stdout are terminals.
    pub stdio_tty: bool,

    /// GitHub CLI token, present only when requested and available.
    pub gh_token: Option<String>,

    /// Claude OAuth credentials from the macOS keychain, when requested.
    pub keychain_credentials: Option<String>,

    env: HashMap<String, String>,
}

impl Host {
    /// Capture the real host state for one invocation.
    ///
    /// Credential helpers are only consulted for forwarding the config asks
    /// for; a helper that is missing or not logged in yields `None` rather
    /// than an error.
    pub fn capture(config: &Config) -> Result<Self> {
        let home = etcetera::home_dir().map_err(|_| Error::NoHomeDir)?;
        let stdio_tty = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
        let env = std::env::vars().collect();
        let gh_token = config.gh_token.then(gh_auth_token).flatten();
        let keychain_credentials = config.claude_config.then(claude_keychain_credentials).flatten();

        Ok(Self {
            home,
            stdio_tty,
            gh_token,
            keychain_credentials,
            env,
        })
    }

    /// Synthetic host for tests.
    pub fn with_env(
        home: impl Into<PathBuf>,
        env: HashMap<String, String>,
        stdio_tty: bool,
    ) -> Self {
        Self {
            home: home.into(),
            stdio_tty,
            gh_token: None,
            keychain_credentials: None,
            env,
        }
    }

    /// Look up an environment variable from the snapshot.
    pub fn env(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}

/// Extract the GitHub CLI token from the host's credential store.
fn gh_auth_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// Extract Claude OAuth credentials from the macOS keychain.
#[cfg(target_os = "macos")]
fn claude_keychain_credentials() -> Option<String> {
    let output = Command::new("security")
        .args(["find-generic-password", "-s", "Claude Code-credentials", "-w"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let creds = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!creds.is_empty()).then_some(creds)
}

#[cfg(not(target_os = "macos"))]
fn claude_keychain_credentials() -> Option<String> {
    None
}

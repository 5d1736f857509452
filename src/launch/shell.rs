//! Container shell selection.
//!
//! An explicitly configured shell always wins and must be on the allow-list;
//! otherwise the host's `$SHELL` hint is consulted, falling back to a known
//! default when the hint names a shell the image does not ship.

use crate::error::{Error, Result};

/// Shells present in the container image.
pub const SUPPORTED_SHELLS: [&str; 3] = ["bash", "zsh", "fish"];

/// Used when nothing is configured and the host hint is absent or unusable.
pub const FALLBACK_SHELL: &str = "bash";

/// Outcome of shell resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellChoice {
    /// Shell binary name to invoke inside the container.
    pub shell: String,

    /// True when the choice came from the host's `$SHELL` hint.
    pub detected: bool,

    /// A host hint that was recognized but not supported, kept for display.
    pub rejected: Option<String>,
}

/// Maps a configured or detected shell preference onto the allow-list.
#[derive(Debug, Clone)]
pub struct ShellResolver {
    allowed: Vec<String>,
    fallback: String,
}

impl ShellResolver {
    /// Resolver over the shells the stock image ships.
    pub fn new() -> Self {
        Self::with_allow_list(
            SUPPORTED_SHELLS.iter().map(|s| s.to_string()).collect(),
            FALLBACK_SHELL,
        )
    }

    /// Resolver with a custom allow-list (for testing alternate policies).
    pub fn with_allow_list(allowed: Vec<String>, fallback: &str) -> Self {
        Self {
            allowed,
            fallback: fallback.to_string(),
        }
    }

    /// Resolve the shell to launch.
    ///
    /// `configured` is the config-file/CLI value (empty = unset);
    /// `shell_env` is the host's `$SHELL`, consulted only when nothing is
    /// configured.
    pub fn resolve(&self, configured: &str, shell_env: Option<&str>) -> Result<ShellChoice> {
        if !configured.is_empty() {
            if !self.allowed.iter().any(|s| s == configured) {
                return Err(Error::UnsupportedShell {
                    shell: configured.to_string(),
                    supported: self.allowed.join(", "),
                });
            }
            return Ok(ShellChoice {
                shell: configured.to_string(),
                detected: false,
                rejected: None,
            });
        }

        let hint = shell_env.unwrap_or_default().trim_end_matches('/');
        let name = hint.rsplit('/').next().unwrap_or_default();
        if name.is_empty() {
            return Ok(ShellChoice {
                shell: self.fallback.clone(),
                detected: false,
                rejected: None,
            });
        }

        if self.allowed.iter().any(|s| s == name) {
            return Ok(ShellChoice {
                shell: name.to_string(),
                detected: true,
                rejected: None,
            });
        }

        Ok(ShellChoice {
            shell: self.fallback.clone(),
            detected: false,
            rejected: Some(name.to_string()),
        })
    }
}

impl Default for ShellResolver {
    fn default() -> Self {
        Self::new()
    }
}

//! Container runtime discovery.
//!
//! Maps a configured runtime name (or empty for auto-detection) to a
//! concrete executable, and derives a capability record from the resolved
//! binary. The capability record is computed exactly once here so the
//! invocation builder can branch on data instead of re-matching binary
//! names in multiple places.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Engines probed, in order, when no runtime is configured.
pub const PROBE_ORDER: [&str; 3] = ["docker", "podman", "container"];

/// What the resolved runtime can do, beyond the common `docker run` surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeCapabilities {
    /// Whether single files can be bind-mounted. Apple's `container` can
    /// only mount directories; files go through a staging directory.
    pub supports_file_mounts: bool,

    /// Whether ssh-agent forwarding is a native flag rather than a socket
    /// mount.
    pub supports_native_ssh_forward: bool,

    /// Whether the engine runs in a VM with a fixed memory budget worth
    /// checking before launch. Apple's `container` sizes its VM dynamically.
    pub fixed_memory_budget: bool,
}

impl Default for RuntimeCapabilities {
    fn default() -> Self {
        // The docker/podman surface.
        Self {
            supports_file_mounts: true,
            supports_native_ssh_forward: false,
            fixed_memory_budget: true,
        }
    }
}

/// A runtime binary located on the search path, plus its capabilities.
#[derive(Debug, Clone)]
pub struct ResolvedRuntime {
    pub path: PathBuf,
    pub capabilities: RuntimeCapabilities,
}

/// Locates runtime executables. The search-path lookup is injected so tests
/// can resolve against a fixed table instead of the real PATH.
pub struct RuntimeResolver {
    lookup: Box<dyn Fn(&str) -> Option<PathBuf>>,
}

impl RuntimeResolver {
    /// Resolver backed by the real executable search path.
    pub fn new() -> Self {
        Self::with_lookup(|name| which::which(name).ok())
    }

    /// Resolver with a custom lookup (for testing).
    pub fn with_lookup(lookup: impl Fn(&str) -> Option<PathBuf> + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }

    /// Resolve a runtime name to an executable.
    ///
    /// An empty name probes [`PROBE_ORDER`] and takes the first hit;
    /// otherwise the name is passed through the alias table and required to
    /// be on the search path.
    pub fn resolve(&self, name: &str) -> Result<ResolvedRuntime> {
        if name.is_empty() {
            for candidate in PROBE_ORDER {
                if let Some(path) = (self.lookup)(candidate) {
                    return Ok(ResolvedRuntime {
                        capabilities: capabilities_for(&path),
                        path,
                    });
                }
            }
            return Err(Error::NoRuntimeFound);
        }

        let name = alias(name);
        match (self.lookup)(name) {
            Some(path) => Ok(ResolvedRuntime {
                capabilities: capabilities_for(&path),
                path,
            }),
            None => Err(Error::RuntimeNotInPath(name.to_string())),
        }
    }
}

impl Default for RuntimeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Historical and VM-wrapper names that resolve to another engine's binary.
fn alias(name: &str) -> &str {
    match name {
        "colima" => "docker",
        other => other,
    }
}

/// Name shown for a configured runtime in `cordon config` output.
pub fn display_name(name: &str) -> &str {
    if name.is_empty() { "auto" } else { alias(name) }
}

fn capabilities_for(path: &Path) -> RuntimeCapabilities {
    let apple = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n == "container");
    RuntimeCapabilities {
        supports_file_mounts: !apple,
        supports_native_ssh_forward: apple,
        fixed_memory_budget: !apple,
    }
}

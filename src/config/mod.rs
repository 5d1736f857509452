//! Launch configuration.
//!
//! A [`Config`] is assembled from layered sources of differing trust:
//! built-in defaults, the global user config, the per-project config, and
//! CLI flags. Field-level merge semantics live here; source loading and the
//! trust rules for the project layer live in [`layers`].

mod layers;

pub use layers::{apply_overrides, load_config, load_global, sanitize_project_layer, validate};

use serde::{Deserialize, Serialize};

/// Image launched when no layer overrides it.
pub const DEFAULT_IMAGE: &str = "ghcr.io/cordon-dev/cordon:latest";

/// Resolved launch policy for one invocation.
///
/// Also the on-disk schema of both config files; unknown keys are ignored
/// so older binaries tolerate newer config files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Container engine: empty = auto-detect, or docker / podman / container
    /// (plus the colima alias).
    pub runtime: String,

    /// Container image reference.
    pub image: String,

    /// Shell for interactive sessions; must be on the shell allow-list.
    pub shell: String,

    /// Extra mounts, `src:dst[:opts]`.
    pub mounts: Vec<String>,

    /// Extra environment variables, `KEY=value`.
    pub env: Vec<String>,

    /// Forward the host's ssh-agent into the container.
    pub ssh_agent: bool,

    /// Mount the project read-only (with a writable /output volume).
    pub readonly_project: bool,

    /// Disable networking entirely.
    pub no_network: bool,

    /// Join a named runtime network. Mutually exclusive with `no_network`.
    pub network: String,

    /// Disable auto-confirm mode in the bundled AI CLIs.
    pub no_yolo: bool,

    /// Fully ephemeral run: no persistent named volumes.
    pub scratch: bool,

    /// Copy the host's Claude config and credentials into the container.
    pub claude_config: bool,

    /// Copy the host's ~/.gitconfig into the container.
    pub git_config: bool,

    /// Forward the GitHub CLI token (via `gh auth token`).
    pub gh_token: bool,

    /// Copy global agent instruction files (CLAUDE.md, GEMINI.md, AGENTS.md).
    pub copy_agent_instructions: bool,

    /// Run interactive setup before starting. CLI-only, never persisted.
    #[serde(skip)]
    pub setup: bool,
}

impl Config {
    /// Built-in defaults: the bottom configuration layer.
    pub fn defaults() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            ..Self::default()
        }
    }
}

/// Merge a file layer into `dst`: non-empty scalars and set flags win,
/// absent values never reset what a lower layer established. The `mounts`
/// and `env` sequences are replaced wholesale when the layer defines any.
pub fn merge(dst: &mut Config, src: Config) {
    merge_scalars(dst, &src);
    if !src.mounts.is_empty() {
        dst.mounts = src.mounts;
    }
    if !src.env.is_empty() {
        dst.env = src.env;
    }
}

pub(crate) fn merge_scalars(dst: &mut Config, src: &Config) {
    if !src.runtime.is_empty() {
        dst.runtime = src.runtime.clone();
    }
    if !src.image.is_empty() {
        dst.image = src.image.clone();
    }
    if !src.shell.is_empty() {
        dst.shell = src.shell.clone();
    }
    if !src.network.is_empty() {
        dst.network = src.network.clone();
    }
    if src.ssh_agent {
        dst.ssh_agent = true;
    }
    if src.readonly_project {
        dst.readonly_project = true;
    }
    if src.no_network {
        dst.no_network = true;
    }
    if src.no_yolo {
        dst.no_yolo = true;
    }
    if src.scratch {
        dst.scratch = true;
    }
    if src.claude_config {
        dst.claude_config = true;
    }
    if src.git_config {
        dst.git_config = true;
    }
    if src.gh_token {
        dst.gh_token = true;
    }
    if src.copy_agent_instructions {
        dst.copy_agent_instructions = true;
    }
    if src.setup {
        dst.setup = true;
    }
}

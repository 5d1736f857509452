//! Error taxonomy for configuration loading and invocation building.
//!
//! Every variant is terminal to the operation that raised it: none of these
//! failures are transient, so nothing here is retried. Unsafe project-config
//! input is deliberately *not* represented — restricted fields and unsafe
//! mounts are corrected with a warning instead of failing the run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A path string was empty where a path was required.
    #[error("empty path")]
    EmptyPath,

    /// A mount spec was missing its destination.
    #[error("invalid mount {0:?}; expected src:dst")]
    InvalidMountSyntax(String),

    /// A config file exists but is not valid TOML.
    #[error("failed to parse {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// `network` and `no_network` were both set.
    #[error("cannot join network {0:?} while networking is disabled")]
    ConflictingNetworkConfig(String),

    /// No runtime name was given and none of the known engines are installed.
    #[error("no container runtime found; install docker, podman, or container")]
    NoRuntimeFound,

    /// A requested runtime is not on the executable search path.
    #[error("runtime {0:?} not found in PATH")]
    RuntimeNotInPath(String),

    /// An explicitly configured shell is not on the allow-list.
    #[error("unsupported shell {shell:?}; supported: {supported}")]
    UnsupportedShell { shell: String, supported: String },

    /// The current user's home directory could not be determined.
    #[error("could not determine home directory")]
    NoHomeDir,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

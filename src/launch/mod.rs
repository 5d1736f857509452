//! Invocation assembly — from merged config to runtime argument vector.
//!
//! The pipeline: resolve the runtime binary and its capabilities, snapshot
//! the host, then deterministically build the `run` argument list. Path
//! resolution is purely lexical; the symlink-following containment check
//! for untrusted project mounts is the one place that consults the
//! filesystem to decide safety.

pub mod builder;
pub mod containment;
pub mod host;
pub mod path;
pub mod runtime;
pub mod shell;

pub use builder::{FORWARDED_ENV_VARS, Invocation, InvocationBuilder, OUTPUT_VOLUME, PERSISTENT_VOLUMES};
pub use containment::MountValidator;
pub use host::Host;
pub use path::PathResolver;
pub use runtime::{ResolvedRuntime, RuntimeCapabilities, RuntimeResolver, display_name};
pub use shell::{ShellChoice, ShellResolver};

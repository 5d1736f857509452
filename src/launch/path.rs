//! Lexical host path resolution for mount sources and env references.
//!
//! Resolution here is pure string work: tilde expansion, joining against a
//! base directory, and normalization of `.`/`..` segments. It never consults
//! the filesystem and never follows symlinks — symlink handling is a
//! security decision that belongs to [`crate::launch::containment`] alone,
//! so that exactly one code path decides what "the path" means.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Resolves user-supplied path strings against a project directory.
///
/// The home directory is injected at construction so that tilde expansion is
/// deterministic under test.
#[derive(Debug, Clone)]
pub struct PathResolver {
    home: PathBuf,
}

impl PathResolver {
    /// Resolver using the current user's home directory.
    pub fn new() -> Result<Self> {
        let home = etcetera::home_dir().map_err(|_| Error::NoHomeDir)?;
        Ok(Self { home })
    }

    /// Resolver with an explicit home directory.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    /// Resolve a path string against `base`.
    ///
    /// - `~` and `~/rest` expand against the injected home directory.
    /// - Paths starting with `.` or `/` are joined against `base` when
    ///   relative, then lexically normalized.
    /// - Anything else passes through unchanged: the runtime interprets it
    ///   (named volumes, anonymous volume destinations).
    pub fn resolve(&self, path: &str, base: &Path) -> Result<PathBuf> {
        if path.is_empty() {
            return Err(Error::EmptyPath);
        }

        let expanded =
            shellexpand::tilde_with_context(path, || Some(self.home.to_string_lossy().into_owned()));

        if expanded.starts_with('.') || expanded.starts_with('/') {
            let candidate = Path::new(expanded.as_ref());
            let joined = if candidate.is_absolute() {
                candidate.to_path_buf()
            } else {
                base.join(candidate)
            };
            return Ok(lexical_clean(&joined));
        }

        Ok(PathBuf::from(expanded.as_ref()))
    }

    /// Resolve the source half of a `src:dst[:opts]` mount spec.
    ///
    /// The destination and options are passed through untouched.
    pub fn resolve_mount(&self, spec: &str, base: &Path) -> Result<String> {
        let mut parts = spec.splitn(3, ':');
        let src = parts.next().unwrap_or_default();
        let Some(dst) = parts.next() else {
            return Err(Error::InvalidMountSyntax(spec.to_string()));
        };
        let opts = parts.next();

        let resolved = self.resolve(src, base)?;
        let resolved = resolved.to_string_lossy();
        Ok(match opts {
            Some(opts) => format!("{resolved}:{dst}:{opts}"),
            None => format!("{resolved}:{dst}"),
        })
    }
}

/// Normalize `.` and `..` segments without touching the filesystem.
pub(crate) fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for comp in path.components() {
        match comp {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push(comp.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                } else if !out.has_root() {
                    // Leading ".." in a relative path has nothing to cancel.
                    out.push("..");
                }
            }
            Component::Normal(name) => {
                out.push(name);
                depth += 1;
            }
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

//! Containment checking for mounts declared by project-level config.
//!
//! A project's `.cordon.toml` is the least-trusted configuration source: it
//! travels with a checked-out repository, so its mount sources must never
//! reach outside the project directory. The literal string is not enough to
//! decide that — a repo can ship a symlink whose target escapes the tree —
//! so validation happens in two phases: string-level fast rejects, then an
//! lstat/readlink pass that follows what is actually on disk.
//!
//! A source that does not exist yet is accepted: failing closed would break
//! legitimate not-yet-created output paths, and the runtime re-checks the
//! path when it performs the mount. That narrow validate-to-mount window is
//! a deliberate trade-off, not an oversight.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::warn;

use super::path::lexical_clean;

/// Decides whether a project-sourced mount spec may be kept.
#[derive(Debug, Clone)]
pub struct MountValidator {
    root: PathBuf,
    canonical_root: PathBuf,
}

impl MountValidator {
    /// Validator for mounts that must stay inside `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let canonical_root = root
            .canonicalize()
            .unwrap_or_else(|_| lexical_clean(&root));
        Self {
            root,
            canonical_root,
        }
    }

    /// The containment root this validator was built for.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true when the mount spec may be kept. Rejections are logged
    /// with their reason; a rejected mount is dropped, never fatal.
    pub fn allows(&self, spec: &str) -> bool {
        match self.evaluate(spec) {
            Ok(()) => true,
            Err(reason) => {
                warn!(mount = %spec, %reason, "dropping unsafe project mount");
                false
            }
        }
    }

    fn evaluate(&self, spec: &str) -> std::result::Result<(), String> {
        let source = spec.split(':').next().unwrap_or_default();

        // String-level fast rejects catch the overwhelming majority of
        // unsafe input before any filesystem work.
        if source.is_empty() {
            return Err("empty source".into());
        }
        if Path::new(source).is_absolute() {
            return Err("absolute source path".into());
        }
        if source.starts_with('~') {
            return Err("home-relative source path".into());
        }
        if source.starts_with('$') {
            return Err("environment-derived source path".into());
        }
        if Path::new(source)
            .components()
            .any(|c| c == Component::ParentDir)
        {
            return Err("source path traverses parent directories".into());
        }

        let candidate = lexical_clean(&self.root.join(source));

        let meta = match fs::symlink_metadata(&candidate) {
            Ok(meta) => meta,
            // Not on disk yet: accepted, the runtime re-checks at mount time.
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(format!("cannot inspect {}: {e}", candidate.display())),
        };

        if meta.file_type().is_symlink() {
            let target = fs::read_link(&candidate)
                .map_err(|e| format!("cannot read symlink {}: {e}", candidate.display()))?;
            let parent = candidate.parent().unwrap_or(&self.root);
            let parent = parent
                .canonicalize()
                .unwrap_or_else(|_| parent.to_path_buf());
            let resolved = if target.is_absolute() {
                lexical_clean(&target)
            } else {
                lexical_clean(&parent.join(&target))
            };
            // The target may itself pass through further symlinks.
            let resolved = canonicalize_best(&resolved);
            if !self.contains(&resolved) {
                return Err(format!(
                    "symlink {} resolves outside the project root ({})",
                    candidate.display(),
                    resolved.display()
                ));
            }
            return Ok(());
        }

        let real = candidate
            .canonicalize()
            .map_err(|e| format!("cannot resolve {}: {e}", candidate.display()))?;
        if !self.contains(&real) {
            return Err(format!(
                "{} resolves outside the project root ({})",
                candidate.display(),
                real.display()
            ));
        }
        Ok(())
    }

    /// Component-wise prefix check; `/project-evil` is not inside `/project`.
    fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.canonical_root)
    }
}

/// Canonicalize as far as the filesystem allows: the whole path when it
/// exists, otherwise the parent with the missing leaf re-attached.
fn canonicalize_best(path: &Path) -> PathBuf {
    if let Ok(real) = path.canonicalize() {
        return real;
    }
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name())
        && let Ok(parent) = parent.canonicalize()
    {
        return parent.join(name);
    }
    path.to_path_buf()
}

//! Config file location resolution.
//!
//! The global config file is resolved through a two-level fallback:
//! 1. CORDON_CONFIG_DIR env var
//! 2. Platform config dir (XDG_CONFIG_HOME or ~/.config) via `etcetera`
//!
//! Relative paths from env vars are ignored per the XDG spec. The project
//! config is always `.cordon.toml` in the project root and is resolved by
//! the caller, not here.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// File name of the per-project config, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = ".cordon.toml";

/// Resolved locations of cordon's own files.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Config directory: config.toml lives here.
    pub config_dir: PathBuf,
}

impl Paths {
    /// Resolve using real environment variables.
    pub fn resolve() -> Result<Self> {
        Self::resolve_with_env(|key| std::env::var(key))
    }

    /// Resolve with a custom env var lookup (for testing).
    pub fn resolve_with_env<F>(env_fn: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        use etcetera::BaseStrategy;

        let config_dir = env_fn("CORDON_CONFIG_DIR")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .filter(|p| p.is_absolute());

        let config_dir = match config_dir {
            Some(dir) => dir,
            None => etcetera::choose_base_strategy()
                .map_err(|_| Error::NoHomeDir)?
                .config_dir()
                .join("cordon"),
        };

        Ok(Self { config_dir })
    }

    /// Global config file: config_dir/config.toml
    pub fn global_config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_env(
        map: HashMap<&str, &str>,
    ) -> impl Fn(&str) -> std::result::Result<String, std::env::VarError> {
        move |key: &str| {
            map.get(key)
                .map(|v| v.to_string())
                .ok_or(std::env::VarError::NotPresent)
        }
    }

    #[test]
    fn default_config_dir_is_platform_config_dir() {
        let env: HashMap<&str, &str> = HashMap::new();
        let paths = Paths::resolve_with_env(make_env(env)).unwrap();
        assert!(paths.config_dir.ends_with("cordon"), "{:?}", paths.config_dir);
        assert!(paths.global_config_file().ends_with("config.toml"));
    }

    #[test]
    fn cordon_config_dir_overrides() {
        let mut env: HashMap<&str, &str> = HashMap::new();
        env.insert("CORDON_CONFIG_DIR", "/custom/cordon");

        let paths = Paths::resolve_with_env(make_env(env)).unwrap();
        assert_eq!(paths.config_dir, PathBuf::from("/custom/cordon"));
        assert_eq!(
            paths.global_config_file(),
            PathBuf::from("/custom/cordon/config.toml")
        );
    }

    #[test]
    fn relative_and_empty_overrides_are_ignored() {
        for value in ["relative/path", ""] {
            let mut env: HashMap<&str, &str> = HashMap::new();
            env.insert("CORDON_CONFIG_DIR", value);

            let paths = Paths::resolve_with_env(make_env(env)).unwrap();
            assert!(paths.config_dir.is_absolute());
            assert!(paths.config_dir.ends_with("cordon"));
        }
    }
}

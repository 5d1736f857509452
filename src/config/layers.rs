//! Configuration source loading and trust enforcement.
//!
//! Layer order: built-in defaults, then the global user config, then the
//! project config, then CLI overrides applied by the caller. The project
//! layer is the only untrusted one — it arrives with a checked-out
//! repository — so a fixed set of restricted fields is force-cleared from
//! it and every mount it declares must pass the containment check.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

use crate::error::{Error, Result};
use crate::launch::MountValidator;
use crate::paths::{PROJECT_CONFIG_FILE, Paths};

use super::{Config, merge, merge_scalars};

/// Load and merge the file-backed configuration layers for a project.
///
/// CLI overrides are applied separately via [`apply_overrides`]; call
/// [`validate`] again afterwards.
pub fn load_config(project_dir: &Path, paths: &Paths) -> Result<Config> {
    let mut cfg = Config::defaults();

    if let Some(layer) = read_layer(&paths.global_config_file())? {
        merge(&mut cfg, layer);
    }

    if let Some(mut layer) = read_layer(&project_dir.join(PROJECT_CONFIG_FILE))? {
        sanitize_project_layer(&mut layer, project_dir);
        merge(&mut cfg, layer);
    }

    validate(&cfg)?;
    Ok(cfg)
}

/// Load only the trusted layers (defaults + global). Interactive setup
/// edits the global file and must not absorb project-level state.
pub fn load_global(paths: &Paths) -> Result<Config> {
    let mut cfg = Config::defaults();
    if let Some(layer) = read_layer(&paths.global_config_file())? {
        merge(&mut cfg, layer);
    }
    Ok(cfg)
}

/// Apply CLI-sourced overrides: highest precedence, no field restrictions.
/// Scalars override; repeatable `--mount`/`--env` flags append to whatever
/// the file layers left rather than replacing it.
pub fn apply_overrides(cfg: &mut Config, overrides: Config) {
    merge_scalars(cfg, &overrides);
    cfg.mounts.extend(overrides.mounts);
    cfg.env.extend(overrides.env);
}

/// Reject configurations that cannot be turned into an invocation.
pub fn validate(cfg: &Config) -> Result<()> {
    if !cfg.network.is_empty() && cfg.no_network {
        return Err(Error::ConflictingNetworkConfig(cfg.network.clone()));
    }
    Ok(())
}

/// Strip everything a project config is not trusted to set.
///
/// Restricted fields degrade to "ignored with a warning" rather than
/// failing the run: a misconfigured project should not block every command
/// inside it.
pub fn sanitize_project_layer(layer: &mut Config, project_dir: &Path) {
    if !layer.runtime.is_empty() {
        warn!(
            runtime = %layer.runtime,
            "project config may not choose the container runtime; ignoring"
        );
        layer.runtime.clear();
    }

    clear_restricted_flag(&mut layer.ssh_agent, "ssh_agent");
    clear_restricted_flag(&mut layer.claude_config, "claude_config");
    clear_restricted_flag(&mut layer.git_config, "git_config");
    clear_restricted_flag(&mut layer.gh_token, "gh_token");
    clear_restricted_flag(
        &mut layer.copy_agent_instructions,
        "copy_agent_instructions",
    );

    // An image starting with "-" would be parsed as a flag by the runtime.
    if layer.image.starts_with('-') {
        warn!(image = %layer.image, "ignoring project image that looks like a flag");
        layer.image.clear();
    }

    let validator = MountValidator::new(project_dir);
    layer.mounts.retain(|mount| validator.allows(mount));
}

fn clear_restricted_flag(flag: &mut bool, name: &str) {
    if *flag {
        warn!(
            field = name,
            "project config may not enable credential forwarding; ignoring"
        );
        *flag = false;
    }
}

fn read_layer(path: &Path) -> Result<Option<Config>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let layer = toml::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(layer))
}

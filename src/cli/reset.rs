//! `cordon reset` — remove the persistent named volumes.

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::warn;

use crate::config::{Config, apply_overrides, load_config};
use crate::exec;
use crate::launch::{PERSISTENT_VOLUMES, RuntimeResolver};
use crate::paths::Paths;

#[derive(Args)]
pub struct ResetArgs {
    /// Actually remove the volumes
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: ResetArgs, overrides: Config) -> Result<()> {
    if !args.force {
        bail!("reset requires --force (this deletes all cached data)");
    }

    let project_dir = std::env::current_dir().context("failed to get working directory")?;
    let paths = Paths::resolve()?;
    let mut cfg = load_config(&project_dir, &paths)?;
    apply_overrides(&mut cfg, overrides);

    let runtime = RuntimeResolver::new().resolve(&cfg.runtime)?;

    warn!("removing cordon volumes");
    let mut rm_args: Vec<String> = vec!["volume".into(), "rm".into()];
    rm_args.extend(PERSISTENT_VOLUMES.iter().map(|(name, _)| name.to_string()));

    let status = exec::run_inherited(&runtime.path, &rm_args)?;
    if !status.success() {
        bail!("volume removal failed");
    }
    println!("Fresh start: all volumes removed.");
    Ok(())
}

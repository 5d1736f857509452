//! `cordon config` — print the configuration a launch would use.

use anyhow::{Context, Result};

use crate::config::{Config, apply_overrides, load_config, validate};
use crate::launch::display_name;
use crate::paths::Paths;

pub fn show(overrides: Config) -> Result<()> {
    let project_dir = std::env::current_dir().context("failed to get working directory")?;
    let paths = Paths::resolve()?;

    let mut cfg = load_config(&project_dir, &paths)?;
    apply_overrides(&mut cfg, overrides);
    validate(&cfg)?;

    println!("# project: {}", project_dir.display());
    println!("# runtime: {}", display_name(&cfg.runtime));
    print!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}

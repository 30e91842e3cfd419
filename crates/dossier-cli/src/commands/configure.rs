//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::{Path, PathBuf};

/// Execute the config command.
pub async fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => {
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Init { force } => {
            let written = init_config(path, force)?;
            println!(
                "{}",
                formatter.success(&format!("Wrote default configuration to {}", written.display()))
            );
        }
    }
    Ok(())
}

/// Write the default configuration; refuses to overwrite unless `force`.
pub fn init_config(path: Option<&Path>, force: bool) -> Result<PathBuf> {
    let target = match path {
        Some(p) => p.to_path_buf(),
        None => Config::path()?,
    };
    if target.exists() && !force {
        return Err(CliError::NotPermitted(format!(
            "{} already exists (use --force to overwrite)",
            target.display()
        )));
    }
    Config::default().save(Some(&target))
}

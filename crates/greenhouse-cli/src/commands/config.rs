//! Config command implementation.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::cli::ConfigAction;
use crate::config::Config;

fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load_from(path)
    } else {
        Ok(Config::default())
    }
}

/// Apply `action` to the config file at `path` and return what to print.
pub fn run_config_action(path: &Path, action: ConfigAction) -> Result<String> {
    match action {
        ConfigAction::Path => Ok(format!("{}\n", path.display())),
        ConfigAction::Show => {
            let config = load_or_default(path)?;
            let body = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            Ok(format!("# {}\n{}", path.display(), body))
        }
        ConfigAction::Get { key } => {
            let config = load_or_default(path)?;
            Ok(format!("{}\n", config.get_value(key)))
        }
        ConfigAction::Set { key, value } => {
            let mut config = load_or_default(path)?;
            config.set_value(key, &value)?;
            config.save_to(path)?;
            Ok(format!("Set {} = {}\n", key.as_str(), config.get_value(key)))
        }
        ConfigAction::Unset { key } => {
            let mut config = load_or_default(path)?;
            config.unset(key);
            config.save_to(path)?;
            Ok(format!("Reset {} to {}\n", key.as_str(), config.get_value(key)))
        }
        ConfigAction::Init => {
            if path.exists() {
                bail!("Config file already exists: {}", path.display());
            }
            Config::default().save_to(path)?;
            Ok(format!("Created {}\n", path.display()))
        }
    }
}

pub fn cmd_config(action: ConfigAction, quiet: bool) -> Result<()> {
    let is_query = matches!(
        action,
        ConfigAction::Path | ConfigAction::Show | ConfigAction::Get { .. }
    );
    let message = run_config_action(&Config::path(), action)?;
    if is_query || !quiet {
        print!("{}", message);
    }
    Ok(())
}

//! Platform directory lookup for config discovery

use std::path::PathBuf;

use anyhow::Result;
use etcetera::{BaseStrategy, choose_base_strategy};

/// Path of the user-level config file, e.g. `~/.config/modulize/modulize.toml`.
pub fn user_config_file() -> Result<PathBuf> {
    let strategy = choose_base_strategy()?;
    Ok(strategy.config_dir().join("modulize").join("modulize.toml"))
}

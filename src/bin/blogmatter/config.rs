use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

use blogmatter::config::{read_config, Config};

use crate::CFG_FILE_NAME;

/// Looks for the configuration next to the executable, then in the current directory,
/// then in the user config directory.
fn get_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];

    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(|d| d.to_path_buf())) {
        candidates.push(exe_dir.join(CFG_FILE_NAME));
    }
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join("blogmatter").join(CFG_FILE_NAME));
    }

    candidates.into_iter().find(|path| path.exists())
}

pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> Result<Config> {
    let config_path = match cfg_path.or_else(get_config_path) {
        None => return Err(anyhow!("Could not find {}", CFG_FILE_NAME)),
        Some(x) => x,
    };

    read_config(&config_path)
}

use std::path::{Path, PathBuf};
use std::{env, fs};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::content::DEFAULT_SUMMARY_FOLD;
use crate::post_list::DEFAULT_EXTENSIONS;

#[derive(Deserialize, Debug)]
pub struct Paths {
    pub content_dir: PathBuf,
    pub manifest_file: PathBuf,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct Content {
    pub extensions: Vec<String>,
    pub summary_fold: String,
    pub include_drafts: bool,
    pub page_size: usize,
    /// Parser threads. Zero means one per available CPU.
    pub threads: usize,
}

impl Default for Content {
    fn default() -> Self {
        Content {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            summary_fold: DEFAULT_SUMMARY_FOLD.to_string(),
            include_drafts: false,
            page_size: 10,
            threads: 0,
        }
    }
}

impl Content {
    pub fn worker_threads(&self) -> usize {
        if self.threads > 0 {
            return self.threads;
        }
        std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
    }
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub paths: Paths,
    #[serde(default)]
    pub content: Content,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf, base_dir: &Path) -> Result<PathBuf> {
    let expanded = match path.to_str() {
        Some(str_path) if str_path.starts_with("${exe_dir}") => {
            let cur_exe = env::current_exe().context("Could not find the current executable")?;
            let exe_dir = cur_exe.parent().unwrap_or(Path::new("."));
            Some(PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy())))
        }
        _ => None,
    };
    let path = expanded.unwrap_or(path);

    // Relative paths are relative to the configuration file
    if path.is_relative() {
        Ok(base_dir.join(path))
    } else {
        Ok(path)
    }
}

pub fn parse_config(cfg_content: &str, base_dir: &Path) -> Result<Config> {
    let mut cfg: Config = toml::from_str::<Config>(cfg_content)
        .context("Error parsing configuration file")?;

    cfg.paths = Paths {
        content_dir: parse_path(cfg.paths.content_dir, base_dir)?,
        manifest_file: parse_path(cfg.paths.manifest_file, base_dir)?,
    };

    if let Some(ref mut log) = cfg.log {
        if let Some(location) = log.location.take() {
            log.location = Some(parse_path(location, base_dir)?);
        }
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> Result<Config> {
    let cfg_content = fs::read_to_string(cfg_path)
        .with_context(|| format!("Error opening configuration file {}", cfg_path.display()))?;

    let base_dir = cfg_path.parent().unwrap_or(Path::new("."));
    parse_config(&cfg_content, base_dir)
}

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "listo";
const CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

pub const ENV_CONFIG_PATH: &str = "LISTO_CONFIG_PATH";
pub const ENV_DATA_DIR: &str = "LISTO_DATA_DIR";
pub const ENV_LOG_LEVEL: &str = "LISTO_LOG_LEVEL";

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub log_level: String,
}

pub fn get_config_file() -> Result<PathBuf> {
    // LISTO_CONFIG_PATH points straight at a config file
    if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
        return Ok(PathBuf::from(path));
    }

    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
        .context("Could not determine config directory")
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(format!(".{APP_NAME}")))
}

/// A missing file means defaults; an unreadable or malformed one is an error.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_file()?)
}

/// Precedence: command line, then environment, then config file, then defaults.
pub fn resolve<E>(config: Config, overrides: Overrides, env: E) -> Result<Settings>
where
    E: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let data_dir = match overrides
        .data_dir
        .or_else(|| non_empty(ENV_DATA_DIR).map(PathBuf::from))
        .or(config.data_dir)
    {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    let log_level = overrides
        .log_level
        .or_else(|| non_empty(ENV_LOG_LEVEL))
        .or(config.log_level)
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    Ok(Settings {
        data_dir,
        log_level,
    })
}

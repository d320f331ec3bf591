use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{EditAction, EditCapabilities};
use crate::touch_selection::DEFAULT_HANDLE_SIZE;

const APP_DIR: &str = "oxide";
const TOUCH_EDITING_CONFIG_FILE: &str = "touch-editing.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("failed to read touch editing config: {path}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse touch editing config: {path}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Settings from `touch-editing.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchEditingConfig {
    /// Actions the menu may offer. Unset means all supported actions.
    pub menu_actions: Option<Vec<EditAction>>,
    pub handle_size: Option<f32>,
}

impl TouchEditingConfig {
    pub fn menu_capabilities(&self) -> EditCapabilities {
        match &self.menu_actions {
            Some(actions) => EditCapabilities::from_actions(actions.iter().copied()),
            None => EditCapabilities::MENU_SUPPORTED,
        }
    }

    pub fn handle_size(&self) -> f32 {
        self.handle_size
            .filter(|size| size.is_finite() && *size >= 0.0)
            .unwrap_or(DEFAULT_HANDLE_SIZE)
    }
}

/// Loads the user config, falling back to defaults on any problem.
pub fn load_touch_editing_config() -> TouchEditingConfig {
    let (xdg_config_home, home) = config_env_dirs();
    read_touch_editing_config_with(xdg_config_home.as_deref(), home.as_deref()).unwrap_or_else(
        |err| {
            tracing::warn!(%err, "touch editing config unusable; using defaults");
            TouchEditingConfig::default()
        },
    )
}

/// Strict variant of [`load_touch_editing_config`]. A missing file is not an
/// error.
pub fn read_touch_editing_config() -> ConfigResult<TouchEditingConfig> {
    let (xdg_config_home, home) = config_env_dirs();
    read_touch_editing_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn read_touch_editing_config_with(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> ConfigResult<TouchEditingConfig> {
    let path = app_config_path(APP_DIR, TOUCH_EDITING_CONFIG_FILE, xdg_config_home, home)?;
    if !path.exists() {
        tracing::debug!(?path, "no touch editing config; using defaults");
        return Ok(TouchEditingConfig::default());
    }
    read_touch_editing_config_from(&path)
}

pub fn read_touch_editing_config_from(path: &Path) -> ConfigResult<TouchEditingConfig> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&contents).map_err(|source| ConfigError::ParseConfig {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(?path, ?config, "loaded touch editing config");
    Ok(config)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> ConfigResult<PathBuf> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(xdg_config_home: Option<&Path>, home: Option<&Path>) -> ConfigResult<PathBuf> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

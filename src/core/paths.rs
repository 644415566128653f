// src/core/paths.rs

use crate::constants::{SETTINGS_DIR, SETTINGS_ENV_VAR, SETTINGS_FILENAME};
use lazy_static::lazy_static;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

lazy_static! {
    /// Basename of the executable that was launched, computed once per process.
    static ref LAUNCH_SCRIPT: String = env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_default();
}

/// Failure to locate a standard directory.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no user config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
}

/// Returns the name the program was launched as (the basename of `argv[0]`),
/// which is what usage lines show as the command to type.
pub fn launch_script() -> String {
    LAUNCH_SCRIPT.clone()
}

/// Returns the directory cmdtree settings live in (`~/.config/cmdtree` on Linux).
/// The directory is not created.
pub fn get_settings_dir() -> Result<PathBuf, PathError> {
    dirs::config_dir()
        .map(|dir| dir.join(SETTINGS_DIR))
        .ok_or(PathError::ConfigDirNotFound)
}

/// Returns the settings file to read: `$CMDTREE_CONFIG` when set and non-empty,
/// otherwise `settings.toml` inside [`get_settings_dir`].
pub fn get_settings_path() -> Result<PathBuf, PathError> {
    match env::var_os(SETTINGS_ENV_VAR) {
        Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(get_settings_dir()?.join(SETTINGS_FILENAME)),
    }
}

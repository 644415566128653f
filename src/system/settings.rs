// src/system/settings.rs

use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;

use crate::{
    constants::DEFAULT_INDENT_STEP,
    core::paths::{self, PathError},
};

/// Why the settings file could not be loaded.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The file exists but could not be read.
    #[error("Filesystem Error while reading '{path}': {source}")]
    Io {
        /// The settings file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid settings TOML.
    #[error("Failed to parse TOML file at '{path}': {source}")]
    TomlParse {
        /// The settings file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: toml::de::Error,
    },
    /// The settings location could not be determined.
    #[error("Path error: {0}")]
    Path(#[from] PathError),
}

/// When usage output is coloured.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour only when stdout is a terminal that supports it.
    #[default]
    Auto,
    /// Always colour.
    Always,
    /// Never colour.
    Never,
}

/// Presentation settings for the launcher, read from `settings.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Shown in usage lines instead of the executable's file name.
    pub program_name: Option<String>,
    /// Column to wrap usage text at; no wrapping when unset.
    pub wrap_width: Option<usize>,
    /// When to colour usage output.
    pub color: ColorMode,
    /// Spaces per nesting level in usage output.
    pub indent_step: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            program_name: None,
            wrap_width: None,
            color: ColorMode::default(),
            indent_step: DEFAULT_INDENT_STEP,
        }
    }
}

impl Settings {
    /// Applies the colour policy process-wide through `colored`.
    pub fn apply_color(&self) {
        match self.color {
            ColorMode::Auto => colored::control::unset_override(),
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
        }
    }
}

/// Loads settings from the default location (see [`paths::get_settings_path`]).
pub fn load_settings() -> Result<Settings, SettingsError> {
    let path = paths::get_settings_path()?;
    load_settings_from(&path)
}

/// Loads settings from `path`. A file that does not exist yields the defaults.
pub fn load_settings_from(path: &Path) -> Result<Settings, SettingsError> {
    if !path.exists() {
        log::debug!("No settings file at '{}', using defaults", path.display());
        return Ok(Settings::default());
    }

    log::debug!("Loading settings from '{}'", path.display());
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| SettingsError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

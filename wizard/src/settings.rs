use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::page::{
    convert::ColorFormat,
    document::{ScrollBehavior, ScrollBlock, ScrollOptions},
    highlight::{HighlightStyle, DEFAULT_HIGHLIGHT_COLOR},
};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings from {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse settings from {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollSettings {
    pub enabled: bool,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            behavior: ScrollBehavior::default(),
            block: ScrollBlock::default(),
        }
    }
}

/// User preferences. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub highlight_color: String,
    pub format: ColorFormat,
    pub scroll: ScrollSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.into(),
            format: ColorFormat::default(),
            scroll: ScrollSettings::default(),
        }
    }
}

impl Settings {
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }

    pub fn highlight_style(&self) -> HighlightStyle {
        HighlightStyle {
            scroll: self.scroll.enabled.then_some(ScrollOptions {
                behavior: self.scroll.behavior,
                block: self.scroll.block,
            }),
            ..Default::default()
        }
        .with_color(Some(&self.highlight_color))
    }
}

//! Typed style configuration for labels, marks and paths
//!
//! Styles are plain structs with defaults matching the built-in theme;
//! custom themes load from TOML documents with per-section overrides.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing theme files
#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("failed to read theme file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse theme TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Visual style of a label box
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LabelStyle {
    pub background_color: String,
    pub color: String,
    pub border_radius: f64,
    pub highlight_color: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            background_color: "#1c71ff".to_string(),
            color: "#ffffff".to_string(),
            border_radius: 4.0,
            highlight_color: "#ff4246".to_string(),
        }
    }
}

/// Visual style of a range-highlight mark
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MarkStyle {
    pub background_color: String,
    pub opacity: f64,
}

impl Default for MarkStyle {
    fn default() -> Self {
        Self {
            background_color: "#1c71ff".to_string(),
            opacity: 0.15,
        }
    }
}

/// Visual style of a routed path
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PathStyle {
    pub border_color: String,
    pub highlight_color: String,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            border_color: "#505050".to_string(),
            highlight_color: "#ff4246".to_string(),
        }
    }
}

/// Complete visual theme of an annotated document
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Theme {
    pub label: LabelStyle,
    pub mark: MarkStyle,
    pub path: PathStyle,
    pub background_color: BackgroundColor,
}

/// Newtype so the document background has its own default
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackgroundColor(pub String);

impl Default for BackgroundColor {
    fn default() -> Self {
        Self("#ffffff".to_string())
    }
}

impl Theme {
    /// Load a theme from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ThemeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load a theme from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ThemeError> {
        Ok(toml::from_str(content)?)
    }
}

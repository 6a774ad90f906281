// ABOUTME: Application configuration handling.
// ABOUTME: Loads layout metrics, console and preview settings from TOML.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Layout dimensions in layout units (pixels for a GUI host, scaled down
/// to cells by the text previewer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// Height of the header row above every leaf panel
    pub header_height: i32,
    /// Thickness of the gutter between the bands of a horizontal split
    pub horizontal_gutter: i32,
    /// Thickness of the gutter between the columns of a vertical split
    pub vertical_gutter: i32,
    /// Smallest extent a split's first child can be dragged to
    pub min_split_size: u32,
    /// Extra grab area on each side of a gutter
    pub grab_margin: i32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            header_height: 20,
            horizontal_gutter: 2,
            vertical_gutter: 1,
            min_split_size: 20,
            grab_margin: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Panel layout description loaded at startup, e.g. `0_200CL`
    pub description: String,
    pub metrics: LayoutMetrics,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            description: "0C".to_string(),
            metrics: LayoutMetrics::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Prompt shown before each echoed command
    pub prompt: String,
    /// Maximum number of scrollback lines kept by the console
    pub history_limit: usize,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            prompt: "dbg".to_string(),
            history_limit: 1000,
        }
    }
}

/// Character grid used by the text previewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    pub columns: u16,
    pub rows: u16,
    /// Layout units per character cell, horizontally
    pub cell_width: i32,
    /// Layout units per character cell, vertically
    pub cell_height: i32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            columns: 120,
            rows: 40,
            cell_width: 8,
            cell_height: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial layout and its metrics
    pub layout: LayoutSettings,

    /// Command console settings
    pub console: ConsoleSettings,

    /// Text previewer settings
    pub preview: PreviewSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

impl Config {
    /// Get the default config file path (~/.config/debug-panes/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("debug-panes").join("config.toml"))
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.layout.description, "0C");
        assert_eq!(config.layout.metrics.min_split_size, 20);
    }

    #[test]
    fn test_partial_metrics_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [layout]
            description = "0_200CL"

            [layout.metrics]
            min_split_size = 40
            "#,
        )
        .unwrap();

        assert_eq!(config.layout.description, "0_200CL");
        assert_eq!(config.layout.metrics.min_split_size, 40);
        assert_eq!(config.layout.metrics.header_height, 20);
        assert_eq!(config.console, ConsoleSettings::default());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Config::from_toml_str("layout = 3").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let path = std::env::temp_dir().join("debug-panes-missing-config.toml");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(Config::load(&path), Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_default_path() {
        if let Some(p) = Config::default_path() {
            assert!(p.ends_with("debug-panes/config.toml"));
        }
    }
}

//! Configuration management for awsm-md
//!
//! Configuration is a JSON file, by default at
//! `<config dir>/awsm-md/config.json`. Every field is optional; a missing file
//! means defaults.

use crate::error::{ConfigError, ConfigResult};
use crate::markdown::{ColorTable, ExportFormat, HtmlExportOptions, HtmlRenderOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Application identifier, used as the configuration directory name
pub const APP_ID: &str = "awsm-md";

/// Configuration file name inside the configuration directory
pub const CONFIG_FILE: &str = "config.json";

/// Maximum file size to convert (in bytes) - 10MB
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// UI configuration
    pub ui: UiConfig,

    /// Rendering configuration
    pub render: RenderConfig,

    /// Export configuration
    pub export: ExportConfig,

    /// File handling configuration
    pub files: FileConfig,

    /// Extra or replacement entries for the color table
    pub colors: HashMap<String, String>,
}

impl Config {
    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file at the default location yields defaults; an explicitly
    /// requested file must exist.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::config_path() {
                Ok(path) => (path, false),
                Err(err) => {
                    log::debug!("{}; using default configuration", err);
                    return Ok(Self::default());
                }
            },
        };

        if !explicit && !path.exists() {
            log::debug!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load and validate a configuration file
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config = Self::from_json(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Config =
            serde_json::from_str(json).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> ConfigResult<()> {
        if self.files.max_file_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "files.max_file_size".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if let Some((name, _)) = self.colors.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: format!("colors.{}", name),
                reason: "color value is empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get the configuration directory path
    pub fn config_dir() -> ConfigResult<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_ID))
            .ok_or(ConfigError::DirectoryError)
    }

    /// Get the default configuration file path
    pub fn config_path() -> ConfigResult<PathBuf> {
        Self::config_dir().map(|p| p.join(CONFIG_FILE))
    }

    /// Default color table extended with the configured overrides
    pub fn color_table(&self) -> ColorTable {
        ColorTable::with_overrides(&self.colors)
    }

    /// Renderer switches from the `render` section
    pub fn render_options(&self) -> HtmlRenderOptions {
        HtmlRenderOptions {
            links_new_tab: self.render.links_new_tab,
            heading_ids: self.render.heading_ids,
            toc_title: self.render.toc_title.clone(),
        }
    }

    /// HTML export options from the `export` and `ui` sections
    pub fn export_options(&self, title: Option<String>) -> HtmlExportOptions {
        HtmlExportOptions {
            include_styles: self.export.include_styles,
            title,
            dark_mode: self.ui.theme == ThemePreference::Dark,
            custom_css: self.export.custom_css.clone(),
            include_toc: self.export.include_toc,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme used for exported stylesheets
    pub theme: ThemePreference,
}

/// Theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Light stylesheet
    #[default]
    Light,
    /// Dark stylesheet
    Dark,
}

impl ThemePreference {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "light" => Some(ThemePreference::Light),
            "dark" => Some(ThemePreference::Dark),
            _ => None,
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Add slug ids to rendered headings
    pub heading_ids: bool,

    /// Open links in a new tab
    pub links_new_tab: bool,

    /// Caption above generated tables of contents
    pub toc_title: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            heading_ids: true,
            links_new_tab: true,
            toc_title: None,
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Embed the themed stylesheet in exported HTML
    pub include_styles: bool,

    /// Prepend a table of contents to exported HTML
    pub include_toc: bool,

    /// Extra CSS appended to the stylesheet
    pub custom_css: Option<String>,

    /// Format used when neither `--format` nor the output extension decide
    pub default_format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_styles: true,
            include_toc: false,
            custom_css: None,
            default_format: ExportFormat::Html,
        }
    }
}

/// File handling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Maximum file size to convert (in bytes)
    pub max_file_size: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.render.heading_ids);
        assert!(config.render.links_new_tab);
        assert!(config.export.include_styles);
        assert_eq!(config.ui.theme, ThemePreference::Light);
        assert_eq!(config.files.max_file_size, MAX_FILE_SIZE);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_json(
            r##"{ "ui": { "theme": "dark" }, "colors": { "Brand": "#112233" } }"##,
        )
        .unwrap();
        assert_eq!(config.ui.theme, ThemePreference::Dark);
        assert!(config.render.heading_ids);
        assert_eq!(config.color_table().lookup("brand"), "#112233");
        assert_eq!(config.color_table().lookup("red"), "#f38ba8");
    }

    #[test]
    fn test_malformed_config() {
        assert!(matches!(
            Config::from_json("{ not json"),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "ui": { "theme": "sepia" } }"#),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_json(r#"{ "files": { "max_file_size": 0 } }"#),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            Config::from_json(r#"{ "colors": { "blank": "  " } }"#),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("awsm-md-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "render": { "toc_title": "Contents" } }"#).unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.render_options().toc_title.as_deref(), Some("Contents"));

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            Config::load(Some(path.as_path())),
            Err(ConfigError::LoadError(_))
        ));
    }

    #[test]
    fn test_export_options_follow_theme() {
        let mut config = Config::default();
        config.ui.theme = ThemePreference::Dark;
        let options = config.export_options(Some("Doc".to_string()));
        assert!(options.dark_mode);
        assert_eq!(options.title.as_deref(), Some("Doc"));
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!(ThemePreference::parse("Dark"), Some(ThemePreference::Dark));
        assert_eq!(ThemePreference::parse("light"), Some(ThemePreference::Light));
        assert_eq!(ThemePreference::parse("system"), None);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_sidebar_width")]
    pub sidebar_width_percent: u16,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_add")]
    pub add: String,
    #[serde(default = "default_water")]
    pub water: String,
    #[serde(default = "default_rename")]
    pub rename: String,
    #[serde(default = "default_notes")]
    pub notes: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_toggle_sidebar")]
    pub toggle_sidebar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_highlight_fg")]
    pub highlight_fg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: Some(CURRENT_CONFIG_VERSION),
            database_path: default_database_path(),
            sidebar_width_percent: default_sidebar_width(),
            max_suggestions: default_max_suggestions(),
            log_level: default_log_level(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            add: default_add(),
            water: default_water(),
            rename: default_rename(),
            notes: default_notes(),
            delete: default_delete(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            help: default_help(),
            toggle_sidebar: default_toggle_sidebar(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            highlight_fg: default_highlight_fg(),
        }
    }
}

impl Theme {
    fn preset(fg: &str, bg: &str, highlight_bg: &str, highlight_fg: &str) -> Self {
        Self {
            fg: fg.to_string(),
            bg: bg.to_string(),
            highlight_bg: highlight_bg.to_string(),
            highlight_fg: highlight_fg.to_string(),
        }
    }

    /// Preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        HashMap::from([
            ("default".to_string(), Theme::preset("white", "black", "green", "black")),
            ("dark".to_string(), Theme::preset("white", "black", "cyan", "black")),
            ("light".to_string(), Theme::preset("black", "white", "green", "white")),
            ("green".to_string(), Theme::preset("green", "black", "yellow", "black")),
            ("monochrome".to_string(), Theme::preset("white", "black", "white", "black")),
        ])
    }
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

fn default_database_path() -> String {
    Config::default_database_path_for_profile(utils::Profile::Prod)
}

fn default_sidebar_width() -> u16 {
    35
}

fn default_max_suggestions() -> usize {
    6
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_add() -> String {
    "a".to_string()
}

fn default_water() -> String {
    "w".to_string()
}

fn default_rename() -> String {
    "e".to_string()
}

fn default_notes() -> String {
    "n".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_toggle_sidebar() -> String {
    "b".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "green".to_string()
}

fn default_highlight_fg() -> String {
    // Empty means "derive from highlight_bg"
    String::new()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load the profile's config file, creating it with defaults when missing.
    /// The database path always follows the profile.
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        let mut config = Self::load_or_create(&config_path)?;
        config.database_path = Self::default_database_path_for_profile(profile);
        Ok(config)
    }

    /// Load from an explicit file; its `database_path` is honored as written
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::load_or_create(path)
    }

    fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let contents =
                fs::read_to_string(path).map_err(|e| ConfigError::ReadError(e.to_string()))?;
            Ok(toml::from_str(&contents)?)
        } else {
            let mut config = Config::default();
            if let Err(e) = config.save_to_path(path) {
                warn!(error = %e, path = %path.display(), "failed to write default config");
                return Err(e);
            }
            Ok(config)
        }
    }

    pub fn save_to_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string).map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile).ok_or_else(|| {
            ConfigError::ConfigDirError("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        match utils::get_data_dir(profile) {
            Some(data_dir) => data_dir.join("plants.db").to_string_lossy().to_string(),
            None => format!("~/.local/share/{}/plants.db", profile.app_name()),
        }
    }

    /// Database path with `~` expanded
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Log file next to the database
    pub fn get_log_path(&self) -> PathBuf {
        let db_path = self.get_database_path();
        match db_path.parent() {
            Some(dir) => dir.join("plantkeep.log"),
            None => PathBuf::from("plantkeep.log"),
        }
    }

    /// Currently active theme; user themes shadow presets.
    /// An empty `highlight_fg` is derived from `highlight_bg`.
    pub fn get_active_theme(&self) -> Theme {
        use crate::tui::widgets::color::{format_color_for_display, get_contrast_text_color, parse_color};

        let mut theme = self
            .themes
            .get(&self.current_theme)
            .cloned()
            .or_else(|| Theme::get_preset_themes().remove(&self.current_theme))
            .unwrap_or_default();

        if theme.highlight_fg.is_empty() {
            let calculated = get_contrast_text_color(parse_color(&theme.highlight_bg));
            theme.highlight_fg = format_color_for_display(&calculated);
        }

        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            max_suggestions = 3
            [key_bindings]
            water = "Space"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_suggestions, 3);
        assert_eq!(config.key_bindings.water, "Space");
        assert_eq!(config.key_bindings.quit, "q");
        assert_eq!(config.sidebar_width_percent, 35);
        assert_eq!(config.config_version, Some(CURRENT_CONFIG_VERSION));
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.log_level, "info");

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded.key_bindings.add, "a");
    }

    #[test]
    fn broken_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_suggestions = [").unwrap();
        assert!(matches!(Config::load_from_path(&path), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn user_themes_shadow_presets() {
        let mut config: Config = toml::from_str(
            r#"
            current_theme = "light"
            [themes.light]
            fg = "lightgreen"
            "#,
        )
        .unwrap();
        let theme = config.get_active_theme();
        assert_eq!(theme.fg, "lightgreen");
        assert!(!theme.highlight_fg.is_empty());

        config.current_theme = "monochrome".to_string();
        assert_eq!(config.get_active_theme().highlight_bg, "white");

        config.current_theme = "nope".to_string();
        assert_eq!(config.get_active_theme().fg, Theme::default().fg);
    }

    #[test]
    fn log_file_sits_next_to_the_database() {
        let config = Config { database_path: "/tmp/pk/plants.db".to_string(), ..Config::default() };
        assert_eq!(config.get_log_path(), PathBuf::from("/tmp/pk/plantkeep.log"));
    }
}

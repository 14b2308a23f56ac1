// filepath: src/config.rs
//! Configuration handling for photo-board
//!
//! This file defines the configuration structure and provides
//! functionality to load and save configuration from/to files.
//! The BoardConfig struct contains all configurable parameters.

use crate::draw::Color;
use crate::surface::StyleMap;
use crate::widgets::ButtonStyle;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

/// Environment variable that overrides `api.access_key`
pub const ACCESS_KEY_ENV: &str = "PHOTO_BOARD_ACCESS_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ButtonConfig {
    /// Photo id, also the counter key
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.unsplash.com".to_string(),
            access_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    /// Candidate font files, first readable one wins
    pub sans: Vec<String>,
    pub mono: Vec<String>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            sans: vec![
                "/usr/share/fonts/TTF/DejaVuSans.ttf".to_string(),
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf".to_string(),
                "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf".to_string(),
                "/usr/share/fonts/liberation/LiberationSans-Regular.ttf".to_string(),
            ],
            mono: vec![
                "/usr/share/fonts/TTF/DejaVuSansMono.ttf".to_string(),
                "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf".to_string(),
                "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf".to_string(),
                "/usr/share/fonts/liberation/LiberationMono-Regular.ttf".to_string(),
            ],
        }
    }
}

/// Configuration for the board appearance and behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BoardConfig {
    pub width: u32,
    pub height: u32,
    pub padding: f64,
    pub button_height: f64,
    pub columns: usize,
    pub font_size: f64,
    /// Counter file name under the data directory
    pub namespace: String,
    pub button_color: String,
    pub disabled_color: String,
    pub text_color: String,
    pub styles: StyleMap,
    pub fonts: FontConfig,
    pub api: ApiConfig,
    pub buttons: Vec<ButtonConfig>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        let button = |id: &str, label: &str| ButtonConfig {
            id: id.to_string(),
            label: label.to_string(),
        };
        Self {
            width: 800,
            height: 900,
            padding: 20.0,
            button_height: 50.0,
            columns: 2,
            font_size: 16.0,
            namespace: "j6w".to_string(),
            button_color: "#000000".to_string(),
            disabled_color: "#808080".to_string(),
            text_color: "#FFFFFF".to_string(),
            styles: StyleMap::from([("background".to_string(), "#EAEAEA".to_string())]),
            fonts: FontConfig::default(),
            api: ApiConfig::default(),
            buttons: vec![
                button("Nr88sR3i4Tg", "Button 1"),
                button("vunx8bmlees", "Button 2"),
                button("udvwVkU7jyw", "Button 3"),
                button("JBSON8KeFYM", "Button 4"),
            ],
        }
    }
}

impl BoardConfig {
    /// Get the path to the configuration file
    pub fn get_config_path() -> PathBuf {
        let config_dir = if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("photo-board")
        } else {
            PathBuf::from(".config/photo-board")
        };

        config_dir.join("config.toml")
    }

    /// Load configuration from file, returning default if not found
    pub fn load_from_file() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_path(&Self::get_config_path())
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        match fs::read_to_string(config_path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content)?;
                Ok(config)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // If the file doesn't exist, create it with default values
                let default_config = Self::default();
                default_config.save_to_path(config_path)?;
                Ok(default_config)
            }
            Err(e) => Err(Box::new(e)),
        }
    }

    pub fn save_to_path(&self, config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = config_path.parent() {
            if !Path::exists(parent) {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    /// Access key for the photo service; the environment wins over the file
    pub fn access_key(&self) -> Option<String> {
        env::var(ACCESS_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api.access_key.clone())
    }

    /// Resolved button colours, falling back to the defaults on bad hex
    pub fn button_style(&self) -> ButtonStyle {
        let defaults = ButtonStyle::default();
        ButtonStyle {
            fill: Color::parse_hex(&self.button_color).unwrap_or(defaults.fill),
            disabled_fill: Color::parse_hex(&self.disabled_color).unwrap_or(defaults.disabled_fill),
            text: Color::parse_hex(&self.text_color).unwrap_or(defaults.text),
            font_size: self.font_size as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo-board").join("config.toml");

        let config = BoardConfig::load_from_path(&path).unwrap();

        assert_eq!(config, BoardConfig::default());
        assert!(path.exists());
        assert_eq!(BoardConfig::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
columns = 1

[[buttons]]
id = "abc"
label = "Only"
"#,
        )
        .unwrap();

        let config = BoardConfig::load_from_path(&path).unwrap();
        assert_eq!(config.columns, 1);
        assert_eq!(config.padding, 20.0);
        assert_eq!(config.buttons.len(), 1);
        assert_eq!(config.buttons[0].label, "Only");
        assert_eq!(config.styles.get("background").map(String::as_str), Some("#EAEAEA"));
    }

    #[test]
    fn bad_colour_falls_back() {
        let config = BoardConfig {
            button_color: "black".to_string(),
            ..BoardConfig::default()
        };
        assert_eq!(config.button_style().fill, Color::BLACK);
        assert_eq!(config.button_style().disabled_fill, Color::GREY);
    }
}

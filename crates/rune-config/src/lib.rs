//! Rune typeset configuration system
//!
//! This crate provides centralized configuration for the text layout engine,
//! loading settings from `rune-typeset.toml` with environment overrides, and
//! the declarative font family descriptors that seed the font registry.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to parse family descriptors: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main configuration structure for the typesetter.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TypesetConfig {
    /// Font resolution and synthesis settings
    pub text: TextConfig,
    /// Text area settings used when laying out
    pub layout: LayoutConfig,
    /// Family descriptors to register at startup
    pub families: Vec<FamilyConfig>,
}

/// Font resolution configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Emulate small caps by shaping uppercase glyphs at a reduced size
    pub synthesize_small_caps: bool,
    /// Emulate subscript by shaping at a reduced size and lowering the baseline
    pub synthesize_subscript: bool,
    /// Emulate superscript by shaping at a reduced size and raising the baseline
    pub synthesize_superscript: bool,
    /// Family used when a caller does not name one
    pub default_family: Option<String>,
    /// Default text size in pixels per em
    pub default_size: f32,
}

/// Text area configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum line width in pixels; 0 disables soft wrapping
    pub area_width: f32,
    /// Height of the text area, used for vertical alignment
    pub area_height: f32,
    /// One of `top`, `center`, `bottom`
    pub vertical_alignment: String,
    /// Default paragraph direction is right-to-left
    pub right_to_left: bool,
    /// Force the default direction on every paragraph
    pub override_direction: bool,
}

/// Declarative description of a font family.
///
/// This is the persisted form; the layout engine validates it when the
/// family is registered.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FamilyConfig {
    pub name: String,
    /// ISO-15924 codes (`Latn`) or script names (`Latin`); empty means all scripts
    pub scripts: Vec<String>,
    /// Families consulted for scripts this family does not declare
    pub linked: Vec<String>,
    /// Last-resort families for uncovered codepoints
    pub fallbacks: Vec<String>,
    pub faces: Vec<FaceConfig>,
}

/// One font program within a family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FaceConfig {
    pub name: String,
    /// Location handed to the font byte source (file path or `system:` query)
    pub uri: String,
    /// Face index within a font collection
    pub index: u32,
    /// 100..=900 in steps of 100
    pub weight: u16,
    /// `normal` or `italic`
    pub style: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            synthesize_small_caps: true,
            synthesize_subscript: true,
            synthesize_superscript: true,
            default_family: None,
            default_size: 16.0,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            area_width: 0.0,
            area_height: 0.0,
            vertical_alignment: "top".to_string(),
            right_to_left: false,
            override_direction: false,
        }
    }
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            uri: String::new(),
            index: 0,
            weight: 400,
            style: "normal".to_string(),
        }
    }
}

impl TypesetConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from the default location (rune-typeset.toml in the
    /// current directory) or return default configuration if it is missing
    pub fn load_or_default() -> Self {
        match Self::load_from_file("rune-typeset.toml") {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(err) => {
                log::warn!("ignoring rune-typeset.toml: {err}");
                Self::default()
            }
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("RUNE_TYPESET_AREA_WIDTH") {
            if let Ok(width) = val.parse::<f32>() {
                self.layout.area_width = width;
            }
        }
        if let Ok(val) = std::env::var("RUNE_TYPESET_AREA_HEIGHT") {
            if let Ok(height) = val.parse::<f32>() {
                self.layout.area_height = height;
            }
        }
        if let Ok(val) = std::env::var("RUNE_TYPESET_RTL") {
            self.layout.right_to_left = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(family) = std::env::var("RUNE_TYPESET_FAMILY") {
            self.text.default_family = Some(family);
        }
        if let Ok(val) = std::env::var("RUNE_TYPESET_SIZE") {
            if let Ok(size) = val.parse::<f32>() {
                self.text.default_size = size;
            }
        }
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }

    /// Append family descriptors read from a JSON file.
    pub fn extend_families_from_json<P: AsRef<Path>>(&mut self, path: P) -> Result<(), ConfigError> {
        let families = load_families_json(path)?;
        self.families.extend(families);
        Ok(())
    }
}

/// Parse a JSON array of family descriptors.
pub fn families_from_json_str(content: &str) -> Result<Vec<FamilyConfig>, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

/// Read a JSON array of family descriptors from disk.
pub fn load_families_json<P: AsRef<Path>>(path: P) -> Result<Vec<FamilyConfig>, ConfigError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    families_from_json_str(&content)
}

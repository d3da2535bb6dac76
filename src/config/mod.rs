//! Configuration file support for sapin.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/sapin/config.toml`. Settings cover the reticle shape, its color
//! and opacity, placement and the debug overlay.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{Anchor, ColorSpec};
pub use types::{AppConfig, Offset, Position};

use crate::draw::{ColorError, Crosshair, Dot, RawShape, Shape, ShapeError, Twix};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised when a parsed config cannot produce a render request.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid shape: {0}")]
    Shape(#[from] ShapeError),

    #[error("Invalid color: {0}")]
    Color(#[from] ColorError),

    #[error(
        "Multiple shape sections present ({}); keep exactly one",
        section_list(.0)
    )]
    MultipleShapes(Vec<&'static str>),
}

fn section_list(sections: &[&str]) -> String {
    sections
        .iter()
        .map(|section| format!("[{section}]"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have defaults and will use those if not specified in the config file.
///
/// The shape comes from exactly one source: the untagged `[shape]` table, which is
/// classified by its attributes, or one of the explicit `[crosshair]`, `[dot]` and
/// `[twix]` tables.
///
/// # Example TOML
/// ```toml
/// color = "limegreen"
/// alpha = 0.8
/// debug = false
/// position = { x = 100, y = 40 }
///
/// [shape]
/// height = 16
/// thickness = 3
/// gap = 4
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Reticle color - a CSS color string or an RGB array like `[255, 0, 0]`
    #[serde(default)]
    pub color: ColorSpec,

    /// Opacity applied on top of the color (valid range: 0.0 - 1.0)
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Outline bounding boxes for debugging
    #[serde(default)]
    pub debug: bool,

    /// Keep the reticle out of screen captures where the host supports it
    #[serde(default = "default_protected")]
    pub protected: bool,

    /// Placement on the host surface: "center" or `{ x, y }`
    #[serde(default)]
    pub position: Position,

    /// Untagged shape, recognized by its attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<RawShape>,

    /// Explicit crosshair shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crosshair: Option<Crosshair>,

    /// Explicit dot shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot: Option<Dot>,

    /// Explicit twix shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twix: Option<Twix>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: ColorSpec::default(),
            alpha: default_alpha(),
            debug: false,
            protected: default_protected(),
            position: Position::default(),
            shape: Some(RawShape::from(Shape::default())),
            crosshair: None,
            dot: None,
            twix: None,
        }
    }
}

fn default_alpha() -> f64 {
    0.7
}

fn default_protected() -> bool {
    true
}

impl Config {
    /// Validates and clamps values that have a safe nearest value.
    ///
    /// Only `alpha` is clamped. Shape geometry is checked by [`Config::resolve`]
    /// instead, since moving a dimension would change the reticle the user asked for.
    fn validate_and_clamp(&mut self) {
        if self.alpha.is_nan() {
            warn!(
                "Invalid alpha NaN, falling back to {:.1}",
                default_alpha()
            );
            self.alpha = default_alpha();
        } else if !(0.0..=1.0).contains(&self.alpha) {
            warn!(
                "Invalid alpha {:.2}, clamping to 0.0-1.0 range",
                self.alpha
            );
            self.alpha = self.alpha.clamp(0.0, 1.0);
        }
    }

    /// Picks the shape from whichever shape table is present.
    ///
    /// Falls back to the default crosshair when none is.
    ///
    /// # Errors
    /// Returns [`ConfigError::MultipleShapes`] when more than one table is set, or
    /// [`ConfigError::Shape`] when the `[shape]` table cannot be classified.
    pub fn shape(&self) -> Result<Shape, ConfigError> {
        let mut sources = Vec::new();
        if self.shape.is_some() {
            sources.push("shape");
        }
        if self.crosshair.is_some() {
            sources.push("crosshair");
        }
        if self.dot.is_some() {
            sources.push("dot");
        }
        if self.twix.is_some() {
            sources.push("twix");
        }
        if sources.len() > 1 {
            return Err(ConfigError::MultipleShapes(sources));
        }

        let shape = if let Some(raw) = &self.shape {
            raw.classify()?
        } else if let Some(crosshair) = self.crosshair {
            Shape::Crosshair(crosshair)
        } else if let Some(dot) = self.dot {
            Shape::Dot(dot)
        } else if let Some(twix) = self.twix {
            Shape::Twix(twix)
        } else {
            debug!("No shape configured, using default crosshair");
            Shape::default()
        };
        Ok(shape)
    }

    /// Turns the file-level settings into a validated [`AppConfig`].
    ///
    /// # Errors
    /// Fails if more than one shape table is set, if the shape cannot be classified
    /// or has invalid geometry, or if the color cannot be parsed.
    pub fn resolve(&self) -> Result<AppConfig, ConfigError> {
        let shape = self.shape()?;
        shape.validate()?;
        let color = self.color.to_color()?;

        Ok(AppConfig {
            shape,
            size: shape.size(),
            color,
            alpha: self.alpha,
            debug: self.debug,
            position: self.position,
            protected: self.protected,
        })
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/sapin/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("sapin");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location.
    ///
    /// On first run the commented default config is written there, see
    /// [`Config::load_or_create`].
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_or_create(&config_path)
    }

    /// Loads `path`, first writing the default config there if it does not exist.
    ///
    /// Failing to write the default file is not fatal: it is logged and the
    /// built-in defaults are returned.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, creating default at {}", path.display());
            if let Err(err) = write_default_config(path) {
                warn!("{err:#}; using built-in defaults");
                return Ok(Self::default());
            }
        }

        Self::load_from(path)
    }

    /// Loads configuration from an explicit file path.
    ///
    /// Unlike [`Config::load`], a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Parses configuration from TOML text and clamps out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(text)?;
        config.validate_and_clamp();
        Ok(config)
    }

    /// Serializes the configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the example config to the user's config directory and returns its path.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        write_default_config(&config_path)?;
        Ok(config_path)
    }

    /// Returns the JSON schema of the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// Commented default config written on first run and by [`Config::create_default_file`].
pub const DEFAULT_CONFIG: &str = include_str!("../../config.example.toml");

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    info!("Created default config at {}", path.display());
    Ok(())
}

//! Configuration enum types.

use crate::draw::{Color, ColorError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Named placement of the reticle on its host surface.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Anchor {
    /// Reticle centered on the host surface
    Center,
}

/// Color specification - either a CSS color string or RGB values.
///
/// # Examples
/// ```toml
/// # Any CSS color: a name, hex notation, rgb()/rgba() or hsl()/hsla()
/// color = "limegreen"
/// color = "#034017"
/// color = "rgb(255 0 0 / 50%)"
/// color = "hsl(120, 100%, 25%)"
///
/// # RGB array (0-255 per component)
/// color = [255, 128, 0]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// CSS color string: name, "#rgb", "#rrggbb", "#rrggbbaa", "rgb()", "rgba()", "hsl()", "hsla()"
    Css(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`].
    ///
    /// RGB arrays are always valid and fully opaque. CSS strings are parsed
    /// with [`Color::parse`].
    pub fn to_color(&self) -> Result<Color, ColorError> {
        match self {
            ColorSpec::Css(spec) => Color::parse(spec),
            ColorSpec::Rgb([r, g, b]) => Ok(Color::from_rgb8(*r, *g, *b)),
        }
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        ColorSpec::Css("green".to_string())
    }
}

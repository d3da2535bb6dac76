//! Configuration type definitions.

use super::enums::Anchor;
use crate::draw::{Color, Shape, ShapeSize};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Where the reticle sits on its host surface.
///
/// # Examples
/// ```toml
/// position = "center"
/// position = { x = 100, y = 40 }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(untagged)]
pub enum Position {
    /// Named anchor, currently only "center"
    Anchor(Anchor),
    /// Explicit offset from the host's top-left corner
    Offset(Offset),
}

/// Offset of the reticle's top-left corner from the host's top-left corner, in pixels.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const CENTER: Position = Position::Anchor(Anchor::Center);

    pub fn offset(x: i32, y: i32) -> Self {
        Position::Offset(Offset { x, y })
    }

    /// Returns the top-left pixel of a `reticle`-sized box placed on a
    /// `host`-sized surface. Both sizes are `(width, height)`.
    ///
    /// Centering halves each dimension with integer division before
    /// subtracting, so odd sizes round towards the top-left.
    pub fn origin(&self, host: (i32, i32), reticle: (i32, i32)) -> (i32, i32) {
        match *self {
            Position::Anchor(Anchor::Center) => {
                (host.0 / 2 - reticle.0 / 2, host.1 / 2 - reticle.1 / 2)
            }
            Position::Offset(Offset { x, y }) => (x, y),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::CENTER
    }
}

/// Validated configuration for one render request.
///
/// Produced by [`Config::resolve`](super::Config::resolve); every field has
/// already been checked, so the renderer and surface can use them as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppConfig {
    /// Reticle shape, geometry already validated
    pub shape: Shape,
    /// Bounding box the host allocates for the shape
    pub size: ShapeSize,
    /// Fill and stroke color
    pub color: Color,
    /// Opacity applied on top of the color's own alpha (0.0 - 1.0)
    pub alpha: f64,
    /// Draw bounding box outlines
    pub debug: bool,
    /// Placement on the host surface
    pub position: Position,
    /// Ask hosts that support it to exclude the reticle from screen capture
    pub protected: bool,
}

impl AppConfig {
    /// Creates a config for `shape` with every other field at its default.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            size: shape.size(),
            color: Color::from_rgb8(0, 128, 0),
            alpha: 0.7,
            debug: false,
            position: Position::CENTER,
            protected: true,
        }
    }

    /// Color to paint with: `color` with `alpha` folded into its alpha channel.
    pub fn paint_color(&self) -> Color {
        self.color.with_opacity(self.alpha)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(Shape::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::Dot;

    #[test]
    fn center_uses_integer_halves() {
        assert_eq!(Position::CENTER.origin((1920, 1080), (22, 22)), (949, 529));
        assert_eq!(Position::CENTER.origin((101, 101), (11, 11)), (45, 45));
    }

    #[test]
    fn offset_ignores_sizes() {
        let position = Position::offset(-5, 12);
        assert_eq!(position.origin((100, 100), (50, 50)), (-5, 12));
    }

    #[test]
    fn app_config_derives_size_and_paint_color() {
        let mut config = AppConfig::new(Shape::Dot(Dot { radius: 4.0 }));
        assert_eq!(config.size.width, 8.0);
        assert_eq!(config.size.height, 8.0);

        config.color = Color::new(1.0, 0.0, 0.0, 0.5);
        config.alpha = 0.5;
        assert_eq!(config.paint_color().a, 0.25);
    }
}

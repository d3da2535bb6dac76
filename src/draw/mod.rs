//! Reticle shape model and rendering core.
//!
//! This module defines the drawing types:
//! - [`Shape`]: crosshair, dot and twix reticles, plus structural classification
//! - [`Canvas`]: the drawing context the renderer paints through
//! - [`Color`]: RGBA color with CSS-style parsing
//! - Rendering functions for each shape variant

pub mod canvas;
pub mod color;
pub mod record;
pub mod render;
pub mod shape;

// Re-export commonly used types at module level
pub use canvas::{Canvas, RenderError, TransformGuard};
pub use color::{Color, ColorError};
pub use record::{DrawOp, RecordingCanvas};
pub use render::{draw_crosshair, draw_dot, draw_twix, render_shape};
pub use shape::{Crosshair, Dot, RawShape, Shape, ShapeError, ShapeKind, ShapeSize, Twix};

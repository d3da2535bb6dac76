//! Drawing context abstraction used by the renderer.
//!
//! [`Canvas`] is the capability the reticle renderer draws through. The
//! production implementation is `cairo::Context`; tests and the `--ops` CLI
//! mode use [`RecordingCanvas`](super::record::RecordingCanvas).

use super::color::Color;
use log::warn;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Errors that can occur while drawing or encoding a reticle.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Invalid surface dimensions {width}x{height}")]
    SurfaceSize { width: i32, height: i32 },

    #[error("Invalid scale factor {0}")]
    InvalidScale(f64),

    #[error("Failed to encode PNG: {0}")]
    Png(#[from] cairo::IoError),

    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("restore() called without a matching save()")]
    UnbalancedRestore,
}

/// A 2D raster drawing context.
///
/// Rectangles are given as `(x, y, width, height)` in the current user space,
/// i.e. after any [`translate`](Canvas::translate) calls.
pub trait Canvas {
    /// Fills a rectangle with the current source color.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), RenderError>;

    /// Strokes a rectangle outline with the current source color and line width.
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64)
    -> Result<(), RenderError>;

    /// Makes a rectangle fully transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), RenderError>;

    /// Fills a circular sector from angle `start` to `end` (radians).
    fn fill_arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
    ) -> Result<(), RenderError>;

    /// Pushes the current transform onto the state stack.
    fn save(&mut self) -> Result<(), RenderError>;

    /// Pops the transform pushed by the matching [`save`](Canvas::save).
    fn restore(&mut self) -> Result<(), RenderError>;

    /// Moves the user-space origin by `(dx, dy)`.
    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), RenderError>;

    /// Sets the color used by subsequent fills and strokes.
    fn set_source(&mut self, color: Color) -> Result<(), RenderError>;

    /// Sets the line width used by subsequent strokes.
    fn set_line_width(&mut self, width: f64) -> Result<(), RenderError>;
}

/// Scoped transform mutation.
///
/// Saves the canvas state on creation and restores it when dropped, so the
/// transform never leaks past the scope even when a draw call inside it
/// fails and returns early through `?`.
pub struct TransformGuard<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
}

impl<'a, C: Canvas + ?Sized> TransformGuard<'a, C> {
    pub fn new(canvas: &'a mut C) -> Result<Self, RenderError> {
        canvas.save()?;
        Ok(Self { canvas })
    }
}

impl<C: Canvas + ?Sized> Deref for TransformGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for TransformGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for TransformGuard<'_, C> {
    fn drop(&mut self) {
        if let Err(err) = self.canvas.restore() {
            warn!("Failed to restore canvas transform: {err}");
        }
    }
}

// Inherent cairo methods share names with the trait, so they are called
// with fully qualified paths to avoid resolving back into this impl.
impl Canvas for cairo::Context {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), RenderError> {
        self.new_path();
        self.rectangle(x, y, width, height);
        cairo::Context::fill(self)?;
        Ok(())
    }

    fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError> {
        self.new_path();
        self.rectangle(x, y, width, height);
        cairo::Context::stroke(self)?;
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), RenderError> {
        cairo::Context::save(self)?;
        self.set_operator(cairo::Operator::Clear);
        self.new_path();
        self.rectangle(x, y, width, height);
        let cleared = cairo::Context::fill(self);
        cairo::Context::restore(self)?;
        cleared?;
        Ok(())
    }

    fn fill_arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
    ) -> Result<(), RenderError> {
        self.new_path();
        self.arc(cx, cy, radius, start, end);
        cairo::Context::fill(self)?;
        Ok(())
    }

    fn save(&mut self) -> Result<(), RenderError> {
        cairo::Context::save(self)?;
        Ok(())
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        cairo::Context::restore(self)?;
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), RenderError> {
        cairo::Context::translate(self, dx, dy);
        Ok(())
    }

    fn set_source(&mut self, color: Color) -> Result<(), RenderError> {
        self.set_source_rgba(color.r, color.g, color.b, color.a);
        Ok(())
    }

    fn set_line_width(&mut self, width: f64) -> Result<(), RenderError> {
        cairo::Context::set_line_width(self, width);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::record::{DrawOp, RecordingCanvas};

    #[test]
    fn guard_restores_on_drop() {
        let mut canvas = RecordingCanvas::new();
        {
            let mut scope = TransformGuard::new(&mut canvas).unwrap();
            scope.translate(3.0, 4.0).unwrap();
            assert_eq!(scope.depth(), 1);
        }
        assert_eq!(canvas.depth(), 0);
        assert_eq!(
            canvas.ops(),
            &[
                DrawOp::Save,
                DrawOp::Translate { dx: 3.0, dy: 4.0 },
                DrawOp::Restore
            ]
        );
    }

    #[test]
    fn guard_restores_when_scope_exits_with_error() {
        fn failing_scope(canvas: &mut RecordingCanvas) -> Result<(), RenderError> {
            let mut scope = TransformGuard::new(canvas)?;
            scope.translate(1.0, 1.0)?;
            Err(RenderError::Cairo(cairo::Error::NoMemory))
        }

        let mut canvas = RecordingCanvas::new();
        assert!(failing_scope(&mut canvas).is_err());
        assert_eq!(canvas.depth(), 0);
        assert_eq!(canvas.ops().last(), Some(&DrawOp::Restore));
    }

    #[test]
    fn cairo_clear_rect_leaves_operator_untouched() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 4, 4).unwrap();
        let mut ctx = cairo::Context::new(&surface).unwrap();
        ctx.clear_rect(0.0, 0.0, 2.0, 2.0).unwrap();
        assert_eq!(ctx.operator(), cairo::Operator::Over);
    }

    #[test]
    fn cairo_restore_without_save_is_an_error() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 4, 4).unwrap();
        let mut ctx = cairo::Context::new(&surface).unwrap();
        assert!(Canvas::restore(&mut ctx).is_err());
    }
}

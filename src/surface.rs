//! Host surface for reticles.
//!
//! Sizes a Cairo image surface for the configured shape, applies placement,
//! scale, color and opacity, then hands the context to the renderer. This is
//! the layer that consumes `position`, `size`, `color` and `alpha`; the
//! renderer itself only sees the shape and the debug flag.

use crate::config::AppConfig;
use crate::draw::{Canvas, RenderError, ShapeSize, render_shape};
use cairo::{Context, Format, ImageSurface};
use log::{debug, info};
use std::fs::File;
use std::path::Path;

/// Options for [`render_to_surface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    /// Device scale factor applied to the reticle (must be finite and > 0)
    pub scale: f64,
    /// Host surface size `(width, height)` in device pixels. `None` sizes the
    /// surface to the reticle and ignores `position`.
    pub canvas: Option<(i32, i32)>,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            canvas: None,
        }
    }
}

/// Device pixel size of a shape box at the given scale.
///
/// Rounds half to even and never returns less than one pixel per side.
pub fn pixel_size(size: ShapeSize, scale: f64) -> (i32, i32) {
    let to_pixels = |length: f64| {
        let scaled = (length * scale).round_ties_even();
        if scaled.is_finite() {
            (scaled as i32).max(1)
        } else {
            1
        }
    };
    (to_pixels(size.width), to_pixels(size.height))
}

/// Applies the config's color and opacity, then renders its shape.
///
/// Works on any [`Canvas`]; the origin must already sit at the reticle's
/// top-left corner.
pub fn paint_reticle<C: Canvas + ?Sized>(
    canvas: &mut C,
    config: &AppConfig,
) -> Result<(), RenderError> {
    canvas.set_source(config.paint_color())?;
    canvas.set_line_width(1.0)?;
    render_shape(canvas, &config.shape, config.debug)
}

/// Renders the configured reticle onto a new transparent ARGB surface.
///
/// # Errors
/// Returns [`RenderError::InvalidScale`] for a non-positive or non-finite scale,
/// [`RenderError::SurfaceSize`] for an empty host canvas, and any Cairo error
/// raised while drawing.
pub fn render_to_surface(
    config: &AppConfig,
    options: &SurfaceOptions,
) -> Result<ImageSurface, RenderError> {
    let scale = options.scale;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(RenderError::InvalidScale(scale));
    }

    let reticle = pixel_size(config.size, scale);
    let (width, height) = options.canvas.unwrap_or(reticle);
    if width <= 0 || height <= 0 {
        return Err(RenderError::SurfaceSize { width, height });
    }
    let origin = options
        .canvas
        .map_or((0, 0), |host| config.position.origin(host, reticle));
    debug!(
        "Rendering {} reticle: {}x{} px at {:?} on {}x{} surface",
        config.shape.kind(),
        reticle.0,
        reticle.1,
        origin,
        width,
        height
    );

    let surface = ImageSurface::create(Format::ARgb32, width, height)?;
    {
        let mut ctx = Context::new(&surface)?;
        ctx.translate(f64::from(origin.0), f64::from(origin.1));
        ctx.scale(scale, scale);
        paint_reticle(&mut ctx, config)?;
    }
    surface.flush();
    Ok(surface)
}

/// Encodes a surface as PNG and writes it to `path`.
pub fn write_png(surface: &ImageSurface, path: &Path) -> Result<(), RenderError> {
    let mut file = File::create(path)?;
    surface.write_to_png(&mut file)?;
    info!(
        "Wrote {}x{} reticle to {}",
        surface.width(),
        surface.height(),
        path.display()
    );
    Ok(())
}

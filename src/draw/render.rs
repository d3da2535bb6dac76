//! Reticle rendering functions.
//!
//! Each function paints one shape variant in its local coordinate space,
//! with the origin at the top-left corner of the shape's bounding box. The
//! caller is responsible for the source color and for placing the origin.

use super::canvas::{Canvas, RenderError, TransformGuard};
use super::shape::{Crosshair, Dot, Shape, Twix};
use log::trace;
use std::f64::consts::PI;

/// Renders a single shape to a canvas.
///
/// Dispatches to the variant-specific function. `debug` adds bounding box
/// outlines for the shapes that define one.
pub fn render_shape<C: Canvas + ?Sized>(
    canvas: &mut C,
    shape: &Shape,
    debug: bool,
) -> Result<(), RenderError> {
    match shape {
        Shape::Crosshair(crosshair) => draw_crosshair(canvas, crosshair, debug),
        Shape::Dot(dot) => draw_dot(canvas, dot, debug),
        Shape::Twix(twix) => draw_twix(canvas, twix, debug),
    }
}

/// Render a crosshair: two filled arms and an optional cleared center square.
///
/// The gap cutout runs inside a [`TransformGuard`], so the translation is
/// undone even if clearing fails.
pub fn draw_crosshair<C: Canvas + ?Sized>(
    canvas: &mut C,
    crosshair: &Crosshair,
    debug: bool,
) -> Result<(), RenderError> {
    let Crosshair {
        size,
        thickness,
        gap,
    } = *crosshair;
    let middle = (size - thickness) / 2.0;

    if debug {
        canvas.stroke_rect(0.0, 0.0, size, size)?;
    }

    // Horizontal arm, then vertical arm
    canvas.fill_rect(0.0, middle, size, thickness)?;
    canvas.fill_rect(middle, 0.0, thickness, size)?;

    if let Some(gap) = gap.filter(|gap| *gap != 0.0 && !gap.is_nan()) {
        trace!("Cutting {gap}px gap out of {size}px crosshair");
        let drift = (size - gap) / 2.0;
        let mut scope = TransformGuard::new(canvas)?;
        scope.translate(drift, drift)?;
        scope.clear_rect(0.0, 0.0, gap, gap)?;
        if debug {
            scope.stroke_rect(0.0, 0.0, gap, gap)?;
        }
    }
    Ok(())
}

/// Render a dot as a filled circle centered at `(radius, radius)`.
///
/// There is no debug outline for dots; `_debug` keeps the signature uniform.
pub fn draw_dot<C: Canvas + ?Sized>(
    canvas: &mut C,
    dot: &Dot,
    _debug: bool,
) -> Result<(), RenderError> {
    let Dot { radius } = *dot;
    canvas.fill_arc(radius, radius, radius, 0.0, 2.0 * PI)
}

/// Render a twix: a solid `width x height` block with a centered strip cleared.
pub fn draw_twix<C: Canvas + ?Sized>(
    canvas: &mut C,
    twix: &Twix,
    debug: bool,
) -> Result<(), RenderError> {
    let Twix {
        height,
        thickness,
        gap,
    } = *twix;
    let width = thickness * 2.0 + gap;

    if debug {
        canvas.stroke_rect(0.0, 0.0, width, height)?;
    }

    canvas.fill_rect(0.0, 0.0, width, height)?;

    if gap > 0.0 {
        let middle = width / 2.0 - gap / 2.0;
        canvas.clear_rect(middle, 0.0, gap, height)?;
    }
    Ok(())
}

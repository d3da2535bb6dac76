//! A [`Canvas`] that records drawing operations instead of painting them.

use super::canvas::{Canvas, RenderError};
use super::color::Color;
use serde::Serialize;

/// One call made against a [`Canvas`], in user-space coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    FillArc {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
    },
    Save,
    Restore,
    Translate {
        dx: f64,
        dy: f64,
    },
    SetSource {
        color: Color,
    },
    SetLineWidth {
        width: f64,
    },
}

/// Rectangle in device space (all translations applied).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Which rectangle operations [`RecordingCanvas::resolved_rects`] collects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RectOp {
    Fill,
    Stroke,
    Clear,
}

/// Records every call in order and tracks the save/restore depth.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    depth: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }

    /// Number of `save` calls not yet matched by a `restore`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Replays the recorded transforms and returns the device-space
    /// rectangles of every operation of the given kind.
    pub fn resolved_rects(&self, kind: RectOp) -> Vec<Bounds> {
        let mut origin = (0.0, 0.0);
        let mut stack = Vec::new();
        let mut rects = Vec::new();

        for op in &self.ops {
            let (x, y, width, height) = match (kind, op) {
                (
                    RectOp::Fill,
                    DrawOp::FillRect {
                        x,
                        y,
                        width,
                        height,
                    },
                )
                | (
                    RectOp::Stroke,
                    DrawOp::StrokeRect {
                        x,
                        y,
                        width,
                        height,
                    },
                )
                | (
                    RectOp::Clear,
                    DrawOp::ClearRect {
                        x,
                        y,
                        width,
                        height,
                    },
                ) => (*x, *y, *width, *height),
                (_, DrawOp::Save) => {
                    stack.push(origin);
                    continue;
                }
                (_, DrawOp::Restore) => {
                    origin = stack.pop().unwrap_or((0.0, 0.0));
                    continue;
                }
                (_, DrawOp::Translate { dx, dy }) => {
                    origin = (origin.0 + dx, origin.1 + dy);
                    continue;
                }
                _ => continue,
            };
            rects.push(Bounds {
                x: origin.0 + x,
                y: origin.1 + y,
                width,
                height,
            });
        }
        rects
    }

    /// Counts recorded operations matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| predicate(op)).count()
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), RenderError> {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), RenderError> {
        self.ops.push(DrawOp::StrokeRect {
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<(), RenderError> {
        self.ops.push(DrawOp::ClearRect {
            x,
            y,
            width,
            height,
        });
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
        self.ops.push(DrawOp::FillArc {
            cx,
            cy,
            radius,
            start,
            end,
        });
        Ok(())
    }

    fn save(&mut self) -> Result<(), RenderError> {
        self.depth += 1;
        self.ops.push(DrawOp::Save);
        Ok(())
    }

    fn restore(&mut self) -> Result<(), RenderError> {
        if self.depth == 0 {
            return Err(RenderError::UnbalancedRestore);
        }
        self.depth -= 1;
        self.ops.push(DrawOp::Restore);
        Ok(())
    }

    fn translate(&mut self, dx: f64, dy: f64) -> Result<(), RenderError> {
        self.ops.push(DrawOp::Translate { dx, dy });
        Ok(())
    }

    fn set_source(&mut self, color: Color) -> Result<(), RenderError> {
        self.ops.push(DrawOp::SetSource { color });
        Ok(())
    }

    fn set_line_width(&mut self, width: f64) -> Result<(), RenderError> {
        self.ops.push(DrawOp::SetLineWidth { width });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_rects_apply_nested_translations() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0).unwrap();
        canvas.save().unwrap();
        canvas.translate(10.0, 5.0).unwrap();
        canvas.clear_rect(1.0, 1.0, 2.0, 2.0).unwrap();
        canvas.restore().unwrap();
        canvas.clear_rect(0.0, 0.0, 3.0, 3.0).unwrap();

        assert_eq!(
            canvas.resolved_rects(RectOp::Clear),
            vec![
                Bounds {
                    x: 11.0,
                    y: 6.0,
                    width: 2.0,
                    height: 2.0
                },
                Bounds {
                    x: 0.0,
                    y: 0.0,
                    width: 3.0,
                    height: 3.0
                },
            ]
        );
        assert_eq!(canvas.resolved_rects(RectOp::Fill).len(), 1);
        assert!(canvas.resolved_rects(RectOp::Stroke).is_empty());
    }

    #[test]
    fn unmatched_restore_is_rejected() {
        let mut canvas = RecordingCanvas::new();
        assert!(matches!(
            canvas.restore(),
            Err(RenderError::UnbalancedRestore)
        ));
        assert!(canvas.ops().is_empty());
    }

    #[test]
    fn into_ops_hands_over_the_recording() {
        let mut canvas = RecordingCanvas::new();
        canvas.save().unwrap();
        canvas.translate(1.0, 2.0).unwrap();
        let ops = canvas.into_ops();
        assert_eq!(ops, vec![DrawOp::Save, DrawOp::Translate { dx: 1.0, dy: 2.0 }]);
    }

    #[test]
    fn ops_serialize_with_snake_case_tags() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_arc(5.0, 5.0, 5.0, 0.0, 1.0).unwrap();
        let json = serde_json::to_value(canvas.into_ops()).unwrap();
        assert_eq!(json[0]["op"], "fill_arc");
        assert_eq!(json[0]["radius"], 5.0);
    }
}

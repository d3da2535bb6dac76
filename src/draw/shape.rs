//! Reticle shape definitions and classification.
//!
//! [`Shape`] carries an explicit discriminant, so the `is_*` classifiers are
//! plain pattern matches. Payloads that arrive without a tag (the `[shape]`
//! table of the config file, JSON payloads) go through [`RawShape`], which
//! discriminates by which attributes are present and refuses any payload
//! that fits zero or several variants.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Square cross with arms of `thickness` centered in a `size x size` area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Crosshair {
    /// Edge length of the square area, in pixels
    pub size: f64,
    /// Arm thickness in pixels (0 < thickness <= size)
    pub thickness: f64,
    /// Edge length of the square cut out of the center (0 <= gap <= size)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
}

/// Filled circle centered at `(radius, radius)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Dot {
    /// Circle radius in pixels (> 0)
    pub radius: f64,
}

/// Two vertical bars of `thickness` separated by a `gap`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Twix {
    /// Bar height in pixels (> 0)
    pub height: f64,
    /// Width of each bar in pixels (>= 0)
    pub thickness: f64,
    /// Width of the cleared strip between the bars (>= 0)
    pub gap: f64,
}

/// A reticle shape.
///
/// Serializes without a tag; deserializing goes through [`RawShape::classify`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawShape", into = "RawShape")]
pub enum Shape {
    Crosshair(Crosshair),
    Dot(Dot),
    Twix(Twix),
}

/// Discriminant of a [`Shape`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Crosshair,
    Dot,
    Twix,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Crosshair => "crosshair",
            ShapeKind::Dot => "dot",
            ShapeKind::Twix => "twix",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounding box a host allocates for a shape, in unscaled pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeSize {
    pub width: f64,
    pub height: f64,
}

/// Errors raised while classifying or validating a shape.
#[derive(Debug, Error, PartialEq)]
pub enum ShapeError {
    #[error("shape has none of the attribute sets of crosshair, dot or twix")]
    Unrecognized,

    #[error("shape is ambiguous: it matches {}", join_kinds(.0))]
    Ambiguous(Vec<ShapeKind>),

    #[error("attribute '{field}' does not belong to a {kind}")]
    UnexpectedField { kind: ShapeKind, field: &'static str },

    #[error("invalid {kind} {field} {value}: expected {expected}")]
    InvalidGeometry {
        kind: ShapeKind,
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

fn join_kinds(kinds: &[ShapeKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.as_str())
        .collect::<Vec<_>>()
        .join(" and ")
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Crosshair(Crosshair {
            size: 22.0,
            thickness: 4.0,
            gap: Some(12.0),
        })
    }
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Crosshair(_) => ShapeKind::Crosshair,
            Shape::Dot(_) => ShapeKind::Dot,
            Shape::Twix(_) => ShapeKind::Twix,
        }
    }

    pub fn is_crosshair(&self) -> bool {
        matches!(self, Shape::Crosshair(_))
    }

    pub fn is_dot(&self) -> bool {
        matches!(self, Shape::Dot(_))
    }

    pub fn is_twix(&self) -> bool {
        matches!(self, Shape::Twix(_))
    }

    /// Returns the local bounding box of the shape.
    pub fn size(&self) -> ShapeSize {
        match *self {
            Shape::Crosshair(Crosshair { size, .. }) => ShapeSize {
                width: size,
                height: size,
            },
            Shape::Dot(Dot { radius }) => ShapeSize {
                width: radius * 2.0,
                height: radius * 2.0,
            },
            Shape::Twix(Twix {
                height,
                thickness,
                gap,
            }) => ShapeSize {
                width: thickness * 2.0 + gap,
                height,
            },
        }
    }

    /// Checks the geometric invariants of the shape.
    ///
    /// The renderer never checks these itself; invalid values just produce
    /// degenerate drawing. Callers validate before rendering.
    pub fn validate(&self) -> Result<(), ShapeError> {
        match *self {
            Shape::Crosshair(Crosshair {
                size,
                thickness,
                gap,
            }) => {
                let kind = ShapeKind::Crosshair;
                finite(kind, "size", size)?;
                finite(kind, "thickness", thickness)?;
                if !(thickness > 0.0 && thickness <= size) {
                    return Err(invalid(kind, "thickness", thickness, "0 < thickness <= size"));
                }
                if let Some(gap) = gap {
                    finite(kind, "gap", gap)?;
                    if !(0.0..=size).contains(&gap) {
                        return Err(invalid(kind, "gap", gap, "0 <= gap <= size"));
                    }
                }
                Ok(())
            }
            Shape::Dot(Dot { radius }) => {
                finite(ShapeKind::Dot, "radius", radius)?;
                if radius <= 0.0 {
                    return Err(invalid(ShapeKind::Dot, "radius", radius, "radius > 0"));
                }
                Ok(())
            }
            Shape::Twix(Twix {
                height,
                thickness,
                gap,
            }) => {
                let kind = ShapeKind::Twix;
                finite(kind, "height", height)?;
                finite(kind, "thickness", thickness)?;
                finite(kind, "gap", gap)?;
                if height <= 0.0 {
                    return Err(invalid(kind, "height", height, "height > 0"));
                }
                if thickness < 0.0 {
                    return Err(invalid(kind, "thickness", thickness, "thickness >= 0"));
                }
                if gap < 0.0 {
                    return Err(invalid(kind, "gap", gap, "gap >= 0"));
                }
                Ok(())
            }
        }
    }
}

fn invalid(kind: ShapeKind, field: &'static str, value: f64, expected: &'static str) -> ShapeError {
    ShapeError::InvalidGeometry {
        kind,
        field,
        value,
        expected,
    }
}

fn finite(kind: ShapeKind, field: &'static str, value: f64) -> Result<(), ShapeError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(kind, field, value, "a finite number"))
    }
}

/// Untagged shape payload, discriminated by which attributes are present.
///
/// - crosshair: `size` and `thickness` (`gap` optional)
/// - dot: `radius`
/// - twix: `height`, `thickness` and `gap`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RawShape {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl RawShape {
    pub fn looks_like_crosshair(&self) -> bool {
        self.size.is_some() && self.thickness.is_some()
    }

    pub fn looks_like_dot(&self) -> bool {
        self.radius.is_some()
    }

    pub fn looks_like_twix(&self) -> bool {
        self.height.is_some() && self.thickness.is_some() && self.gap.is_some()
    }

    /// Builds the single variant this payload matches.
    ///
    /// # Errors
    /// - [`ShapeError::Unrecognized`] when no attribute set matches
    /// - [`ShapeError::Ambiguous`] when more than one matches
    /// - [`ShapeError::UnexpectedField`] when the match leaves attributes unused
    pub fn classify(&self) -> Result<Shape, ShapeError> {
        let candidates: Vec<ShapeKind> = [
            (self.looks_like_crosshair(), ShapeKind::Crosshair),
            (self.looks_like_dot(), ShapeKind::Dot),
            (self.looks_like_twix(), ShapeKind::Twix),
        ]
        .into_iter()
        .filter_map(|(matched, kind)| matched.then_some(kind))
        .collect();

        let kind = match candidates.as_slice() {
            [] => return Err(ShapeError::Unrecognized),
            [kind] => *kind,
            _ => return Err(ShapeError::Ambiguous(candidates)),
        };
        self.reject_foreign_fields(kind)?;

        // The looks_like_* checks above guarantee the fields read here.
        let shape = match (kind, *self) {
            (
                ShapeKind::Crosshair,
                RawShape {
                    size: Some(size),
                    thickness: Some(thickness),
                    gap,
                    ..
                },
            ) => Shape::Crosshair(Crosshair {
                size,
                thickness,
                gap,
            }),
            (
                ShapeKind::Dot,
                RawShape {
                    radius: Some(radius),
                    ..
                },
            ) => Shape::Dot(Dot { radius }),
            (
                ShapeKind::Twix,
                RawShape {
                    height: Some(height),
                    thickness: Some(thickness),
                    gap: Some(gap),
                    ..
                },
            ) => Shape::Twix(Twix {
                height,
                thickness,
                gap,
            }),
            _ => return Err(ShapeError::Unrecognized),
        };
        Ok(shape)
    }

    fn reject_foreign_fields(&self, kind: ShapeKind) -> Result<(), ShapeError> {
        let present = [
            ("size", self.size.is_some()),
            ("thickness", self.thickness.is_some()),
            ("gap", self.gap.is_some()),
            ("radius", self.radius.is_some()),
            ("height", self.height.is_some()),
        ];
        let allowed: &[&str] = match kind {
            ShapeKind::Crosshair => &["size", "thickness", "gap"],
            ShapeKind::Dot => &["radius"],
            ShapeKind::Twix => &["height", "thickness", "gap"],
        };
        match present
            .iter()
            .find(|(field, is_set)| *is_set && !allowed.contains(field))
        {
            Some((field, _)) => Err(ShapeError::UnexpectedField {
                kind,
                field: *field,
            }),
            None => Ok(()),
        }
    }
}

impl TryFrom<RawShape> for Shape {
    type Error = ShapeError;

    fn try_from(raw: RawShape) -> Result<Self, Self::Error> {
        raw.classify()
    }
}

impl From<Shape> for RawShape {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Crosshair(Crosshair {
                size,
                thickness,
                gap,
            }) => RawShape {
                size: Some(size),
                thickness: Some(thickness),
                gap,
                ..RawShape::default()
            },
            Shape::Dot(Dot { radius }) => RawShape {
                radius: Some(radius),
                ..RawShape::default()
            },
            Shape::Twix(Twix {
                height,
                thickness,
                gap,
            }) => RawShape {
                height: Some(height),
                thickness: Some(thickness),
                gap: Some(gap),
                ..RawShape::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crosshair() -> Shape {
        Shape::Crosshair(Crosshair {
            size: 100.0,
            thickness: 10.0,
            gap: Some(20.0),
        })
    }

    fn dot() -> Shape {
        Shape::Dot(Dot { radius: 5.0 })
    }

    fn twix() -> Shape {
        Shape::Twix(Twix {
            height: 50.0,
            thickness: 8.0,
            gap: 4.0,
        })
    }

    #[test]
    fn exactly_one_classifier_matches_each_variant() {
        for shape in [crosshair(), dot(), twix()] {
            let matches = [shape.is_crosshair(), shape.is_dot(), shape.is_twix()];
            assert_eq!(
                matches.iter().filter(|m| **m).count(),
                1,
                "{shape:?} matched {matches:?}"
            );
        }
        assert!(crosshair().is_crosshair());
        assert!(dot().is_dot());
        assert!(twix().is_twix());
    }

    #[test]
    fn size_covers_each_variant_box() {
        assert_eq!(
            crosshair().size(),
            ShapeSize {
                width: 100.0,
                height: 100.0
            }
        );
        assert_eq!(
            dot().size(),
            ShapeSize {
                width: 10.0,
                height: 10.0
            }
        );
        assert_eq!(
            twix().size(),
            ShapeSize {
                width: 20.0,
                height: 50.0
            }
        );
    }

    #[test]
    fn classify_picks_variant_from_attributes() {
        let raw = RawShape {
            size: Some(22.0),
            thickness: Some(4.0),
            ..RawShape::default()
        };
        assert_eq!(
            raw.classify().unwrap(),
            Shape::Crosshair(Crosshair {
                size: 22.0,
                thickness: 4.0,
                gap: None
            })
        );

        let raw = RawShape {
            radius: Some(3.0),
            ..RawShape::default()
        };
        assert_eq!(raw.classify().unwrap(), Shape::Dot(Dot { radius: 3.0 }));

        // Shares `thickness` and `gap` with a gapped crosshair, but has `height`.
        let raw = RawShape {
            height: Some(50.0),
            thickness: Some(8.0),
            gap: Some(4.0),
            ..RawShape::default()
        };
        assert_eq!(raw.classify().unwrap(), twix());
    }

    #[test]
    fn classify_rejects_ambiguous_payloads() {
        let raw = RawShape {
            size: Some(10.0),
            thickness: Some(2.0),
            gap: Some(1.0),
            height: Some(10.0),
            ..RawShape::default()
        };
        assert_eq!(
            raw.classify(),
            Err(ShapeError::Ambiguous(vec![
                ShapeKind::Crosshair,
                ShapeKind::Twix
            ]))
        );

        let raw = RawShape {
            size: Some(10.0),
            thickness: Some(2.0),
            radius: Some(4.0),
            ..RawShape::default()
        };
        let err = raw.classify().unwrap_err();
        assert_eq!(
            err.to_string(),
            "shape is ambiguous: it matches crosshair and dot"
        );
    }

    #[test]
    fn classify_rejects_incomplete_and_foreign_attributes() {
        assert_eq!(RawShape::default().classify(), Err(ShapeError::Unrecognized));

        let twix_without_gap = RawShape {
            height: Some(10.0),
            thickness: Some(2.0),
            ..RawShape::default()
        };
        assert_eq!(twix_without_gap.classify(), Err(ShapeError::Unrecognized));

        let crosshair_with_height = RawShape {
            size: Some(10.0),
            thickness: Some(2.0),
            height: Some(10.0),
            ..RawShape::default()
        };
        assert_eq!(
            crosshair_with_height.classify(),
            Err(ShapeError::UnexpectedField {
                kind: ShapeKind::Crosshair,
                field: "height"
            })
        );

        let dot_with_gap = RawShape {
            radius: Some(4.0),
            gap: Some(1.0),
            ..RawShape::default()
        };
        assert_eq!(
            dot_with_gap.classify(),
            Err(ShapeError::UnexpectedField {
                kind: ShapeKind::Dot,
                field: "gap"
            })
        );
    }

    #[test]
    fn shape_deserializes_structurally_from_json() {
        let shape: Shape = serde_json::from_str(r#"{"radius": 4}"#).unwrap();
        assert_eq!(shape, Shape::Dot(Dot { radius: 4.0 }));

        let shape: Shape =
            serde_json::from_str(r#"{"size": 22, "thickness": 4, "gap": 12}"#).unwrap();
        assert_eq!(shape, Shape::default());

        let err = serde_json::from_str::<Shape>(r#"{"thickness": 4}"#).unwrap_err();
        assert!(err.to_string().contains("none of the attribute sets"));

        let json = serde_json::to_value(twix()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"height": 50.0, "thickness": 8.0, "gap": 4.0})
        );
    }

    #[test]
    fn validate_enforces_geometry_invariants() {
        assert!(crosshair().validate().is_ok());
        assert!(dot().validate().is_ok());
        assert!(twix().validate().is_ok());

        let thick = Shape::Crosshair(Crosshair {
            size: 10.0,
            thickness: 12.0,
            gap: None,
        });
        assert!(matches!(
            thick.validate(),
            Err(ShapeError::InvalidGeometry {
                field: "thickness",
                ..
            })
        ));

        let wide_gap = Shape::Crosshair(Crosshair {
            size: 10.0,
            thickness: 2.0,
            gap: Some(11.0),
        });
        assert!(matches!(
            wide_gap.validate(),
            Err(ShapeError::InvalidGeometry { field: "gap", .. })
        ));

        let flat_dot = Shape::Dot(Dot { radius: 0.0 });
        assert!(flat_dot.validate().is_err());

        let nan_twix = Shape::Twix(Twix {
            height: 10.0,
            thickness: f64::NAN,
            gap: 0.0,
        });
        assert!(matches!(
            nan_twix.validate(),
            Err(ShapeError::InvalidGeometry {
                kind: ShapeKind::Twix,
                field: "thickness",
                ..
            })
        ));

        for (height, thickness, gap, field) in [
            (0.0, 2.0, 1.0, "height"),
            (-3.0, 2.0, 1.0, "height"),
            (10.0, -1.0, 1.0, "thickness"),
            (10.0, 2.0, -0.5, "gap"),
            (10.0, 2.0, f64::INFINITY, "gap"),
        ] {
            let twix = Shape::Twix(Twix {
                height,
                thickness,
                gap,
            });
            match twix.validate() {
                Err(ShapeError::InvalidGeometry {
                    kind: ShapeKind::Twix,
                    field: got,
                    ..
                }) => assert_eq!(got, field),
                other => panic!("{twix:?} gave {other:?}, expected {field} error"),
            }
        }

        // Zero-width bars are allowed; the twix is then just its gap.
        let bare_twix = Shape::Twix(Twix {
            height: 10.0,
            thickness: 0.0,
            gap: 3.0,
        });
        assert!(bare_twix.validate().is_ok());
    }
}

//! Default perspective hint for a region's texture fill.
//!
//! This is a coarse 2D proxy: the category and the horizontal position of
//! the region pick one of a handful of fixed transforms. It does not
//! estimate camera pose or rectify anything.

use roomtint_core::config::OrientationConfig;
use roomtint_core::Category;
use serde::{Deserialize, Serialize};

/// Direction a horizontal surface is tilted toward the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TiltDirection {
    /// Floors: the far edge recedes upward
    Down,
    /// Ceilings: the far edge recedes downward
    Up,
}

/// Vanishing point a side wall is rotated toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VanishingSide {
    Left,
    Right,
}

/// Perspective-like transform applied to a tiled texture fill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransformSpec {
    Tilt {
        direction: TiltDirection,
        perspective_px: f32,
        degrees: f32,
        scale: f32,
    },
    Rotate {
        toward: VanishingSide,
        perspective_px: f32,
        degrees: f32,
        scale: f32,
    },
    Front {
        scale: f32,
    },
}

impl TransformSpec {
    pub fn scale(&self) -> f32 {
        match self {
            TransformSpec::Tilt { scale, .. }
            | TransformSpec::Rotate { scale, .. }
            | TransformSpec::Front { scale } => *scale,
        }
    }

    /// CSS transform string
    pub fn to_css(&self) -> String {
        match *self {
            TransformSpec::Tilt {
                direction,
                perspective_px,
                degrees,
                scale,
            } => {
                let angle = match direction {
                    TiltDirection::Down => degrees,
                    TiltDirection::Up => -degrees,
                };
                format!(
                    "perspective({}px) rotateX({}deg) scale({})",
                    perspective_px, angle, scale
                )
            }
            TransformSpec::Rotate {
                toward,
                perspective_px,
                degrees,
                scale,
            } => {
                let angle = match toward {
                    VanishingSide::Left => degrees,
                    VanishingSide::Right => -degrees,
                };
                format!(
                    "perspective({}px) rotateY({}deg) scale({})",
                    perspective_px, angle, scale
                )
            }
            TransformSpec::Front { scale } => format!("scale({})", scale),
        }
    }
}

/// Replaceable policy deriving a region's default transform
pub trait OrientationPolicy: Send + Sync {
    fn transform(&self, category: Category, center_x: f32, mask_width: usize) -> TransformSpec;
}

/// Category and position based heuristic
#[derive(Debug, Clone, Default)]
pub struct HeuristicOrientation {
    config: OrientationConfig,
}

impl HeuristicOrientation {
    pub fn new(config: OrientationConfig) -> Self {
        Self { config }
    }
}

impl OrientationPolicy for HeuristicOrientation {
    fn transform(&self, category: Category, center_x: f32, mask_width: usize) -> TransformSpec {
        let c = &self.config;
        match category {
            Category::Floor => TransformSpec::Tilt {
                direction: TiltDirection::Down,
                perspective_px: c.perspective_px,
                degrees: c.tilt_degrees,
                scale: c.tilt_scale,
            },
            Category::Ceiling => TransformSpec::Tilt {
                direction: TiltDirection::Up,
                perspective_px: c.perspective_px,
                degrees: c.tilt_degrees,
                scale: c.tilt_scale,
            },
            Category::Wall => {
                let ratio = if mask_width == 0 {
                    0.5
                } else {
                    center_x / mask_width as f32
                };
                if ratio < c.left_threshold {
                    TransformSpec::Rotate {
                        toward: VanishingSide::Left,
                        perspective_px: c.perspective_px,
                        degrees: c.rotate_degrees,
                        scale: c.side_scale,
                    }
                } else if ratio > c.right_threshold {
                    TransformSpec::Rotate {
                        toward: VanishingSide::Right,
                        perspective_px: c.perspective_px,
                        degrees: c.rotate_degrees,
                        scale: c.side_scale,
                    }
                } else {
                    TransformSpec::Front {
                        scale: c.front_scale,
                    }
                }
            }
        }
    }
}

/// Default heuristic with default parameters
pub fn default_transform(category: Category, center_x: f32, mask_width: usize) -> TransformSpec {
    HeuristicOrientation::default().transform(category, center_x, mask_width)
}

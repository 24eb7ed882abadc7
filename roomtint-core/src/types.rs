use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of a region within one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(pub u64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Surface category a region can be edited as
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Wall,
    Floor,
    Ceiling,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Wall, Category::Floor, Category::Ceiling];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Wall => "wall",
            Category::Floor => "floor",
            Category::Ceiling => "ceiling",
        }
    }

    /// Label shown next to the material picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Wall => "벽 (Wall)",
            Category::Floor => "바닥 (Floor)",
            Category::Ceiling => "천장 (Ceiling)",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wall" => Ok(Category::Wall),
            "floor" => Ok(Category::Floor),
            "ceiling" => Ok(Category::Ceiling),
            other => Err(Error::Configuration(format!("Unknown category: {}", other))),
        }
    }
}

/// Row-major occupancy scores as produced by the segmentation model.
/// Only the sign of each value matters: `> 0` means occupied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyMask {
    pub width: usize,
    pub height: usize,
    pub data: Vec<f32>,
}

impl OccupancyMask {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Self {
        Self { width, height, data }
    }

    /// All-zero mask of the given size
    pub fn empty(width: usize, height: usize) -> Self {
        Self::new(width, height, vec![0.0; width * height])
    }

    /// Check `data.len() == width * height` with non-zero dimensions
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::MaskShape(format!(
                "mask dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }

        let expected = self
            .width
            .checked_mul(self.height)
            .ok_or_else(|| Error::MaskShape("mask dimensions overflow".to_string()))?;

        if self.data.len() != expected {
            return Err(Error::MaskShape(format!(
                "mask data has {} values, expected {}x{} = {}",
                self.data.len(),
                self.width,
                self.height,
                expected
            )));
        }

        Ok(())
    }

    /// Whether the pixel at (x, y) is occupied. Out-of-range reads are unoccupied.
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.data
            .get(y * self.width + x)
            .map(|&v| v > 0.0)
            .unwrap_or(false)
    }

    pub fn occupied_count(&self) -> usize {
        self.data.iter().filter(|&&v| v > 0.0).count()
    }
}

/// One labelled mask from the inference collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    pub label: String,
    pub mask: OccupancyMask,
}

impl RawSegment {
    pub fn new(label: impl Into<String>, mask: OccupancyMask) -> Self {
        Self {
            label: label.into(),
            mask,
        }
    }
}

/// Horizontal extent of the occupied columns of a mask (inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: usize,
    pub max_x: usize,
}

impl BoundingBox {
    pub fn center_x(&self) -> f32 {
        (self.min_x + self.max_x) as f32 / 2.0
    }
}

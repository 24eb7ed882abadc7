//! Pointer hit-testing against region occupancy

use crate::regions::RegionIndex;
use roomtint_core::{OccupancyMask, RegionId};
use serde::{Deserialize, Serialize};

/// A click in the rendered element's local pixel space, together with the
/// element's current rendered size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f32,
    pub y: f32,
    pub display_width: f32,
    pub display_height: f32,
}

impl PointerEvent {
    pub fn new(x: f32, y: f32, display_width: f32, display_height: f32) -> Self {
        Self {
            x,
            y,
            display_width,
            display_height,
        }
    }

    /// Map into `mask` pixel coordinates, clamped to valid indices.
    /// `None` if the display size or the point is degenerate.
    pub fn to_mask_coords(&self, mask: &OccupancyMask) -> Option<(usize, usize)> {
        if mask.width == 0 || mask.height == 0 {
            return None;
        }
        Some((
            scale_axis(self.x, self.display_width, mask.width)?,
            scale_axis(self.y, self.display_height, mask.height)?,
        ))
    }
}

fn scale_axis(position: f32, extent: f32, cells: usize) -> Option<usize> {
    if !position.is_finite() || !extent.is_finite() || extent <= 0.0 {
        return None;
    }
    let scaled = (position / extent * cells as f32).floor();
    Some(scaled.clamp(0.0, (cells - 1) as f32) as usize)
}

/// First region, in ascending id order, occupying the pointed-at pixel.
///
/// Overlaps resolve to the earliest detected region.
pub fn resolve(regions: &RegionIndex, pointer: &PointerEvent) -> Option<RegionId> {
    regions
        .iter()
        .find(|region| {
            pointer
                .to_mask_coords(&region.occupancy)
                .map(|(x, y)| region.is_occupied(x, y))
                .unwrap_or(false)
        })
        .map(|region| region.id)
}

//! Serializable view of a session for presentation layers

use crate::binding::MaterialBindings;
use crate::processing::{Stencil, TransformSpec};
use crate::regions::Region;
use crate::session::{SessionPhase, SessionState};
use roomtint_core::{BoundingBox, Category, RegionId};
use serde::Serialize;

/// One region as shown to a presentation layer
#[derive(Debug, Clone, Serialize)]
pub struct RegionView<'a> {
    pub id: RegionId,
    pub category: Category,
    pub label: &'a str,
    pub bounding_box: BoundingBox,
    pub orientation: &'a TransformSpec,
    /// `orientation` as a CSS transform
    pub transform_css: String,
    pub stencil: &'a Stencil,
}

impl<'a> From<&'a Region> for RegionView<'a> {
    fn from(region: &'a Region) -> Self {
        Self {
            id: region.id,
            category: region.category,
            label: &region.label,
            bounding_box: region.bounding_box,
            orientation: &region.orientation,
            transform_css: region.orientation.to_css(),
            stencil: &region.stencil,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

/// Point-in-time view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot<'a> {
    pub phase: SessionPhase,
    pub status: StatusView,
    pub image_ref: Option<&'a str>,
    pub regions: Vec<RegionView<'a>>,
    pub selected_region_id: Option<RegionId>,
    pub bindings: &'a MaterialBindings,
}

impl<'a> SessionSnapshot<'a> {
    pub fn new(state: &'a SessionState) -> Self {
        let status = state.status();
        Self {
            phase: state.phase(),
            status: StatusView {
                status: status.as_str(),
                message: status.message(),
                progress: status.progress(),
            },
            image_ref: state.image_ref(),
            regions: state.regions().iter().map(RegionView::from).collect(),
            selected_region_id: state.selected(),
            bindings: state.bindings(),
        }
    }
}

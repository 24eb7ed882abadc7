//! Render layer derivation for the presentation layer

use crate::assets::{AssetCache, AssetLookup};
use crate::binding::MaterialBindings;
use crate::processing::{Stencil, TransformSpec};
use crate::regions::{Region, RegionIndex};
use roomtint_core::config::RenderConfig;
use roomtint_core::{Category, Material, MaterialKind, RegionId, Rgb};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// How a layer is blended onto the photo beneath it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlendMode {
    Normal,
    Multiply,
}

/// What a layer paints inside its stencil
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Fill {
    /// Flat color material
    Solid { color: Rgb, opacity: f32 },
    /// Tiled texture, `overscan` times the layer bounds, centered, transformed
    Tiled {
        image: String,
        tile_px: u32,
        overscan: f32,
        transform: TransformSpec,
        opacity: f32,
    },
    /// Bound material whose texture is unavailable
    Placeholder {
        material_id: String,
        color: Rgb,
        opacity: f32,
    },
    /// Selection highlight of an unbound region
    Highlight { color: Rgb, opacity: f32 },
}

/// One stencil-clipped overlay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderLayer<'a> {
    pub region_id: RegionId,
    pub category: Category,
    pub stencil: &'a Stencil,
    pub z_order: i32,
    pub blend_mode: BlendMode,
    pub fill: Fill,
}

/// Derives the ordered layer list from regions, bindings and selection
#[derive(Debug, Clone)]
pub struct CompositeRenderer {
    config: RenderConfig,
    assets: Arc<AssetCache>,
    highlight: Rgb,
    placeholder: Rgb,
}

const FALLBACK_HIGHLIGHT: Rgb = Rgb::new(0, 120, 255);
const FALLBACK_PLACEHOLDER: Rgb = Rgb::new(204, 204, 204);

impl CompositeRenderer {
    pub fn new(config: RenderConfig, assets: Arc<AssetCache>) -> Self {
        let highlight = Rgb::parse_hex(&config.highlight_color).unwrap_or(FALLBACK_HIGHLIGHT);
        let placeholder = Rgb::parse_hex(&config.placeholder_color).unwrap_or(FALLBACK_PLACEHOLDER);
        Self {
            config,
            assets,
            highlight,
            placeholder,
        }
    }

    /// Layers for every selected or bound region, in drawing order
    /// (ascending z-order, then region id).
    pub fn layers<'a>(
        &self,
        regions: &'a RegionIndex,
        bindings: &MaterialBindings,
        selected: Option<RegionId>,
    ) -> Vec<RenderLayer<'a>> {
        let mut layers: Vec<RenderLayer<'a>> = regions
            .iter()
            .filter_map(|region| {
                let is_selected = selected == Some(region.id);
                let bound = bindings.get(region.id);
                if !is_selected && bound.is_none() {
                    return None;
                }
                Some(self.layer(region, is_selected, bound))
            })
            .collect();

        layers.sort_by_key(|layer| (layer.z_order, layer.region_id));
        debug!("Derived {} render layers", layers.len());
        layers
    }

    fn layer<'a>(&self, region: &'a Region, is_selected: bool, bound: Option<&Material>) -> RenderLayer<'a> {
        let z_order = if is_selected {
            self.config.selected_z
        } else {
            self.config.bound_z
        };

        let (blend_mode, fill) = match bound {
            Some(material) => (BlendMode::Multiply, self.material_fill(region, material)),
            None => (
                BlendMode::Normal,
                Fill::Highlight {
                    color: self.highlight,
                    opacity: self.config.highlight_opacity,
                },
            ),
        };

        RenderLayer {
            region_id: region.id,
            category: region.category,
            stencil: &region.stencil,
            z_order,
            blend_mode,
            fill,
        }
    }

    fn material_fill(&self, region: &Region, material: &Material) -> Fill {
        match &material.kind {
            MaterialKind::Color { color } => match Rgb::parse_hex(color) {
                Some(color) => Fill::Solid {
                    color,
                    opacity: self.config.color_opacity,
                },
                None => self.placeholder(material, self.config.color_opacity),
            },
            MaterialKind::Texture { image } => match self.assets.lookup(image) {
                AssetLookup::Image(_) => Fill::Tiled {
                    image: image.clone(),
                    tile_px: self.config.texture_tile_px,
                    overscan: self.config.texture_overscan,
                    transform: region.orientation,
                    opacity: self.config.texture_opacity,
                },
                AssetLookup::Missing => self.placeholder(material, self.config.texture_opacity),
            },
        }
    }

    fn placeholder(&self, material: &Material, opacity: f32) -> Fill {
        Fill::Placeholder {
            material_id: material.id.clone(),
            color: self.placeholder,
            opacity,
        }
    }
}

//! End-to-end tests of the extraction and compositing pipeline

use image::{Rgba, RgbaImage};
use roomtint_core::config::RenderConfig;
use roomtint_core::{Category, MaterialCatalog, OccupancyMask, RawSegment, RegionId};
use roomtint_eye::processing::{ingest, HeuristicOrientation, MaskEncoder, TransformSpec};
use roomtint_eye::{
    AssetCache, BlendMode, CompositeRenderer, Fill, FsAssetLoader, MaterialBindings,
    PointerEvent, RegionIndex,
};
use std::sync::Arc;

const SIZE: usize = 32;

fn rect(x0: usize, x1: usize, y0: usize, y1: usize) -> OccupancyMask {
    let mut mask = OccupancyMask::empty(SIZE, SIZE);
    for y in y0..=y1 {
        for x in x0..=x1 {
            mask.data[y * SIZE + x] = 1.0;
        }
    }
    mask
}

/// A simple room: ceiling strip on top, floor strip at the bottom,
/// a wall on each side and a back wall in the middle.
fn room() -> Vec<RawSegment> {
    vec![
        RawSegment::new("ceiling", rect(0, 31, 0, 5)),
        RawSegment::new("floor, flooring", rect(0, 31, 26, 31)),
        RawSegment::new("wall", rect(0, 7, 6, 25)),
        RawSegment::new("wall", rect(24, 31, 6, 25)),
        RawSegment::new("wall", rect(8, 23, 6, 25)),
        RawSegment::new("window", rect(10, 20, 10, 20)),
        RawSegment::new("wall", OccupancyMask::empty(SIZE, SIZE)),
    ]
}

fn build() -> RegionIndex {
    RegionIndex::build(
        ingest(room()),
        &MaskEncoder::default(),
        &HeuristicOrientation::default(),
    )
}

#[test]
fn test_room_regions() {
    let regions = build();
    assert_eq!(regions.len(), 5);

    let categories: Vec<Category> = regions.iter().map(|r| r.category).collect();
    assert_eq!(
        categories,
        vec![
            Category::Ceiling,
            Category::Floor,
            Category::Wall,
            Category::Wall,
            Category::Wall
        ]
    );

    for (i, region) in regions.iter().enumerate() {
        assert_eq!(region.id, RegionId(i as u64));
        assert_eq!(region.stencil.width, SIZE as u32);
        assert!(!region.stencil.is_empty());
    }
}

#[test]
fn test_room_orientations() {
    let regions = build();
    let css: Vec<String> = regions.iter().map(|r| r.orientation.to_css()).collect();
    assert!(css[0].contains("rotateX(-60deg)"));
    assert!(css[1].contains("rotateX(60deg)"));
    assert!(css[2].contains("rotateY(55deg)"));
    assert!(css[3].contains("rotateY(-55deg)"));
    assert!(matches!(
        regions.get(RegionId(4)).unwrap().orientation,
        TransformSpec::Front { .. }
    ));
}

#[test]
fn test_clicks_resolve_to_regions() {
    let regions = build();
    let click = |x: f32, y: f32| roomtint_eye::resolve(&regions, &PointerEvent::new(x, y, 320.0, 320.0));

    assert_eq!(click(160.0, 10.0), Some(RegionId(0)));
    assert_eq!(click(160.0, 300.0), Some(RegionId(1)));
    assert_eq!(click(10.0, 160.0), Some(RegionId(2)));
    assert_eq!(click(310.0, 160.0), Some(RegionId(3)));
    assert_eq!(click(160.0, 160.0), Some(RegionId(4)));
    // bottom-right edge clamps into the floor
    assert_eq!(click(320.0, 320.0), Some(RegionId(1)));
}

#[test]
fn test_texture_layer_with_loaded_asset() {
    let dir = tempfile::tempdir().unwrap();
    let textures = dir.path().join("textures");
    std::fs::create_dir_all(&textures).unwrap();
    RgbaImage::from_pixel(4, 4, Rgba([180, 60, 40, 255]))
        .save(textures.join("brick.png"))
        .unwrap();

    let cache = Arc::new(AssetCache::new());
    let loader = FsAssetLoader::new(dir.path());
    let refs = MaterialCatalog::default().unique_texture_refs();
    let report = tokio_test::block_on(cache.preload(&refs, &loader));
    assert_eq!(report.loaded, 1);
    assert_eq!(report.failed, refs.len() - 1);

    let regions = build();
    let catalog = MaterialCatalog::default();
    let mut bindings = MaterialBindings::new();
    let brick = catalog.find(Category::Wall, "wall-brick").unwrap();
    let plaster = catalog.find(Category::Wall, "wall-plaster").unwrap();
    bindings.apply(regions.get(RegionId(2)), brick, &catalog).unwrap();
    bindings.apply(regions.get(RegionId(3)), plaster, &catalog).unwrap();

    let renderer = CompositeRenderer::new(RenderConfig::default(), cache);
    let layers = renderer.layers(&regions, &bindings, Some(RegionId(4)));
    assert_eq!(layers.len(), 3);

    assert_eq!(layers[0].region_id, RegionId(2));
    assert!(matches!(layers[0].fill, Fill::Tiled { .. }));
    assert_eq!(layers[0].blend_mode, BlendMode::Multiply);

    assert_eq!(layers[1].region_id, RegionId(3));
    assert!(matches!(layers[1].fill, Fill::Placeholder { .. }));

    assert_eq!(layers[2].region_id, RegionId(4));
    assert!(matches!(layers[2].fill, Fill::Highlight { .. }));
    assert!(layers[2].z_order > layers[0].z_order);
}

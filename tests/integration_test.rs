//! Full editing session against recorded output and real texture files

use image::{Rgba, RgbaImage};
use roomtint_core::{OccupancyMask, RawSegment, RegionId, TintConfig};
use roomtint_eye::{
    AssetCache, Fill, FsAssetLoader, PointerEvent, RecordedBackend, SessionController,
    SessionPhase,
};
use std::sync::Arc;

fn half(left: bool) -> OccupancyMask {
    let mut mask = OccupancyMask::empty(8, 8);
    for y in 0..8 {
        for x in 0..8 {
            if (x < 4) == left {
                mask.data[y * 8 + x] = 1.0;
            }
        }
    }
    mask
}

#[tokio::test]
async fn test_session_with_textures() {
    let dir = tempfile::tempdir().unwrap();
    let textures = dir.path().join("textures");
    std::fs::create_dir_all(&textures).unwrap();
    for name in ["wood.png", "panel.png"] {
        RgbaImage::from_pixel(8, 8, Rgba([120, 90, 60, 255]))
            .save(textures.join(name))
            .unwrap();
    }

    let mut config = TintConfig::default();
    config.assets.texture_root = dir.path().to_path_buf();

    let assets = Arc::new(AssetCache::new());
    let loader = FsAssetLoader::new(&config.assets.texture_root);
    let report = assets
        .preload(&config.catalog.unique_texture_refs(), &loader)
        .await;
    assert_eq!(report.loaded, 2);
    assert_eq!(report.failed, 3);
    assert_eq!(assets.failures().len(), 3);

    let mut session = SessionController::new(config, assets);
    let backend = RecordedBackend::from_segments(
        "recorded",
        vec![
            RawSegment::new("wall", half(true)),
            RawSegment::new("floor", half(false)),
        ],
    );
    assert_eq!(session.run_inference("room.jpg", &backend).await.unwrap(), 2);
    assert_eq!(session.phase(), SessionPhase::Ready);

    session.select_at(&PointerEvent::new(10.0, 10.0, 80.0, 80.0)).unwrap();
    session.apply_by_id("wall-panel").unwrap();
    session.select_at(&PointerEvent::new(70.0, 10.0, 80.0, 80.0)).unwrap();
    session.apply_by_id("floor-concrete").unwrap();
    session.select(None).unwrap();

    let layers = session.layers();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[0].region_id, RegionId(0));
    match &layers[0].fill {
        Fill::Tiled { image, tile_px, overscan, .. } => {
            assert_eq!(image, "/textures/panel.png");
            assert_eq!(*tile_px, 200);
            assert_eq!(*overscan, 2.0);
        }
        other => panic!("expected a tiled fill, got {:?}", other),
    }
    assert!(matches!(layers[1].fill, Fill::Placeholder { .. }));

    let json = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(json["bindings"]["0"]["id"], "wall-panel");
    assert_eq!(json["bindings"]["1"]["id"], "floor-concrete");
}

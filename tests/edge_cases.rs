//! Edge cases across the extraction pipeline

use roomtint_core::{Category, Error, OccupancyMask, RawSegment, RegionId, TintConfig};
use roomtint_eye::processing::{classify_label, ingest, HeuristicOrientation, MaskEncoder};
use roomtint_eye::{AssetCache, PointerEvent, RegionIndex, SessionController, SessionPhase};
use std::sync::Arc;

fn build(segments: Vec<RawSegment>) -> RegionIndex {
    RegionIndex::build(
        ingest(segments),
        &MaskEncoder::default(),
        &HeuristicOrientation::default(),
    )
}

#[test]
fn test_label_priority() {
    assert_eq!(classify_label("floor, flooring"), Some(Category::Floor));
    assert_eq!(classify_label("wall floor"), Some(Category::Floor));
    assert_eq!(classify_label("Ceiling"), Some(Category::Ceiling));
    assert_eq!(classify_label("WALL"), Some(Category::Wall));
    assert_eq!(classify_label(""), None);
    assert_eq!(classify_label("sky"), None);
}

#[test]
fn test_no_segments() {
    assert!(build(Vec::new()).is_empty());
}

#[test]
fn test_malformed_mask_is_skipped() {
    let regions = build(vec![
        RawSegment::new("wall", OccupancyMask::new(3, 3, vec![1.0; 4])),
        RawSegment::new("floor", OccupancyMask::new(2, 2, vec![1.0; 4])),
    ]);
    assert_eq!(regions.len(), 1);
    assert_eq!(regions.get(RegionId(0)).unwrap().category, Category::Floor);
}

#[test]
fn test_negative_scores_are_unoccupied() {
    let mask = OccupancyMask::new(2, 1, vec![-0.5, 0.0]);
    assert!(matches!(
        MaskEncoder::default().encode(0, &mask),
        Err(Error::EmptyRegion { index: 0 })
    ));
}

#[test]
fn test_single_pixel_region() {
    let regions = build(vec![RawSegment::new(
        "wall",
        OccupancyMask::new(1, 1, vec![1.0]),
    )]);
    let region = regions.get(RegionId(0)).unwrap();
    assert_eq!(region.bounding_box.min_x, 0);
    assert_eq!(region.bounding_box.max_x, 0);

    let hit = roomtint_eye::resolve(&regions, &PointerEvent::new(999.0, -5.0, 10.0, 10.0));
    assert_eq!(hit, Some(RegionId(0)));
}

#[test]
fn test_overlapping_regions_resolve_to_earliest() {
    let full = || OccupancyMask::new(2, 2, vec![1.0; 4]);
    let regions = build(vec![
        RawSegment::new("ceiling", full()),
        RawSegment::new("wall", full()),
    ]);
    let hit = roomtint_eye::resolve(&regions, &PointerEvent::new(1.0, 1.0, 2.0, 2.0));
    assert_eq!(hit, Some(RegionId(0)));
}

#[test]
fn test_degenerate_display_size() {
    let regions = build(vec![RawSegment::new(
        "wall",
        OccupancyMask::new(2, 2, vec![1.0; 4]),
    )]);
    assert_eq!(
        roomtint_eye::resolve(&regions, &PointerEvent::new(1.0, 1.0, 0.0, 10.0)),
        None
    );
    assert_eq!(
        roomtint_eye::resolve(&regions, &PointerEvent::new(f32::NAN, 1.0, 10.0, 10.0)),
        None
    );
}

#[test]
fn test_session_with_no_surfaces_is_ready_and_empty() {
    let mut session = SessionController::new(TintConfig::default(), Arc::new(AssetCache::new()));
    let ticket = session.begin_upload("outdoor.jpg");
    session.start_inference(&ticket);
    session.complete(
        ticket.generation,
        Ok(vec![RawSegment::new("sky", OccupancyMask::new(1, 1, vec![1.0]))]),
    );
    assert_eq!(session.phase(), SessionPhase::Ready);
    assert!(session.regions().is_empty());
    assert_eq!(
        session
            .select_at(&PointerEvent::new(0.0, 0.0, 1.0, 1.0))
            .unwrap(),
        None
    );
}

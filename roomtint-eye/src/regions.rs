//! Id-stable regions derived from one image's segmentation

use crate::processing::{ClassifiedSegment, MaskEncoder, OrientationPolicy, Stencil, TransformSpec};
use roomtint_core::{BoundingBox, Category, Error, OccupancyMask, RegionId};
use tracing::{debug, info, warn};

/// An editable surface. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    pub category: Category,
    /// Label reported by the segmentation model
    pub label: String,
    /// Retained for hit-testing
    pub occupancy: OccupancyMask,
    pub bounding_box: BoundingBox,
    pub stencil: Stencil,
    pub orientation: TransformSpec,
}

impl Region {
    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.occupancy.is_occupied(x, y)
    }
}

/// Ordered region list for the active image, ascending by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionIndex {
    regions: Vec<Region>,
}

impl RegionIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Encode every classified segment into a region.
    ///
    /// Empty and malformed masks are skipped without affecting their
    /// siblings. Ids are assigned densely, in input order, to the
    /// regions actually produced.
    pub fn build(
        segments: Vec<ClassifiedSegment>,
        encoder: &MaskEncoder,
        policy: &dyn OrientationPolicy,
    ) -> Self {
        let total = segments.len();
        let mut regions = Vec::with_capacity(total);

        for (index, classified) in segments.into_iter().enumerate() {
            let ClassifiedSegment { segment, category } = classified;
            let encoded = match encoder.encode(index, &segment.mask) {
                Ok(encoded) => encoded,
                Err(Error::EmptyRegion { index }) => {
                    debug!("Dropping empty mask for segment {} ('{}')", index, segment.label);
                    continue;
                }
                Err(e) => {
                    warn!("Skipping segment {} ('{}'): {}", index, segment.label, e);
                    continue;
                }
            };

            let orientation = policy.transform(
                category,
                encoded.bounding_box.center_x(),
                segment.mask.width,
            );
            let id = RegionId(regions.len() as u64);
            debug!(
                "Region {} {} columns {}..={} -> {}",
                id,
                category,
                encoded.bounding_box.min_x,
                encoded.bounding_box.max_x,
                orientation.to_css()
            );

            regions.push(Region {
                id,
                category,
                label: segment.label,
                occupancy: segment.mask,
                bounding_box: encoded.bounding_box,
                stencil: encoded.stencil,
                orientation,
            });
        }

        info!("Built {} regions from {} classified segments", regions.len(), total);
        Self { regions }
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions
            .binary_search_by_key(&id, |r| r.id)
            .ok()
            .map(|i| &self.regions[i])
    }

    pub fn contains(&self, id: RegionId) -> bool {
        self.get(id).is_some()
    }

    /// Regions in ascending id (detection) order
    pub fn iter(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::{ingest, HeuristicOrientation, VanishingSide};
    use roomtint_core::RawSegment;

    fn columns(width: usize, height: usize, x0: usize, x1: usize) -> OccupancyMask {
        let mut mask = OccupancyMask::empty(width, height);
        for y in 0..height {
            for x in x0..=x1 {
                mask.data[y * width + x] = 1.0;
            }
        }
        mask
    }

    fn build(segments: Vec<RawSegment>) -> RegionIndex {
        RegionIndex::build(
            ingest(segments),
            &MaskEncoder::default(),
            &HeuristicOrientation::default(),
        )
    }

    #[test]
    fn test_build_assigns_dense_ids_in_order() {
        let index = build(vec![
            RawSegment::new("wall", columns(20, 10, 0, 5)),
            RawSegment::new("sky", columns(20, 10, 0, 19)),
            RawSegment::new("floor", columns(20, 10, 0, 19)),
        ]);
        let ids: Vec<u64> = index.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(index.get(RegionId(0)).unwrap().category, Category::Wall);
        assert_eq!(index.get(RegionId(1)).unwrap().category, Category::Floor);
        assert!(index.get(RegionId(2)).is_none());
    }

    #[test]
    fn test_build_skips_empty_and_malformed_masks() {
        let index = build(vec![
            RawSegment::new("wall", OccupancyMask::empty(10, 10)),
            RawSegment::new("wall", OccupancyMask::new(10, 10, vec![1.0; 7])),
            RawSegment::new("ceiling", columns(10, 10, 2, 3)),
        ]);
        assert_eq!(index.len(), 1);
        let region = index.get(RegionId(0)).unwrap();
        assert_eq!(region.category, Category::Ceiling);
        assert_eq!(region.bounding_box, BoundingBox { min_x: 2, max_x: 3 });
    }

    #[test]
    fn test_build_derives_orientation_from_bbox_center() {
        let index = build(vec![
            RawSegment::new("wall", columns(100, 4, 0, 30)),
            RawSegment::new("wall", columns(100, 4, 70, 99)),
        ]);
        assert!(matches!(
            index.get(RegionId(0)).unwrap().orientation,
            TransformSpec::Rotate { toward: VanishingSide::Left, .. }
        ));
        assert!(matches!(
            index.get(RegionId(1)).unwrap().orientation,
            TransformSpec::Rotate { toward: VanishingSide::Right, .. }
        ));
    }

    #[test]
    fn test_empty_index() {
        let index = RegionIndex::empty();
        assert!(index.is_empty());
        assert!(!index.contains(RegionId(0)));
    }
}

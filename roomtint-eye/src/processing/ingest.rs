//! Classification of raw inference segments into surface categories

use roomtint_core::{Category, RawSegment};
use tracing::debug;

/// Keyword sets checked in priority order; the first category with a
/// matching keyword wins.
const KEYWORDS: [(Category, &[&str]); 3] = [
    (Category::Floor, &["floor", "flooring"]),
    (Category::Ceiling, &["ceiling"]),
    (Category::Wall, &["wall"]),
];

/// A raw segment accepted as an editable surface
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedSegment {
    pub segment: RawSegment,
    pub category: Category,
}

/// Classify a model label, case-insensitively, by substring match
pub fn classify_label(label: &str) -> Option<Category> {
    let label = label.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| label.contains(w)))
        .map(|(category, _)| *category)
}

/// Keep the segments that classify to a category, preserving input order
pub fn ingest(segments: Vec<RawSegment>) -> Vec<ClassifiedSegment> {
    let total = segments.len();
    let accepted: Vec<ClassifiedSegment> = segments
        .into_iter()
        .filter_map(|segment| match classify_label(&segment.label) {
            Some(category) => Some(ClassifiedSegment { segment, category }),
            None => {
                debug!("Ignoring segment with label '{}'", segment.label);
                None
            }
        })
        .collect();
    debug!("Accepted {} of {} segments", accepted.len(), total);
    accepted
}

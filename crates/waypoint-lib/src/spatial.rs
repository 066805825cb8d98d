//! R*-tree over edge segments for coordinate resolution.
//!
//! Each logical road segment is indexed once under the id of its first
//! directed edge. Lookups return candidates whose bounding box intersects the
//! query box; exact distances are left to the resolver.

use rstar::{RTree, RTreeObject, AABB};
use tracing::info;

use crate::geo::{Coordinate, Metric};
use crate::graph::EdgeId;

/// Segment geometry stored in the R*-tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedSegment {
    pub edge: EdgeId,
    /// `[longitude, latitude]` of the segment start.
    pub start: [f64; 2],
    /// `[longitude, latitude]` of the segment end.
    pub end: [f64; 2],
}

impl RTreeObject for IndexedSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.start, self.end)
    }
}

/// Bounding-box prefilter for the point resolver.
#[derive(Debug, Default)]
pub struct SegmentIndex {
    tree: RTree<IndexedSegment>,
}

impl SegmentIndex {
    pub fn build(segments: Vec<IndexedSegment>) -> Self {
        let count = segments.len();
        let tree = RTree::bulk_load(segments);
        info!(segment_count = count, "built segment spatial index");
        Self { tree }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Edge ids of segments whose bounding box lies within `radius` of
    /// `point`, in ascending id order.
    pub fn candidates(&self, metric: Metric, point: &Coordinate, radius: f64) -> Vec<EdgeId> {
        if self.is_empty() || radius.is_nan() || radius < 0.0 {
            return Vec::new();
        }

        let (lon_span, lat_span) = metric.degree_span(point, radius);
        let [x, y] = point.to_xy();
        let envelope = AABB::from_corners([x - lon_span, y - lat_span], [x + lon_span, y + lat_span]);

        let mut edges: Vec<EdgeId> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|segment| segment.edge)
            .collect();
        edges.sort_unstable();
        edges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(edge: EdgeId, start: [f64; 2], end: [f64; 2]) -> IndexedSegment {
        IndexedSegment { edge, start, end }
    }

    #[test]
    fn candidates_are_sorted_and_filtered() {
        let index = SegmentIndex::build(vec![
            segment(4, [0.0, 0.0], [1.0, 0.0]),
            segment(0, [0.0, 0.0], [0.0, 1.0]),
            segment(2, [10.0, 10.0], [11.0, 10.0]),
        ]);

        let found = index.candidates(Metric::Euclidean, &Coordinate::new(0.1, 0.1), 0.2);
        assert_eq!(found, vec![0, 4]);
    }

    #[test]
    fn negative_radius_finds_nothing() {
        let index = SegmentIndex::build(vec![segment(0, [0.0, 0.0], [1.0, 0.0])]);
        assert!(index
            .candidates(Metric::Euclidean, &Coordinate::new(0.0, 0.0), -1.0)
            .is_empty());
    }
}

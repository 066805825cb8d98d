use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geo::{Coordinate, Metric};
use crate::profile::Direction;
use crate::spatial::{IndexedSegment, SegmentIndex};

/// Dense vertex identifier in `[0, vertex_count)`.
pub type VertexId = usize;

/// Dense directed-edge identifier in `[0, edge_count)`.
pub type EdgeId = usize;

/// Logical road segment; the payload is stored once per way.
#[derive(Debug, Clone)]
struct Segment<P> {
    payload: P,
    length: f64,
}

#[derive(Debug, Clone, Copy)]
struct Link {
    source: VertexId,
    target: VertexId,
    segment: usize,
    direction: Direction,
    twin: Option<EdgeId>,
}

/// Borrowed view of one directed edge.
#[derive(Debug)]
pub struct EdgeRef<'g, P> {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub payload: &'g P,
    pub length: f64,
    pub direction: Direction,
    /// The opposite-direction edge of the same way, when one exists.
    pub twin: Option<EdgeId>,
}

impl<P> Clone for EdgeRef<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for EdgeRef<'_, P> {}

/// Immutable directed multigraph with geocoded vertices.
///
/// Built once through [`GraphBuilder`] and then only read. Outgoing edges
/// are stored contiguously per source vertex in ascending edge id order, so
/// every traversal sees the same deterministic sequence.
#[derive(Debug)]
pub struct RoutableGraph<P> {
    metric: Metric,
    coordinates: Vec<Coordinate>,
    segments: Vec<Segment<P>>,
    links: Vec<Link>,
    offsets: Vec<usize>,
    outgoing: Vec<EdgeId>,
    index: SegmentIndex,
}

impl<P> RoutableGraph<P> {
    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn vertex_count(&self) -> usize {
        self.coordinates.len()
    }

    pub fn edge_count(&self) -> usize {
        self.links.len()
    }

    /// Number of logical ways (each backing one or two directed edges).
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn coordinate(&self, vertex: VertexId) -> Result<Coordinate> {
        self.coordinates
            .get(vertex)
            .copied()
            .ok_or(Error::VertexOutOfRange {
                vertex,
                vertex_count: self.coordinates.len(),
            })
    }

    pub fn edge(&self, edge: EdgeId) -> Result<EdgeRef<'_, P>> {
        let link = self.links.get(edge).ok_or(Error::EdgeOutOfRange {
            edge,
            edge_count: self.links.len(),
        })?;
        Ok(self.edge_ref(edge, link))
    }

    /// Opposite-direction edge of the same way.
    pub fn twin(&self, edge: EdgeId) -> Result<Option<EdgeId>> {
        Ok(self.edge(edge)?.twin)
    }

    /// Start and end coordinate of a directed edge.
    pub fn edge_geometry(&self, edge: EdgeId) -> Result<(Coordinate, Coordinate)> {
        let view = self.edge(edge)?;
        Ok((
            self.coordinates[view.source],
            self.coordinates[view.target],
        ))
    }

    /// Outgoing edges of `vertex` in ascending id order.
    ///
    /// The returned iterator borrows the graph immutably and can be cloned
    /// to restart the walk; no cursor state is shared between callers.
    pub fn outgoing_edges(&self, vertex: VertexId) -> Result<OutgoingEdges<'_, P>> {
        if vertex >= self.coordinates.len() {
            return Err(Error::VertexOutOfRange {
                vertex,
                vertex_count: self.coordinates.len(),
            });
        }
        let ids = &self.outgoing[self.offsets[vertex]..self.offsets[vertex + 1]];
        Ok(OutgoingEdges {
            graph: self,
            ids: ids.iter(),
        })
    }

    pub(crate) fn segment_index(&self) -> &SegmentIndex {
        &self.index
    }

    fn edge_ref<'g>(&'g self, id: EdgeId, link: &Link) -> EdgeRef<'g, P> {
        let segment = &self.segments[link.segment];
        EdgeRef {
            id,
            source: link.source,
            target: link.target,
            payload: &segment.payload,
            length: segment.length,
            direction: link.direction,
            twin: link.twin,
        }
    }
}

/// Lazy, restartable walk over one vertex's outgoing edges.
#[derive(Debug)]
pub struct OutgoingEdges<'g, P> {
    graph: &'g RoutableGraph<P>,
    ids: std::slice::Iter<'g, EdgeId>,
}

impl<P> Clone for OutgoingEdges<'_, P> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            ids: self.ids.clone(),
        }
    }
}

impl<'g, P> Iterator for OutgoingEdges<'g, P> {
    type Item = EdgeRef<'g, P>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = *self.ids.next()?;
        let graph = self.graph;
        Some(graph.edge_ref(id, &graph.links[id]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

/// Construction phase of a [`RoutableGraph`].
///
/// Vertices and ways may only be added here; [`GraphBuilder::build`]
/// freezes the result for querying.
#[derive(Debug)]
pub struct GraphBuilder<P> {
    metric: Metric,
    coordinates: Vec<Coordinate>,
    segments: Vec<Segment<P>>,
    links: Vec<Link>,
}

impl<P> Default for GraphBuilder<P> {
    fn default() -> Self {
        Self::new(Metric::default())
    }
}

impl<P> GraphBuilder<P> {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            coordinates: Vec::new(),
            segments: Vec::new(),
            links: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.coordinates.len()
    }

    pub fn add_vertex(&mut self, coordinate: Coordinate) -> Result<VertexId> {
        if !coordinate.is_finite() {
            return Err(Error::InvalidCoordinate {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
            });
        }
        self.coordinates.push(coordinate);
        Ok(self.coordinates.len() - 1)
    }

    /// Add a two-way road segment; returns `(forward, backward)` edge ids.
    /// The length is measured with the builder's metric.
    pub fn add_way(&mut self, from: VertexId, to: VertexId, payload: P) -> Result<(EdgeId, EdgeId)> {
        let length = self.measure(from, to)?;
        self.add_way_with_length(from, to, payload, length)
    }

    pub fn add_way_with_length(
        &mut self,
        from: VertexId,
        to: VertexId,
        payload: P,
        length: f64,
    ) -> Result<(EdgeId, EdgeId)> {
        let segment = self.push_segment(from, to, payload, length)?;
        let forward = self.links.len();
        let backward = forward + 1;
        self.links.push(Link {
            source: from,
            target: to,
            segment,
            direction: Direction::Forward,
            twin: Some(backward),
        });
        self.links.push(Link {
            source: to,
            target: from,
            segment,
            direction: Direction::Backward,
            twin: Some(forward),
        });
        Ok((forward, backward))
    }

    /// Add a single directed edge with no opposite twin.
    pub fn add_arc(&mut self, from: VertexId, to: VertexId, payload: P) -> Result<EdgeId> {
        let length = self.measure(from, to)?;
        self.add_arc_with_length(from, to, payload, length)
    }

    pub fn add_arc_with_length(
        &mut self,
        from: VertexId,
        to: VertexId,
        payload: P,
        length: f64,
    ) -> Result<EdgeId> {
        let segment = self.push_segment(from, to, payload, length)?;
        self.links.push(Link {
            source: from,
            target: to,
            segment,
            direction: Direction::Forward,
            twin: None,
        });
        Ok(self.links.len() - 1)
    }

    /// Freeze the builder into a queryable graph.
    pub fn build(self) -> RoutableGraph<P> {
        let vertex_count = self.coordinates.len();

        let mut offsets = vec![0usize; vertex_count + 1];
        for link in &self.links {
            offsets[link.source + 1] += 1;
        }
        for vertex in 0..vertex_count {
            offsets[vertex + 1] += offsets[vertex];
        }

        let mut cursor = offsets.clone();
        let mut outgoing = vec![0; self.links.len()];
        for (id, link) in self.links.iter().enumerate() {
            outgoing[cursor[link.source]] = id;
            cursor[link.source] += 1;
        }

        let mut indexed = Vec::with_capacity(self.segments.len());
        let mut seen = vec![false; self.segments.len()];
        for (id, link) in self.links.iter().enumerate() {
            if seen[link.segment] {
                continue;
            }
            seen[link.segment] = true;
            indexed.push(IndexedSegment {
                edge: id,
                start: self.coordinates[link.source].to_xy(),
                end: self.coordinates[link.target].to_xy(),
            });
        }
        let index = SegmentIndex::build(indexed);

        info!(
            vertex_count,
            edge_count = self.links.len(),
            segment_count = self.segments.len(),
            metric = ?self.metric,
            "built routable graph"
        );

        RoutableGraph {
            metric: self.metric,
            coordinates: self.coordinates,
            segments: self.segments,
            links: self.links,
            offsets,
            outgoing,
            index,
        }
    }

    fn measure(&self, from: VertexId, to: VertexId) -> Result<f64> {
        let a = self.vertex(from)?;
        let b = self.vertex(to)?;
        Ok(self.metric.distance(&a, &b))
    }

    fn vertex(&self, vertex: VertexId) -> Result<Coordinate> {
        self.coordinates
            .get(vertex)
            .copied()
            .ok_or(Error::VertexOutOfRange {
                vertex,
                vertex_count: self.coordinates.len(),
            })
    }

    fn push_segment(&mut self, from: VertexId, to: VertexId, payload: P, length: f64) -> Result<usize> {
        self.vertex(from)?;
        self.vertex(to)?;
        if !length.is_finite() || length < 0.0 {
            return Err(Error::InvalidLength { length });
        }
        if from == to {
            debug!(vertex = from, "adding self-loop segment");
        }
        self.segments.push(Segment { payload, length });
        Ok(self.segments.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> RoutableGraph<&'static str> {
        let mut builder = GraphBuilder::new(Metric::Euclidean);
        let a = builder.add_vertex(Coordinate::new(0.0, 0.0)).unwrap();
        let b = builder.add_vertex(Coordinate::new(0.0, 1.0)).unwrap();
        let c = builder.add_vertex(Coordinate::new(1.0, 0.0)).unwrap();
        builder.add_way(a, b, "ab").unwrap();
        builder.add_arc(b, c, "bc").unwrap();
        builder.add_way(c, a, "ca").unwrap();
        builder.build()
    }

    #[test]
    fn outgoing_edges_are_grouped_and_ordered() {
        let graph = triangle();
        let from_a: Vec<_> = graph
            .outgoing_edges(0)
            .unwrap()
            .map(|edge| (edge.id, edge.target))
            .collect();
        assert_eq!(from_a, vec![(0, 1), (4, 2)]);

        let from_b: Vec<_> = graph.outgoing_edges(1).unwrap().map(|edge| edge.id).collect();
        assert_eq!(from_b, vec![1, 2]);
    }

    #[test]
    fn outgoing_walk_is_restartable() {
        let graph = triangle();
        let walk = graph.outgoing_edges(2).unwrap();
        let first: Vec<_> = walk.clone().map(|edge| edge.id).collect();
        let second: Vec<_> = walk.map(|edge| edge.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn ways_share_payload_and_length() {
        let graph = triangle();
        let forward = graph.edge(0).unwrap();
        let backward = graph.edge(1).unwrap();

        assert_eq!(forward.payload, backward.payload);
        assert_eq!(forward.length, 1.0);
        assert_eq!(forward.twin, Some(1));
        assert_eq!(backward.twin, Some(0));
        assert_eq!(backward.direction, Direction::Backward);
        assert_eq!(graph.twin(2), Ok(None));
    }

    #[test]
    fn out_of_range_access_fails() {
        let graph = triangle();
        assert_eq!(
            graph.coordinate(3),
            Err(Error::VertexOutOfRange {
                vertex: 3,
                vertex_count: 3
            })
        );
        assert!(graph.outgoing_edges(7).is_err());
        assert!(matches!(
            graph.edge(5),
            Err(Error::EdgeOutOfRange { edge: 5, .. })
        ));
    }

    #[test]
    fn builder_rejects_bad_input() {
        let mut builder: GraphBuilder<()> = GraphBuilder::new(Metric::Euclidean);
        let a = builder.add_vertex(Coordinate::new(0.0, 0.0)).unwrap();
        assert!(builder.add_vertex(Coordinate::new(f64::NAN, 0.0)).is_err());
        assert!(builder.add_way(a, 9, ()).is_err());
        assert_eq!(
            builder.add_arc_with_length(a, a, (), -1.0),
            Err(Error::InvalidLength { length: -1.0 })
        );
    }

    #[test]
    fn spatial_index_holds_one_entry_per_way() {
        let graph = triangle();
        assert_eq!(graph.segment_index().len(), graph.segment_count());
    }
}

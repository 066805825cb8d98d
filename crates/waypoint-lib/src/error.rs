use thiserror::Error;

use crate::graph::{EdgeId, VertexId};

/// Convenient result alias for the waypoint library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Every variant describes a defect in a caller or in the code that built the
/// graph. Expected query outcomes (no nearby edge, no route, isolated
/// endpoint) are reported as ordinary values and never show up here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Raised when a vertex identifier lies outside `[0, vertex_count)`.
    #[error("vertex {vertex} is out of range (graph has {vertex_count} vertices)")]
    VertexOutOfRange {
        vertex: VertexId,
        vertex_count: usize,
    },

    /// Raised when an endpoint or caller references an edge the graph lacks.
    #[error("edge {edge} is out of range (graph has {edge_count} edges)")]
    EdgeOutOfRange { edge: EdgeId, edge_count: usize },

    /// Raised when an endpoint ratio is not a finite value within `[0, 1]`.
    #[error("edge ratio {ratio} must lie within [0, 1]")]
    InvalidRatio { ratio: f64 },

    /// Raised when a vehicle profile returns a negative or non-finite weight.
    #[error("profile returned invalid weight {weight} for edge {edge}")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    /// Raised when a predecessor chain crosses an edge the profile blocks.
    #[error("edge {edge} in the chain is not passable for this profile")]
    ImpassableLeg { edge: EdgeId },

    /// Raised when a way is added with a negative or non-finite length.
    #[error("edge length {length} must be finite and non-negative")]
    InvalidLength { length: f64 },

    /// Raised when a synthetic grid is requested with non-positive spacing.
    #[error("grid spacing {spacing} must be finite and positive")]
    InvalidSpacing { spacing: f64 },

    /// Raised when a vertex is added with a non-finite coordinate.
    #[error("coordinate ({latitude}, {longitude}) is not finite")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Raised when a declared search strategy has no implementation yet.
    #[error("search algorithm {algorithm} is not supported yet")]
    UnsupportedAlgorithm { algorithm: String },
}

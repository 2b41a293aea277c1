//! Input model for the merge engine.
//!
//! The engine does not build minimum spanning trees; it consumes one
//! computed elsewhere, presented as parallel edge and weight sequences with
//! the weights sorted in non-decreasing order. [`SortedMst`] validates that
//! contract once, up front, and then serves as a cheap read-only view for
//! the lifetime of the run.

use std::cmp::Ordering;

use crate::error::{GenieError, Result};

/// A single MST edge given by its two endpoint vertex ids.
///
/// Endpoints are kept exactly as supplied; the engine attaches no meaning
/// to their order within the pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MstEdge {
    source: usize,
    target: usize,
}

impl MstEdge {
    /// Creates an edge joining `source` and `target`.
    #[must_use]
    pub const fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }

    /// Returns the first endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(&self) -> usize { self.source }

    /// Returns the second endpoint id.
    #[must_use]
    #[rustfmt::skip]
    pub const fn target(&self) -> usize { self.target }
}

/// A validated, read-only view of a minimum spanning tree whose edges are
/// listed in non-decreasing weight order.
///
/// # Examples
/// ```
/// use genie_core::{MstEdge, SortedMst};
///
/// let weights = [1.0, 2.0, 3.0];
/// let edges = [MstEdge::new(0, 1), MstEdge::new(1, 2), MstEdge::new(2, 3)];
/// let mst = SortedMst::new(&weights, &edges, 4)?;
/// assert_eq!(mst.node_count(), 4);
/// assert_eq!(mst.edges().len(), 3);
/// # Ok::<(), genie_core::GenieError>(())
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SortedMst<'a> {
    weights: &'a [f32],
    edges: &'a [MstEdge],
    node_count: usize,
}

impl<'a> SortedMst<'a> {
    /// Validates and wraps the caller's MST.
    ///
    /// # Errors
    /// Returns an error when:
    /// - `node_count < 2`
    /// - `edges.len() != node_count - 1`
    /// - `weights.len() != edges.len()`
    /// - any weight is NaN or infinite
    /// - the weights are not sorted in non-decreasing order
    pub fn new(weights: &'a [f32], edges: &'a [MstEdge], node_count: usize) -> Result<Self> {
        if node_count < 2 {
            return Err(GenieError::TooFewPoints { node_count });
        }
        if edges.len() != node_count - 1 {
            return Err(GenieError::EdgeCountMismatch {
                node_count,
                edges: edges.len(),
            });
        }
        if weights.len() != edges.len() {
            return Err(GenieError::WeightCountMismatch {
                edges: edges.len(),
                weights: weights.len(),
            });
        }
        for (index, weight) in weights.iter().enumerate() {
            if !weight.is_finite() {
                return Err(GenieError::NonFiniteWeight { index });
            }
        }
        for index in 1..weights.len() {
            if weights[index - 1].total_cmp(&weights[index]) == Ordering::Greater {
                return Err(GenieError::UnsortedWeights { index });
            }
        }
        Ok(Self {
            weights,
            edges,
            node_count,
        })
    }

    /// Returns the edges in non-decreasing weight order.
    #[must_use]
    #[rustfmt::skip]
    pub const fn edges(&self) -> &'a [MstEdge] { self.edges }

    /// Returns the edge weights.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weights(&self) -> &'a [f32] { self.weights }

    /// Returns the number of vertices the tree spans.
    #[must_use]
    #[rustfmt::skip]
    pub const fn node_count(&self) -> usize { self.node_count }
}

/// Counts the degree of every vertex in an undirected edge list over the
/// vertex set `{0, ..., node_count - 1}`.
///
/// Each accepted edge contributes one to both endpoints' degrees.
///
/// # Errors
/// Returns [`GenieError::InvalidNodeId`] when an endpoint is `>= node_count`
/// and [`GenieError::SelfLoop`] when an edge joins a vertex to itself.
pub fn vertex_degrees(edges: &[MstEdge], node_count: usize) -> Result<Vec<usize>> {
    let mut degrees = vec![0usize; node_count];
    for edge in edges {
        let (u, v) = (edge.source(), edge.target());
        if u >= node_count {
            return Err(GenieError::InvalidNodeId {
                node: u,
                node_count,
            });
        }
        if v >= node_count {
            return Err(GenieError::InvalidNodeId {
                node: v,
                node_count,
            });
        }
        if u == v {
            return Err(GenieError::SelfLoop { node: u });
        }
        degrees[u] += 1;
        degrees[v] += 1;
    }
    Ok(degrees)
}

//! Mapping between original vertex ids and the compacted id space the
//! disjoint-sets structure partitions.
//!
//! When MST leaves are treated as noise they are excluded from merging
//! entirely; the remaining vertices are renumbered contiguously so the
//! union-find can stay dense. Outside noise mode both directions are the
//! identity.

use crate::error::{GenieError, Result};

/// Bidirectional vertex renumbering that drops noise vertices.
#[derive(Clone, Debug)]
pub(crate) struct DenoiseIndex {
    /// Original id -> compacted id; `None` marks a noise vertex.
    compact: Vec<Option<usize>>,
    /// Compacted id -> original id, strictly increasing.
    original: Vec<usize>,
    noise_count: usize,
}

impl DenoiseIndex {
    /// Builds the identity mapping over `node_count` vertices.
    pub(crate) fn identity(node_count: usize) -> Self {
        Self {
            compact: (0..node_count).map(Some).collect(),
            original: (0..node_count).collect(),
            noise_count: 0,
        }
    }

    /// Builds the mapping that excludes every degree-one vertex.
    ///
    /// # Errors
    /// Returns [`GenieError::TooFewLeaves`] when fewer than two leaves are
    /// present. Any tree on two or more vertices has at least two leaves,
    /// so a violation means the edge list did not describe a tree.
    pub(crate) fn excluding_leaves(degrees: &[usize]) -> Result<Self> {
        let mut compact = Vec::with_capacity(degrees.len());
        let mut original = Vec::new();
        let mut noise_count = 0usize;
        for (vertex, &degree) in degrees.iter().enumerate() {
            if degree == 1 {
                noise_count += 1;
                compact.push(None);
            } else {
                compact.push(Some(original.len()));
                original.push(vertex);
            }
        }
        if noise_count < 2 {
            return Err(GenieError::TooFewLeaves {
                leaves: noise_count,
            });
        }
        debug_assert_eq!(original.len() + noise_count, degrees.len());
        Ok(Self {
            compact,
            original,
            noise_count,
        })
    }

    /// Returns the compacted id of `vertex`, or `None` for noise.
    #[rustfmt::skip]
    pub(crate) fn compact(&self, vertex: usize) -> Option<usize> { self.compact[vertex] }

    /// Returns the original id of the `index`-th non-noise vertex.
    #[rustfmt::skip]
    pub(crate) fn original(&self, index: usize) -> usize { self.original[index] }

    /// Returns how many vertices were classified as noise.
    #[rustfmt::skip]
    pub(crate) fn noise_count(&self) -> usize { self.noise_count }

    /// Returns the number of non-noise vertices.
    #[rustfmt::skip]
    pub(crate) fn retained_count(&self) -> usize { self.original.len() }
}

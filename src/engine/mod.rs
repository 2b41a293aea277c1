//! The Genie merge engine.
//!
//! Genie is a hierarchical clustering linkage criterion that runs on a
//! precomputed minimum spanning tree: merges proceed as in single linkage,
//! in ascending edge-weight order, except that whenever the Gini index of
//! the current cluster sizes exceeds a threshold the next merge is forced
//! to involve one of the smallest clusters. The correction suppresses the
//! chain effect single linkage is prone to while keeping its near-linear
//! cost (Gagolewski, Bartoszuk, Cena, *Information Sciences* 363, 2016).
//!
//! Optionally, MST leaves are treated as noise and excluded from merging,
//! which pairs well with trees built over HDBSCAN-style mutual
//! reachability distances.

mod denoise;
mod skiplist;
mod union_find;

use tracing::{debug, instrument};

use crate::{
    error::{GenieError, Result},
    mst::{SortedMst, vertex_degrees},
};

use self::{denoise::DenoiseIndex, skiplist::EdgeSkipList, union_find::GiniDisjointSets};

/// How degree-one vertices of the MST are treated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LeafHandling {
    /// Leaves participate in clustering like any other vertex.
    Cluster,
    /// Leaves are marked as noise, excluded from merging, and labelled `-1`.
    Noise,
}

/// Flat-partition extractor applying the Genie linkage criterion to a
/// sorted minimum spanning tree.
///
/// Construction validates the tree and allocates every O(n) working
/// buffer; [`GenieEngine::apply`] may then be called any number of times
/// with different cluster counts and thresholds, each run independent and
/// deterministic.
///
/// # Examples
/// ```
/// use genie_core::{GenieEngine, LeafHandling, MstEdge, SortedMst};
///
/// // A path 0-1-2-3-4 whose heaviest edge separates {0,1,2,3} from {4}.
/// let weights = [1.0, 2.0, 3.0, 9.0];
/// let edges = [
///     MstEdge::new(0, 1),
///     MstEdge::new(1, 2),
///     MstEdge::new(2, 3),
///     MstEdge::new(3, 4),
/// ];
/// let mst = SortedMst::new(&weights, &edges, 5)?;
/// let mut engine = GenieEngine::new(mst, LeafHandling::Cluster)?;
///
/// let mut labels = vec![0i32; 5];
/// engine.apply(2, 1.0, &mut labels)?;
/// assert_eq!(labels, [0, 0, 0, 0, 1]);
/// # Ok::<(), genie_core::GenieError>(())
/// ```
#[derive(Clone, Debug)]
pub struct GenieEngine<'a> {
    mst: SortedMst<'a>,
    leaf_handling: LeafHandling,
    degrees: Vec<usize>,
    denoise: DenoiseIndex,
    skiplist: EdgeSkipList,
}

impl<'a> GenieEngine<'a> {
    /// Prepares an engine for the given tree.
    ///
    /// Computes vertex degrees, classifies noise vertices, and allocates
    /// the skip-list storage. The borrowed tree is read-only for the
    /// engine's lifetime.
    ///
    /// # Errors
    /// Returns [`GenieError::InvalidNodeId`] or [`GenieError::SelfLoop`]
    /// when the edge list is malformed, and [`GenieError::TooFewLeaves`]
    /// when [`LeafHandling::Noise`] finds fewer than two degree-one
    /// vertices.
    pub fn new(mst: SortedMst<'a>, leaf_handling: LeafHandling) -> Result<Self> {
        let node_count = mst.node_count();
        let degrees = vertex_degrees(mst.edges(), node_count)?;
        let denoise = match leaf_handling {
            LeafHandling::Cluster => DenoiseIndex::identity(node_count),
            LeafHandling::Noise => DenoiseIndex::excluding_leaves(&degrees)?,
        };
        let skiplist = EdgeSkipList::new(mst.edges().len());
        Ok(Self {
            mst,
            leaf_handling,
            degrees,
            denoise,
            skiplist,
        })
    }

    /// Returns the number of vertices the tree spans.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.mst.node_count()
    }

    /// Returns how many vertices were classified as noise.
    #[must_use]
    pub fn noise_count(&self) -> usize {
        self.denoise.noise_count()
    }

    /// Returns the number of clusterable (non-noise) vertices.
    #[must_use]
    pub fn clusterable_count(&self) -> usize {
        self.denoise.retained_count()
    }

    /// Partitions the points into `n_clusters` clusters.
    ///
    /// Writes one label per vertex into `labels`: `0..n_clusters` in order
    /// of first occurrence, or `-1` for noise vertices. On error the
    /// buffer is left untouched.
    ///
    /// # Errors
    /// Returns [`GenieError::ZeroClusters`],
    /// [`GenieError::InvalidGiniThreshold`], or
    /// [`GenieError::LabelBufferMismatch`] when the runtime inputs are
    /// invalid, [`GenieError::TooManyClusters`] when `n_clusters` exceeds
    /// the clusterable point count, and [`GenieError::AlreadyJoined`] or
    /// [`GenieError::InvariantViolation`] when the edge list turns out not
    /// to describe a spanning tree.
    #[instrument(level = "debug", skip(self, labels))]
    pub fn apply(
        &mut self,
        n_clusters: usize,
        gini_threshold: f64,
        labels: &mut [i32],
    ) -> Result<()> {
        if n_clusters == 0 {
            return Err(GenieError::ZeroClusters);
        }
        if !(0.0..=1.0).contains(&gini_threshold) {
            return Err(GenieError::InvalidGiniThreshold {
                got: gini_threshold,
            });
        }
        if labels.len() != self.node_count() {
            return Err(GenieError::LabelBufferMismatch {
                expected: self.node_count(),
                got: labels.len(),
            });
        }

        let clusterable = self.denoise.retained_count();
        if n_clusters > clusterable {
            return Err(GenieError::TooManyClusters {
                requested: n_clusters,
                available: clusterable,
            });
        }
        let merges = clusterable - n_clusters;
        debug!(
            node_count = self.node_count(),
            noise_count = self.noise_count(),
            merges,
            "running genie merge loop"
        );

        self.thread_skiplist();
        let mut sets = GiniDisjointSets::new(clusterable);
        let mut last_smallest = 0usize;
        for _ in 0..merges {
            self.merge_step(&mut sets, gini_threshold, &mut last_smallest)?;
        }

        self.emit_labels(&mut sets, labels);
        Ok(())
    }

    /// Threads the skip-list over the eligible edge slots.
    ///
    /// In noise mode an edge is eligible only when neither endpoint is a
    /// leaf; such edges join two non-noise vertices by construction.
    fn thread_skiplist(&mut self) {
        match self.leaf_handling {
            LeafHandling::Cluster => self.skiplist.thread_all(),
            LeafHandling::Noise => {
                let edges = self.mst.edges();
                let degrees = &self.degrees;
                self.skiplist.thread_if(|slot| {
                    let edge = edges[slot];
                    degrees[edge.source()] > 1 && degrees[edge.target()] > 1
                });
            }
        }
    }

    /// Performs one merge: the Genie correction when the size distribution
    /// is too unequal, a plain single-linkage step otherwise.
    fn merge_step(
        &mut self,
        sets: &mut GiniDisjointSets,
        gini_threshold: f64,
        last_smallest: &mut usize,
    ) -> Result<()> {
        let slot = if sets.gini() > gini_threshold {
            let target = sets.smallest_count();
            // A new target size, or a memo that fell behind the head after
            // single-linkage consumption, restarts the walk from the front.
            if target != *last_smallest || self.skiplist.scan_is_stale() {
                self.skiplist.rewind_scan();
            }
            loop {
                if self.skiplist.scan_at_end() {
                    return Err(GenieError::InvariantViolation {
                        invariant: "an unconsumed edge touches every smallest cluster",
                    });
                }
                let (a, b) = self.compact_endpoints(self.skiplist.scan())?;
                if sets.count_of(a) == target || sets.count_of(b) == target {
                    break;
                }
                self.skiplist.advance_scan();
            }
            let slot = self.skiplist.scan();
            self.skiplist.consume_scan();
            *last_smallest = target;
            slot
        } else {
            let slot = self.skiplist.head();
            if slot == self.skiplist.past_end() {
                return Err(GenieError::InvariantViolation {
                    invariant: "the edge list outlasts the merge loop",
                });
            }
            self.skiplist.consume_head();
            slot
        };

        let (a, b) = self.compact_endpoints(slot)?;
        sets.merge(a, b)?;
        Ok(())
    }

    /// Translates an edge slot's endpoints into compacted ids.
    fn compact_endpoints(&self, slot: usize) -> Result<(usize, usize)> {
        let edge = self.mst.edges()[slot];
        let a = self
            .denoise
            .compact(edge.source())
            .ok_or(GenieError::InvariantViolation {
                invariant: "eligible edges join non-noise vertices",
            })?;
        let b = self
            .denoise
            .compact(edge.target())
            .ok_or(GenieError::InvariantViolation {
                invariant: "eligible edges join non-noise vertices",
            })?;
        Ok((a, b))
    }

    /// Converts the final partition into dense labels.
    ///
    /// Labels are assigned in order of first occurrence over the original
    /// vertex sequence, so the first non-noise vertex always receives 0.
    fn emit_labels(&self, sets: &mut GiniDisjointSets, labels: &mut [i32]) {
        let mut cluster_of_root = vec![-1i32; self.node_count()];
        let mut next_label = 0i32;
        for (vertex, label) in labels.iter_mut().enumerate() {
            match self.denoise.compact(vertex) {
                Some(compacted) => {
                    let root = self.denoise.original(sets.find(compacted));
                    if cluster_of_root[root] < 0 {
                        cluster_of_root[root] = next_label;
                        next_label += 1;
                    }
                    *label = cluster_of_root[root];
                }
                None => *label = -1,
            }
        }
    }
}

#[cfg(test)]
mod property;

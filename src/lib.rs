//! Genie clustering core.
//!
//! Extracts a flat k-partition from a precomputed minimum spanning tree
//! using the Genie linkage criterion: single-linkage agglomeration with an
//! inequity correction that, whenever the Gini index of the cluster-size
//! distribution exceeds a threshold, forces the next merge to involve a
//! smallest cluster. Degree-one vertices can optionally be set aside as
//! noise, which suits trees built over mutual-reachability distances.
//!
//! The crate deliberately ends where the MST begins: computing the tree,
//! sorting its weights, and comparing the resulting partitions against
//! references are all left to the caller.

mod engine;
mod error;
mod mst;

pub use crate::{
    engine::{GenieEngine, LeafHandling},
    error::{GenieError, GenieErrorCode, Result},
    mst::{MstEdge, SortedMst, vertex_degrees},
};

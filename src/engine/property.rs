//! Property-based tests for the merge engine.
//!
//! Random spanning trees exercise the public pipeline (partition validity,
//! label determinism, single-linkage equivalence against a plain
//! union-find oracle); random merge streams and removal sequences exercise
//! the Gini disjoint-sets and the edge skip-list against brute-force
//! oracles.

use proptest::prelude::*;
use proptest::sample::Index;
use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{
    GenieEngine, LeafHandling, MstEdge, SortedMst,
    engine::{skiplist::EdgeSkipList, union_find::GiniDisjointSets},
    mst::vertex_degrees,
};

const MAX_NODES: usize = 48;

/// A random spanning tree with edges listed in non-decreasing weight order.
#[derive(Clone, Debug)]
struct TreeFixture {
    node_count: usize,
    weights: Vec<f32>,
    edges: Vec<MstEdge>,
}

/// Generates a random tree: each vertex `1..n` attaches to a random
/// earlier vertex, the child edges are shuffled into an arbitrary list
/// order, and non-decreasing weights are laid over that order.
fn tree_strategy() -> impl Strategy<Value = TreeFixture> {
    (2usize..=MAX_NODES)
        .prop_flat_map(|n| {
            let parents = proptest::collection::vec(any::<Index>(), n - 1);
            let order = Just((1..n).collect::<Vec<usize>>()).prop_shuffle();
            let steps = proptest::collection::vec(0.0f32..4.0, n - 1);
            (Just(n), parents, order, steps)
        })
        .prop_map(|(node_count, parents, order, steps)| {
            let mut weights = Vec::with_capacity(node_count - 1);
            let mut running = 0.0f32;
            for step in &steps {
                running += step;
                weights.push(running);
            }
            let edges = order
                .into_iter()
                .map(|child| MstEdge::new(parents[child - 1].index(child), child))
                .collect();
            TreeFixture {
                node_count,
                weights,
                edges,
            }
        })
}

fn fail(message: String) -> TestCaseError {
    TestCaseError::fail(message)
}

/// Sorted-multiset Gini index, recomputed from scratch.
fn brute_force_gini(mut sizes: Vec<usize>) -> f64 {
    sizes.sort_unstable();
    let k = sizes.len();
    if k <= 1 {
        return 0.0;
    }
    let total: usize = sizes.iter().sum();
    let numerator: f64 = sizes
        .iter()
        .enumerate()
        .map(|(i, &s)| ((2 * (i + 1)) as f64 - (k + 1) as f64) * s as f64)
        .sum();
    numerator / ((k - 1) as f64 * total as f64)
}

/// Relabels roots by first occurrence, the same order the engine uses.
fn first_occurrence_labels(roots: &[usize]) -> Vec<i32> {
    let mut label_of_root = vec![-1i32; roots.len()];
    let mut next = 0i32;
    roots
        .iter()
        .map(|&root| {
            if label_of_root[root] < 0 {
                label_of_root[root] = next;
                next += 1;
            }
            label_of_root[root]
        })
        .collect()
}

/// Properties 1-3: labels form a contiguous partition into exactly
/// `n_clusters` clusters, first-occurrence ordered, for any threshold.
fn run_partition_validity(
    fixture: &TreeFixture,
    cluster_sel: Index,
    threshold: f64,
) -> TestCaseResult {
    let n = fixture.node_count;
    let mst = SortedMst::new(&fixture.weights, &fixture.edges, n)
        .map_err(|e| fail(format!("fixture rejected: {e}")))?;
    let mut engine = GenieEngine::new(mst, LeafHandling::Cluster)
        .map_err(|e| fail(format!("engine rejected: {e}")))?;

    let n_clusters = 1 + cluster_sel.index(n);
    let mut labels = vec![0i32; n];
    engine
        .apply(n_clusters, threshold, &mut labels)
        .map_err(|e| fail(format!("apply failed: {e}")))?;

    let mut seen = vec![false; n_clusters];
    let mut highest = -1i32;
    for (vertex, &label) in labels.iter().enumerate() {
        if label < 0 || label as usize >= n_clusters {
            return Err(fail(format!("vertex {vertex} has label {label}")));
        }
        if label > highest + 1 {
            return Err(fail(format!(
                "label {label} appeared before {} at vertex {vertex}",
                highest + 1
            )));
        }
        highest = highest.max(label);
        seen[label as usize] = true;
    }
    if labels[0] != 0 {
        return Err(fail(format!("first vertex got label {}", labels[0])));
    }
    if !seen.iter().all(|&s| s) {
        return Err(fail(format!("missing labels among {n_clusters}")));
    }
    Ok(())
}

/// Noise-mode variant of partition validity: leaves get `-1`, everything
/// else partitions into `n_clusters` clusters.
fn run_noise_partition_validity(fixture: &TreeFixture, cluster_sel: Index) -> TestCaseResult {
    let n = fixture.node_count;
    let mst = SortedMst::new(&fixture.weights, &fixture.edges, n)
        .map_err(|e| fail(format!("fixture rejected: {e}")))?;
    let degrees =
        vertex_degrees(fixture.edges.as_slice(), n).map_err(|e| fail(format!("degrees: {e}")))?;
    let mut engine = GenieEngine::new(mst, LeafHandling::Noise)
        .map_err(|e| fail(format!("engine rejected: {e}")))?;

    let clusterable = engine.clusterable_count();
    prop_assume!(clusterable >= 1);
    let n_clusters = 1 + cluster_sel.index(clusterable);
    let mut labels = vec![0i32; n];
    engine
        .apply(n_clusters, 0.3, &mut labels)
        .map_err(|e| fail(format!("apply failed: {e}")))?;

    let mut seen = vec![false; n_clusters];
    for (vertex, &label) in labels.iter().enumerate() {
        if degrees[vertex] == 1 {
            if label != -1 {
                return Err(fail(format!("leaf {vertex} got label {label}")));
            }
        } else if label < 0 || label as usize >= n_clusters {
            return Err(fail(format!("vertex {vertex} has label {label}")));
        } else {
            seen[label as usize] = true;
        }
    }
    if !seen.iter().all(|&s| s) {
        return Err(fail(format!("missing labels among {n_clusters}")));
    }
    Ok(())
}

/// Property 4: with the threshold at 1 the engine reproduces a pure
/// single-linkage cut, checked against a plain union-find oracle that
/// merges the lightest `n - n_clusters` edges.
fn run_single_linkage_equivalence(fixture: &TreeFixture, cluster_sel: Index) -> TestCaseResult {
    let n = fixture.node_count;
    let mst = SortedMst::new(&fixture.weights, &fixture.edges, n)
        .map_err(|e| fail(format!("fixture rejected: {e}")))?;
    let mut engine = GenieEngine::new(mst, LeafHandling::Cluster)
        .map_err(|e| fail(format!("engine rejected: {e}")))?;

    let n_clusters = 1 + cluster_sel.index(n);
    let mut labels = vec![0i32; n];
    engine
        .apply(n_clusters, 1.0, &mut labels)
        .map_err(|e| fail(format!("apply failed: {e}")))?;

    let mut parent: Vec<usize> = (0..n).collect();
    fn find_root(parent: &mut [usize], mut node: usize) -> usize {
        while parent[node] != node {
            parent[node] = parent[parent[node]];
            node = parent[node];
        }
        node
    }
    for edge in &fixture.edges[..n - n_clusters] {
        let ra = find_root(&mut parent, edge.source());
        let rb = find_root(&mut parent, edge.target());
        if ra == rb {
            return Err(fail("fixture is not a tree".into()));
        }
        parent[rb.max(ra)] = rb.min(ra);
    }
    let roots: Vec<usize> = (0..n).map(|v| find_root(&mut parent, v)).collect();
    let expected = first_occurrence_labels(&roots);

    if labels != expected {
        return Err(fail(format!(
            "single-linkage mismatch: got {labels:?}, expected {expected:?}"
        )));
    }
    Ok(())
}

/// Gini bookkeeping against brute force under a random merge stream, plus
/// the `parent[i] <= i` and path-compression invariants.
fn run_gini_sets_oracle(n: usize, pairs: &[(Index, Index)]) -> TestCaseResult {
    let mut sets = GiniDisjointSets::new(n);
    for (left_sel, right_sel) in pairs {
        let left = left_sel.index(n);
        let right = right_sel.index(n);
        if sets.find(left) == sets.find(right) {
            continue;
        }
        sets.merge(left, right)
            .map_err(|e| fail(format!("merge failed: {e}")))?;

        let sizes = sets.set_sizes();
        let expected = brute_force_gini(sizes.clone());
        if (sets.gini() - expected).abs() > 1e-9 {
            return Err(fail(format!(
                "gini {} but brute force {expected} for sizes {sizes:?}",
                sets.gini()
            )));
        }
        let smallest = sizes.iter().copied().min().unwrap_or(0);
        if sets.smallest_count() != smallest {
            return Err(fail(format!(
                "smallest_count {} but sizes {sizes:?}",
                sets.smallest_count()
            )));
        }
        for (i, &p) in sets.parents().iter().enumerate() {
            if p > i {
                return Err(fail(format!("parent {p} exceeds element {i}")));
            }
        }
        let root = sets.find(left);
        if sets.parents()[left] != root {
            return Err(fail(format!("find({left}) left an uncompressed path")));
        }
    }
    Ok(())
}

/// Skip-list chain integrity against a `Vec` oracle under random interior
/// and head removals.
fn run_skiplist_integrity(edge_count: usize, keep: &[bool], picks: &[Index]) -> TestCaseResult {
    let mut list = EdgeSkipList::new(edge_count);
    list.thread_if(|slot| keep[slot]);
    let mut oracle: Vec<usize> = (0..edge_count).filter(|&slot| keep[slot]).collect();

    if list.live_slots() != oracle {
        return Err(fail(format!(
            "threading mismatch: {:?} vs {oracle:?}",
            list.live_slots()
        )));
    }

    for pick in picks {
        if oracle.is_empty() {
            break;
        }
        let at = pick.index(oracle.len());
        list.rewind_scan();
        for _ in 0..at {
            list.advance_scan();
        }
        list.consume_scan();
        oracle.remove(at);

        let live = list.live_slots();
        if live != oracle {
            return Err(fail(format!("after removal: {live:?} vs {oracle:?}")));
        }
        if list.head() != oracle.first().copied().unwrap_or(list.past_end()) {
            return Err(fail(format!("head {} vs oracle {oracle:?}", list.head())));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn labels_form_a_valid_partition(
        fixture in tree_strategy(),
        cluster_sel in any::<Index>(),
        threshold in 0.0f64..=1.0,
    ) {
        run_partition_validity(&fixture, cluster_sel, threshold)?;
    }

    #[test]
    fn noise_labels_form_a_valid_partition(
        fixture in tree_strategy(),
        cluster_sel in any::<Index>(),
    ) {
        run_noise_partition_validity(&fixture, cluster_sel)?;
    }

    #[test]
    fn threshold_one_matches_single_linkage(
        fixture in tree_strategy(),
        cluster_sel in any::<Index>(),
    ) {
        run_single_linkage_equivalence(&fixture, cluster_sel)?;
    }

    #[test]
    fn gini_sets_match_brute_force(
        n in 1usize..=64,
        pairs in proptest::collection::vec((any::<Index>(), any::<Index>()), 0..96),
    ) {
        run_gini_sets_oracle(n, &pairs)?;
    }

    #[test]
    fn skiplist_stays_well_formed(
        (edge_count, keep, picks) in (1usize..=48).prop_flat_map(|edge_count| {
            (
                Just(edge_count),
                proptest::collection::vec(any::<bool>(), edge_count),
                proptest::collection::vec(any::<Index>(), 0..64),
            )
        }),
    ) {
        run_skiplist_integrity(edge_count, &keep, &picks)?;
    }
}

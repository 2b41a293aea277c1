//! Union-find structures used by the merge driver.
//!
//! [`DisjointSets`] is a plain path-compressed union-find over
//! `{0, ..., n - 1}`. Union by rank or size is deliberately not applied:
//! the parent of a merged pair is always the numerically smaller root, so
//! `parent[i] <= i` holds for every element at every moment. The label
//! extractor relies on that ordering to walk roots in ascending id order.
//!
//! [`GiniDisjointSets`] wraps the plain structure with size bookkeeping:
//! it tracks the multiset of current set sizes and keeps the Gini index of
//! that multiset up to date across merges. Sizes are bucketed in a dense
//! table threaded by a doubly-linked list of occupied sizes in ascending
//! order, so the smallest present size is an O(1) read and each merge
//! refreshes the index in one pass over the distinct sizes. Distinct sizes
//! summing to `n` number at most O(sqrt n), which bounds the per-merge cost.

use crate::error::{GenieError, Result};

/// Marks an empty slot in the occupied-size linked list. Set sizes are
/// always at least 1, so size 0 doubles as the null pointer.
const NIL: usize = 0;

/// Partition of `{0, ..., n - 1}` into disjoint sets.
///
/// `find` uses iterative two-pass path compression; recursion would
/// overflow the stack on degenerate parent chains of length `n`.
#[derive(Clone, Debug)]
pub(crate) struct DisjointSets {
    parent: Vec<usize>,
    set_count: usize,
}

impl DisjointSets {
    /// Starts from the singleton partition `{{0}, {1}, ..., {n - 1}}`.
    #[must_use]
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            set_count: n,
        }
    }

    /// Returns the number of elements being partitioned.
    #[must_use]
    #[rustfmt::skip]
    pub(crate) fn len(&self) -> usize { self.parent.len() }

    /// Returns `true` when the partition covers no elements.
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Returns the current number of sets in the partition.
    #[must_use]
    #[rustfmt::skip]
    pub(crate) fn set_count(&self) -> usize { self.set_count }

    /// Finds the set id (root) for `node`, compressing the visited path.
    ///
    /// # Panics
    /// Panics when `node` is not in `[0, len)`.
    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merges the sets containing `x` and `y`.
    ///
    /// The root with the larger id adopts the smaller as its parent, which
    /// preserves `parent[i] <= i`. Returns `(root, absorbed)` where `root`
    /// is the surviving set id and `absorbed` the root that was attached
    /// beneath it.
    ///
    /// # Errors
    /// Returns [`GenieError::AlreadyJoined`] when `x` and `y` are already
    /// members of the same set.
    ///
    /// # Panics
    /// Panics when `x` or `y` is not in `[0, len)`.
    pub(crate) fn merge(&mut self, x: usize, y: usize) -> Result<(usize, usize)> {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return Err(GenieError::AlreadyJoined { left: x, right: y });
        }

        let (root, absorbed) = if rx < ry { (rx, ry) } else { (ry, rx) };
        self.parent[absorbed] = root;
        self.set_count -= 1;
        Ok((root, absorbed))
    }

    #[cfg(test)]
    pub(crate) fn parents(&self) -> &[usize] {
        &self.parent
    }
}

/// Union-find augmented with the Gini index of the set-size multiset.
///
/// For sorted set sizes `s_1 <= ... <= s_k` the Gini index is
///
/// ```text
/// G = sum_i (2i - k - 1) * s_i / ((k - 1) * sum_i s_i)
/// ```
///
/// with `G = 0` for a single set. The index, the size of any member's set,
/// and the smallest size present are all kept queryable across merges.
#[derive(Clone, Debug)]
pub(crate) struct GiniDisjointSets {
    sets: DisjointSets,
    /// Size of the set rooted at `i`; meaningful only for current roots.
    count: Vec<usize>,
    /// `tab[s]` is the number of sets of size `s`, for `s` in `[1, n]`.
    tab: Vec<usize>,
    /// Successor in the ascending list of occupied sizes (`NIL` at the tail).
    tab_next: Vec<usize>,
    /// Predecessor in the ascending list of occupied sizes (`NIL` at the head).
    tab_prev: Vec<usize>,
    /// Smallest size present; `NIL` only when the structure is empty.
    tab_head: usize,
    /// Largest size present.
    tab_tail: usize,
    gini: f64,
}

impl GiniDisjointSets {
    /// Starts from the singleton partition: `n` sets of size 1.
    #[must_use]
    pub(crate) fn new(n: usize) -> Self {
        let mut tab = vec![0usize; n + 1];
        let head = if n > 0 { 1 } else { NIL };
        if n > 0 {
            tab[1] = n;
        }
        Self {
            sets: DisjointSets::new(n),
            count: vec![1; n],
            tab,
            tab_next: vec![NIL; n + 1],
            tab_prev: vec![NIL; n + 1],
            tab_head: head,
            tab_tail: head,
            gini: 0.0,
        }
    }

    /// Returns the number of elements being partitioned.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.sets.len()
    }

    /// Returns `true` when the partition covers no elements.
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Returns the current number of sets in the partition.
    #[must_use]
    pub(crate) fn set_count(&self) -> usize {
        self.sets.set_count()
    }

    /// Finds the set id (root) for `node`, compressing the visited path.
    ///
    /// # Panics
    /// Panics when `node` is not in `[0, len)`.
    pub(crate) fn find(&mut self, node: usize) -> usize {
        self.sets.find(node)
    }

    /// Returns the size of the set containing `node`.
    ///
    /// # Panics
    /// Panics when `node` is not in `[0, len)`.
    pub(crate) fn count_of(&mut self, node: usize) -> usize {
        let root = self.sets.find(node);
        self.count[root]
    }

    /// Returns the smallest set size currently present, in O(1).
    #[must_use]
    #[rustfmt::skip]
    pub(crate) fn smallest_count(&self) -> usize { self.tab_head }

    /// Returns the Gini index of the current set sizes, in `[0, 1]`.
    #[must_use]
    #[rustfmt::skip]
    pub(crate) fn gini(&self) -> f64 { self.gini }

    /// Merges the sets containing `x` and `y` and refreshes the Gini index.
    ///
    /// Returns the surviving set id, which is the smaller of the two roots.
    ///
    /// # Errors
    /// Returns [`GenieError::AlreadyJoined`] when `x` and `y` are already
    /// members of the same set.
    ///
    /// # Panics
    /// Panics when `x` or `y` is not in `[0, len)`.
    pub(crate) fn merge(&mut self, x: usize, y: usize) -> Result<usize> {
        let (root, absorbed) = self.sets.merge(x, y)?;

        let size_kept = self.count[root];
        let size_absorbed = self.count[absorbed];
        self.bucket_remove(size_kept);
        self.bucket_remove(size_absorbed);
        self.bucket_add(size_kept + size_absorbed);

        self.count[root] = size_kept + size_absorbed;
        self.count[absorbed] = 0;

        self.refresh_gini();
        Ok(root)
    }

    /// Removes one set of the given size from the frequency table,
    /// unlinking the bucket when it empties.
    fn bucket_remove(&mut self, size: usize) {
        self.tab[size] -= 1;
        if self.tab[size] > 0 {
            return;
        }

        let next = self.tab_next[size];
        let prev = self.tab_prev[size];
        if prev == NIL {
            self.tab_head = next;
        } else {
            self.tab_next[prev] = next;
        }
        if next == NIL {
            self.tab_tail = prev;
        } else {
            self.tab_prev[next] = prev;
        }
        self.tab_next[size] = NIL;
        self.tab_prev[size] = NIL;
    }

    /// Records one more set of the given size, linking a fresh bucket into
    /// the ascending occupied-size list when needed.
    ///
    /// Merged sizes usually land at or near the tail, so the insertion
    /// position is sought backwards from there.
    fn bucket_add(&mut self, size: usize) {
        if self.tab[size] == 0 {
            if self.tab_head == NIL {
                self.tab_head = size;
                self.tab_tail = size;
            } else if size > self.tab_tail {
                self.tab_prev[size] = self.tab_tail;
                self.tab_next[self.tab_tail] = size;
                self.tab_tail = size;
            } else {
                let mut successor = self.tab_tail;
                while self.tab_prev[successor] != NIL && self.tab_prev[successor] > size {
                    successor = self.tab_prev[successor];
                }
                let prev = self.tab_prev[successor];
                self.tab_prev[size] = prev;
                self.tab_next[size] = successor;
                self.tab_prev[successor] = size;
                if prev == NIL {
                    self.tab_head = size;
                } else {
                    self.tab_next[prev] = size;
                }
            }
        }
        self.tab[size] += 1;
    }

    /// Recomputes the Gini index in one pass over the occupied-size list.
    ///
    /// A bucket of `c` sets of size `s`, occupying ranks `r+1 ..= r+c` in
    /// the sorted size sequence, contributes `s * c * (2r + c - k)` to the
    /// numerator.
    fn refresh_gini(&mut self) {
        let k = self.sets.set_count();
        if k <= 1 {
            self.gini = 0.0;
            return;
        }

        let mut numerator = 0.0f64;
        let mut rank = 0usize;
        let mut size = self.tab_head;
        while size != NIL {
            let c = self.tab[size];
            let signed = 2.0 * rank as f64 + c as f64 - k as f64;
            numerator += size as f64 * c as f64 * signed;
            rank += c;
            size = self.tab_next[size];
        }

        let total = self.sets.len() as f64;
        self.gini = (numerator / ((k - 1) as f64 * total)).clamp(0.0, 1.0);
    }

    #[cfg(test)]
    pub(crate) fn parents(&self) -> &[usize] {
        self.sets.parents()
    }

    /// Returns the sizes of all current sets, for test oracles.
    #[cfg(test)]
    pub(crate) fn set_sizes(&mut self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.set_count());
        for i in 0..self.len() {
            if self.sets.find(i) == i {
                sizes.push(self.count[i]);
            }
        }
        sizes
    }
}

//! Array-based doubly-linked skip-list over the MST edge slots.
//!
//! The Genie correction consumes edges out of order, so the driver needs
//! O(1) removal of an interior edge and O(1) forward traversal over the
//! edges that remain. Both are provided by threading the eligible edge
//! slots, in their original ascending-weight order, through flat `next`
//! and `prev` arrays.
//!
//! Two cursors live here. `head` is the lightest unconsumed edge, the one
//! single linkage would take next. `scan` memoises where the last Genie
//! walk stopped, so repeated searches for the same target size resume
//! instead of restarting. Invariant: whenever `scan` is in use it sits at
//! or beyond `head`, and every edge from `head` onwards is unconsumed.

/// Doubly-linked list over edge slots `0..edge_count` with O(1) unlink.
///
/// `edge_count` itself serves as the past-the-end sentinel; the arrays are
/// one slot longer than the edge list so the sentinel's back link may be
/// written when the last live edge is spliced out. The before-the-start
/// sentinel is only ever stored, never followed.
#[derive(Clone, Debug)]
pub(crate) struct EdgeSkipList {
    next: Vec<usize>,
    prev: Vec<usize>,
    head: usize,
    scan: usize,
}

/// Stored in `prev` for the first live edge; never dereferenced.
const BEFORE_START: usize = usize::MAX;

impl EdgeSkipList {
    /// Allocates storage for `edge_count` edge slots. The list starts
    /// empty; call one of the `thread_*` methods before use.
    pub(crate) fn new(edge_count: usize) -> Self {
        Self {
            next: vec![0; edge_count + 1],
            prev: vec![0; edge_count + 1],
            head: edge_count,
            scan: edge_count,
        }
    }

    /// Returns the past-the-end sentinel value.
    #[rustfmt::skip]
    pub(crate) fn past_end(&self) -> usize { self.next.len() - 1 }

    /// Threads every edge slot into the list in index order.
    pub(crate) fn thread_all(&mut self) {
        self.thread_if(|_| true);
    }

    /// Threads exactly the slots the predicate accepts, in index order.
    ///
    /// `head` lands on the first eligible slot, or on the sentinel when
    /// nothing is eligible; `scan` starts at `head`.
    pub(crate) fn thread_if(&mut self, mut eligible: impl FnMut(usize) -> bool) {
        let end = self.past_end();
        self.head = end;
        let mut last_linked = BEFORE_START;
        for slot in 0..end {
            if !eligible(slot) {
                continue;
            }
            if last_linked == BEFORE_START {
                self.head = slot;
            } else {
                self.next[last_linked] = slot;
            }
            self.prev[slot] = last_linked;
            last_linked = slot;
        }
        if last_linked != BEFORE_START {
            self.next[last_linked] = end;
            self.prev[end] = last_linked;
        }
        self.scan = self.head;
    }

    /// Returns the lightest unconsumed edge slot.
    #[rustfmt::skip]
    pub(crate) fn head(&self) -> usize { self.head }

    /// Returns the memoised Genie walk position.
    #[rustfmt::skip]
    pub(crate) fn scan(&self) -> usize { self.scan }

    /// Returns `true` when the walk memo points before the head, i.e. at
    /// an edge that has already been consumed from the front.
    pub(crate) fn scan_is_stale(&self) -> bool {
        self.scan < self.head
    }

    /// Returns `true` when the walk has run off the end of the live list.
    pub(crate) fn scan_at_end(&self) -> bool {
        self.scan == self.past_end()
    }

    /// Restarts the Genie walk at the lightest unconsumed edge.
    pub(crate) fn rewind_scan(&mut self) {
        self.scan = self.head;
    }

    /// Moves the Genie walk one live edge forward.
    pub(crate) fn advance_scan(&mut self) {
        self.scan = self.next[self.scan];
    }

    /// Consumes the edge at the head cursor.
    pub(crate) fn consume_head(&mut self) {
        self.head = self.next[self.head];
    }

    /// Consumes the edge under the Genie walk cursor.
    ///
    /// Consuming the head advances both cursors together; consuming an
    /// interior edge splices it out and leaves the memo on its successor.
    pub(crate) fn consume_scan(&mut self) {
        if self.scan == self.head {
            self.head = self.next[self.head];
            self.scan = self.head;
        } else {
            let before = self.prev[self.scan];
            let after = self.next[self.scan];
            self.next[before] = after;
            self.prev[after] = before;
            self.scan = after;
        }
    }

    /// Collects the unconsumed edge slots in order, checking that the
    /// back links mirror the forward links on the way.
    #[cfg(test)]
    pub(crate) fn live_slots(&self) -> Vec<usize> {
        let end = self.past_end();
        let mut slots = Vec::new();
        let mut cursor = self.head;
        while cursor != end {
            let next = self.next[cursor];
            if next != end {
                assert_eq!(self.prev[next], cursor, "broken back link at slot {next}");
            }
            slots.push(cursor);
            cursor = next;
        }
        slots
    }
}

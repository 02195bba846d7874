//! # Index-aware binary heap of waiters.
//!
//! [`WaitQueue`] keeps requests that could not be admitted immediately,
//! ordered by **priority (descending)** then **arrival (ascending)**.
//!
//! ## Layout
//! ```text
//! heap:      Vec<Waiter<T>>              (array-backed binary heap)
//! positions: HashMap<WaiterKey, usize>   (key → current slot in `heap`)
//!
//!              [0] top
//!             /       \
//!          [1]         [2]
//!         /   \       /   \
//!       [3]   [4]   [5]   [6]
//! ```
//! Every swap rewrites `positions` for both entries, so an arbitrary waiter can
//! be located in O(1) and removed or re-ranked in O(log n).
//!
//! ## Rules
//! - `A` precedes `B` iff `A.priority > B.priority`, or the priorities are
//!   equal and `A` arrived first.
//! - Arrival is a per-queue sequence number: equal-priority order is exactly
//!   insertion order.
//! - A key resolves to a position only while its waiter is queued.
//! - No internal synchronization: the owner serializes access.

use std::collections::HashMap;

use tokio::time::Instant;

use crate::priority::Priority;

/// Opaque handle to a queued waiter.
///
/// Returned by [`WaitQueue::insert`]; stays valid until the waiter is popped
/// or removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaiterKey(u64);

/// A queued request together with its payload.
#[derive(Debug)]
pub struct Waiter<T> {
    key: WaiterKey,
    priority: Priority,
    arrival: u64,
    enqueued_at: Instant,
    payload: T,
}

impl<T> Waiter<T> {
    pub fn key(&self) -> WaiterKey {
        self.key
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    /// Arrival stamp (tie-break only).
    pub fn arrival(&self) -> u64 {
        self.arrival
    }

    /// When the waiter was enqueued.
    pub fn enqueued_at(&self) -> Instant {
        self.enqueued_at
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    #[inline]
    fn precedes(&self, other: &Waiter<T>) -> bool {
        if self.priority == other.priority {
            return self.arrival < other.arrival;
        }
        self.priority > other.priority
    }
}

/// Priority wait-queue with O(log n) arbitrary removal and re-ranking.
///
/// ## Example
/// ```rust
/// use slotgate::{Priority, WaitQueue};
///
/// let mut q = WaitQueue::new();
/// let low = q.insert(Priority::LOW, "batch");
/// q.insert(Priority::HIGH, "interactive");
///
/// assert_eq!(q.peek().map(|w| *w.payload()), Some("interactive"));
/// assert!(q.update_priority(low, Priority::new(10)));
/// assert_eq!(q.pop().map(|w| w.into_payload()), Some("batch"));
/// ```
#[derive(Debug)]
pub struct WaitQueue<T> {
    heap: Vec<Waiter<T>>,
    positions: HashMap<WaiterKey, usize>,
    next_arrival: u64,
}

impl<T> WaitQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            positions: HashMap::new(),
            next_arrival: 0,
        }
    }

    /// Number of queued waiters.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// True while the waiter behind `key` is still queued.
    pub fn contains(&self, key: WaiterKey) -> bool {
        self.positions.contains_key(&key)
    }

    /// Current priority of a queued waiter.
    pub fn priority_of(&self, key: WaiterKey) -> Option<Priority> {
        self.get(key).map(Waiter::priority)
    }

    /// Borrows a queued waiter.
    pub fn get(&self, key: WaiterKey) -> Option<&Waiter<T>> {
        self.positions.get(&key).map(|&i| &self.heap[i])
    }

    /// Stamps arrival, inserts and restores heap order.
    pub fn insert(&mut self, priority: Priority, payload: T) -> WaiterKey {
        let arrival = self.next_arrival;
        self.next_arrival += 1;

        let key = WaiterKey(arrival);
        let slot = self.heap.len();
        self.heap.push(Waiter {
            key,
            priority,
            arrival,
            enqueued_at: Instant::now(),
            payload,
        });
        self.positions.insert(key, slot);
        self.sift_up(slot);
        key
    }

    /// Highest-ordered waiter, without removing it.
    pub fn peek(&self) -> Option<&Waiter<T>> {
        self.heap.first()
    }

    /// Removes and returns the highest-ordered waiter.
    pub fn pop(&mut self) -> Option<Waiter<T>> {
        self.remove_at(0)
    }

    /// Removes an arbitrary waiter.
    ///
    /// Returns `None` if it was already popped or removed.
    pub fn remove(&mut self, key: WaiterKey) -> Option<Waiter<T>> {
        let slot = *self.positions.get(&key)?;
        self.remove_at(slot)
    }

    /// Sets a new priority and re-establishes heap order from that slot.
    ///
    /// Returns `false` if the waiter is no longer queued.
    pub fn update_priority(&mut self, key: WaiterKey, priority: Priority) -> bool {
        let Some(&slot) = self.positions.get(&key) else {
            return false;
        };
        self.heap[slot].priority = priority;
        self.fix(slot);
        true
    }

    /// Snapshot of queued priorities in extraction order.
    pub fn priorities(&self) -> Vec<Priority> {
        let mut order: Vec<(Priority, u64)> =
            self.heap.iter().map(|w| (w.priority, w.arrival)).collect();
        order.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        order.into_iter().map(|(p, _)| p).collect()
    }

    // ---------------------------
    // Heap maintenance
    // ---------------------------

    fn remove_at(&mut self, slot: usize) -> Option<Waiter<T>> {
        let last = self.heap.len().checked_sub(1)?;
        if slot != last {
            self.swap(slot, last);
        }
        let removed = self.heap.pop()?;
        self.positions.remove(&removed.key);
        if slot < self.heap.len() {
            self.fix(slot);
        }
        Some(removed)
    }

    fn fix(&mut self, slot: usize) {
        if self.sift_up(slot) == slot {
            self.sift_down(slot);
        }
    }

    fn sift_up(&mut self, mut slot: usize) -> usize {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !self.heap[slot].precedes(&self.heap[parent]) {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        slot
    }

    fn sift_down(&mut self, mut slot: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * slot + 1;
            let right = left + 1;
            let mut best = slot;

            if left < len && self.heap[left].precedes(&self.heap[best]) {
                best = left;
            }
            if right < len && self.heap[right].precedes(&self.heap[best]) {
                best = right;
            }
            if best == slot {
                return;
            }
            self.swap(slot, best);
            slot = best;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].key, a);
        self.positions.insert(self.heap[b].key, b);
    }
}

impl<T> Default for WaitQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<T>(q: &mut WaitQueue<T>) -> Vec<Priority> {
        std::iter::from_fn(|| q.pop().map(|w| w.priority())).collect()
    }

    #[test]
    fn test_extracts_highest_first() {
        let mut q = WaitQueue::new();
        for i in 0..3 {
            q.insert(Priority::new(i * 2), ());
        }
        let order: Vec<i32> = drain(&mut q).into_iter().map(Priority::get).collect();
        assert_eq!(order, vec![4, 2, 0]);
        assert!(q.is_empty());
    }

    #[test]
    fn test_equal_priority_is_fifo() {
        let mut q = WaitQueue::new();
        for tag in 0..8 {
            q.insert(Priority::MEDIUM, tag);
        }
        let order: Vec<i32> = std::iter::from_fn(|| q.pop().map(Waiter::into_payload)).collect();
        assert_eq!(order, (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn test_update_priority_reorders_immediately() {
        let mut q = WaitQueue::new();
        let keys: Vec<WaiterKey> = (0..3).map(|i| q.insert(Priority::LOW, i)).collect();

        assert!(q.update_priority(keys[2], Priority::MEDIUM_HIGH));
        assert_eq!(q.peek().map(|w| *w.payload()), Some(2));

        let order: Vec<i32> = std::iter::from_fn(|| q.pop().map(Waiter::into_payload)).collect();
        assert_eq!(order, vec![2, 0, 1]);
    }

    #[test]
    fn test_update_priority_can_sink() {
        let mut q = WaitQueue::new();
        let top = q.insert(Priority::HIGH, "a");
        q.insert(Priority::MEDIUM, "b");
        q.insert(Priority::MEDIUM, "c");

        assert!(q.update_priority(top, Priority::LOW));
        let order: Vec<&str> = std::iter::from_fn(|| q.pop().map(Waiter::into_payload)).collect();
        assert_eq!(order, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_remove_arbitrary_keeps_order() {
        let mut q = WaitQueue::new();
        let keys: Vec<WaiterKey> = [3, 1, 4, 1, 5, 9, 2, 6]
            .into_iter()
            .map(|p| q.insert(Priority::new(p), p))
            .collect();

        let removed = q.remove(keys[5]).map(Waiter::into_payload);
        assert_eq!(removed, Some(9));
        assert!(!q.contains(keys[5]));
        assert_eq!(q.remove(keys[5]).map(Waiter::into_payload), None);

        let order: Vec<i32> = drain(&mut q).into_iter().map(Priority::get).collect();
        assert_eq!(order, vec![6, 5, 4, 3, 2, 1, 1]);
    }

    #[test]
    fn test_stale_key_is_rejected() {
        let mut q = WaitQueue::new();
        let key = q.insert(Priority::LOW, ());
        assert!(q.pop().is_some());
        assert!(!q.update_priority(key, Priority::HIGH));
        assert_eq!(q.priority_of(key), None);
        assert!(q.remove(key).is_none());
    }

    #[test]
    fn test_pop_and_peek_on_empty() {
        let mut q: WaitQueue<()> = WaitQueue::new();
        assert!(q.peek().is_none());
        assert!(q.pop().is_none());
    }

    #[test]
    fn test_priorities_snapshot_matches_extraction() {
        let mut q = WaitQueue::new();
        for p in [2, 4, 2, 1, 3] {
            q.insert(Priority::new(p), ());
        }
        let snapshot = q.priorities();
        assert_eq!(snapshot, drain(&mut q));
    }

    #[test]
    fn test_positions_stay_consistent_under_churn() {
        let mut q = WaitQueue::new();
        let mut live = Vec::new();
        for i in 0..64 {
            live.push(q.insert(Priority::new(i % 5), i));
        }
        for (n, key) in live.iter().enumerate() {
            if n % 3 == 0 {
                assert!(q.remove(*key).is_some());
            } else if n % 3 == 1 {
                assert!(q.update_priority(*key, Priority::new((n % 7) as i32)));
            }
        }
        for key in &live {
            if let Some(&slot) = q.positions.get(key) {
                assert_eq!(q.heap[slot].key, *key);
            }
        }
        let order = drain(&mut q);
        assert!(order.windows(2).all(|w| w[0] >= w[1]));
    }
}

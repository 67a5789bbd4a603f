//! Round-robin refresh scheduling.
//!
//! [`RoundRobin`] decides *which* area index is due for a refresh; it never
//! touches an area itself. Every `interval`-th tick is one scheduling quantum
//! and yields exactly one index, cycling through the set in order. When an
//! area before the pointer is removed the pointer shifts back with it, so the
//! next area in line is never skipped.

use std::num::NonZeroU32;

/// Pure round-robin scheduler over a set of `len` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRobin {
    interval: NonZeroU32,
    counter: u64,
    pointer: usize,
}

impl RoundRobin {
    /// Create a scheduler firing every `interval` ticks.
    pub const fn new(interval: NonZeroU32) -> Self {
        Self {
            interval,
            counter: 0,
            pointer: 0,
        }
    }

    /// Ticks counted so far.
    pub const fn counter(&self) -> u64 {
        self.counter
    }

    /// Index that the next quantum will start from (before wrapping).
    pub const fn pointer(&self) -> usize {
        self.pointer
    }

    /// Count one tick. On a quantum boundary with a non-empty set, return the
    /// index to refresh and advance past it.
    pub fn next_due(&mut self, len: usize) -> Option<usize> {
        self.counter = self.counter.saturating_add(1);
        let due = self
            .counter
            .checked_rem(u64::from(self.interval.get()))
            .is_some_and(|r| r == 0);
        if !due || len == 0 {
            return None;
        }
        if self.pointer >= len {
            self.pointer = 0;
        }
        let index = self.pointer;
        self.pointer = self.pointer.saturating_add(1);
        Some(index)
    }

    /// Account for the item at `index` having been removed.
    ///
    /// When several items are removed, call this once per index in
    /// descending order.
    pub const fn on_removed(&mut self, index: usize) {
        if index < self.pointer {
            self.pointer = self.pointer.saturating_sub(1);
        }
    }

    /// Start the next cycle from the first item.
    pub const fn rewind(&mut self) {
        self.pointer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every(ticks: u32) -> RoundRobin {
        RoundRobin::new(NonZeroU32::new(ticks).unwrap_or(NonZeroU32::MIN))
    }

    /// Run `ticks` ticks over `len` items, collecting the due indices.
    fn run(scheduler: &mut RoundRobin, len: usize, ticks: u32) -> Vec<usize> {
        (0..ticks).filter_map(|_| scheduler.next_due(len)).collect()
    }

    #[test]
    fn fires_only_on_quantum_boundaries() {
        let mut scheduler = every(20);
        for _ in 0..19 {
            assert_eq!(scheduler.next_due(3), None);
        }
        assert_eq!(scheduler.next_due(3), Some(0));
        assert_eq!(scheduler.counter(), 20);
    }

    #[test]
    fn empty_set_counts_ticks_but_never_fires() {
        let mut scheduler = every(20);
        assert!(run(&mut scheduler, 0, 100).is_empty());
        assert_eq!(scheduler.counter(), 100);
        assert_eq!(scheduler.pointer(), 0);
    }

    #[test]
    fn strict_round_robin_over_n_quanta() {
        for n in 1..=7_usize {
            let mut scheduler = every(20);
            let quanta = u32::try_from(n).unwrap_or(u32::MAX);
            let due = run(&mut scheduler, n, 20 * quanta * 3);
            assert_eq!(due.len(), n * 3);
            for (i, index) in due.iter().enumerate() {
                assert_eq!(*index, i % n);
            }
        }
    }

    #[test]
    fn removal_before_pointer_does_not_skip() {
        // A, B, C: refresh A then B, remove B, then C and wrap to A.
        let mut scheduler = every(20);
        assert_eq!(run(&mut scheduler, 3, 40), vec![0, 1]);
        scheduler.on_removed(1);
        assert_eq!(run(&mut scheduler, 2, 20), vec![1]);
        assert_eq!(run(&mut scheduler, 2, 20), vec![0]);
    }

    #[test]
    fn removal_after_pointer_leaves_it_alone() {
        let mut scheduler = every(1);
        assert_eq!(scheduler.next_due(4), Some(0));
        scheduler.on_removed(3);
        assert_eq!(scheduler.pointer(), 1);
        assert_eq!(scheduler.next_due(3), Some(1));
    }

    #[test]
    fn shrinking_set_wraps_pointer() {
        let mut scheduler = every(1);
        assert_eq!(run(&mut scheduler, 5, 4), vec![0, 1, 2, 3]);
        assert_eq!(scheduler.next_due(2), Some(0));
    }

    #[test]
    fn rewind_restarts_cycle() {
        let mut scheduler = every(1);
        assert_eq!(run(&mut scheduler, 3, 2), vec![0, 1]);
        scheduler.rewind();
        assert_eq!(scheduler.next_due(3), Some(0));
    }
}

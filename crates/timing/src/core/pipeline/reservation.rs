//! Functional-unit and store reservations.
//!
//! A reservation is "busy for N more cycles" state that the pipeline counts
//! down as simulated time advances:
//! 1. **Operation Reservations:** The core has exactly one multiplier and one
//!    divider; a second operation must wait for the first to release the unit.
//! 2. **Store Reservations:** Each in-flight store remembers the bytes it is
//!    writing so a later overlapping load can be charged a forwarding penalty.

use crate::common::AddrRange;

/// Occupancy of a single shared functional unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpReservation {
    acquired: bool,
    remaining: u64,
}

impl OpReservation {
    /// An idle unit.
    pub const fn new() -> Self {
        Self {
            acquired: false,
            remaining: 0,
        }
    }

    /// Returns `true` while the unit is reserved.
    #[inline(always)]
    pub const fn is_busy(&self) -> bool {
        self.acquired
    }

    /// Cycles until the unit frees up, or `None` if it is idle.
    #[inline]
    pub const fn remaining(&self) -> Option<u64> {
        if self.acquired {
            Some(self.remaining)
        } else {
            None
        }
    }

    /// Marks the unit busy for `cycles` cycles.
    ///
    /// # Panics
    ///
    /// Panics if the unit is still reserved or `cycles` is zero. Callers
    /// serialize on the unit by stalling until it is released first.
    pub fn acquire(&mut self, cycles: u64) {
        assert!(
            !self.acquired,
            "unit reservation invariant violated: acquired with {} cycles still outstanding",
            self.remaining
        );
        assert!(cycles > 0, "unit reservation must last at least one cycle");
        self.acquired = true;
        self.remaining = cycles;
    }

    /// Counts the reservation down by `n`, releasing it once nothing remains.
    /// Idle units are left untouched.
    pub fn advance(&mut self, n: u64) {
        if !self.acquired {
            return;
        }
        self.remaining = self.remaining.saturating_sub(n);
        if self.remaining == 0 {
            self.acquired = false;
        }
    }
}

/// A store whose data is not yet visible to loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreReservation {
    /// Bytes being written.
    pub range: AddrRange,
    /// Cycles until the store drains.
    pub remaining: u64,
}

/// All in-flight stores. Entries may overlap in time and in address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreReservationSet {
    entries: Vec<StoreReservation>,
}

impl StoreReservationSet {
    /// An empty set.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records a store to `range` that stays in flight for `cycles` cycles.
    pub fn reserve(&mut self, range: AddrRange, cycles: u64) {
        if cycles == 0 {
            return;
        }
        self.entries.push(StoreReservation {
            range,
            remaining: cycles,
        });
    }

    /// Returns `true` if any in-flight store shares a byte with `range`.
    pub fn overlaps(&self, range: &AddrRange) -> bool {
        self.entries.iter().any(|s| s.range.overlaps(range))
    }

    /// Number of in-flight stores.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no store is in flight.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counts every store down by `n` and drops the ones that drained.
    pub fn advance(&mut self, n: u64) {
        self.entries.retain_mut(|s| {
            s.remaining = s.remaining.saturating_sub(n);
            s.remaining > 0
        });
    }
}
